use crate::dom::element::Element;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Weakly typed value slot carried by accessibility nodes and properties.
///
/// The protocol sends these as a tagged sum over bool, string, idref, or
/// nothing at all; accessors never assume a shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AxValue {
    #[serde(rename = "type", default)]
    pub value_type: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl AxValue {
    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_ref().and_then(Value::as_bool)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AxProperty {
    pub name: String,
    #[serde(default)]
    pub value: Option<AxValue>,
}

/// One node of the accessibility tree.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AxNode {
    #[serde(rename = "backendDOMNodeId", default)]
    pub backend_dom_node_id: Option<i64>,
    #[serde(default)]
    pub role: Option<AxValue>,
    #[serde(default)]
    pub name: Option<AxValue>,
    #[serde(default)]
    pub description: Option<AxValue>,
    #[serde(default)]
    pub properties: Vec<AxProperty>,
}

impl AxNode {
    /// Reads a named boolean property, tolerating absent slots and
    /// non-boolean values.
    pub fn bool_property(&self, name: &str) -> Option<bool> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.value.as_ref())
            .and_then(AxValue::as_bool)
    }
}

#[derive(Debug, Default, Deserialize)]
struct AxTreePayload {
    #[serde(default)]
    nodes: Vec<AxNode>,
}

/// Lookup from backend DOM node id to accessibility node.
#[derive(Debug, Default)]
pub struct AxIndex {
    nodes: HashMap<i64, AxNode>,
}

impl AxIndex {
    /// Builds the index from a raw `Accessibility.getFullAXTree` payload.
    /// Nodes without a positive backend DOM node id are skipped; a payload
    /// that does not decode yields an empty index.
    pub fn from_payload(payload: &Value) -> Self {
        let parsed: AxTreePayload = match serde_json::from_value(payload.clone()) {
            Ok(parsed) => parsed,
            Err(_) => return Self::default(),
        };

        let mut nodes = HashMap::new();
        for node in parsed.nodes {
            if let Some(id) = node.backend_dom_node_id {
                if id > 0 {
                    nodes.insert(id, node);
                }
            }
        }
        Self { nodes }
    }

    pub fn get(&self, backend_node_id: i64) -> Option<&AxNode> {
        self.nodes.get(&backend_node_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Copies accessibility information onto an element: fills empty role and
/// name, assigns the description, and mirrors the state flags.
/// `focusable` also sets the base focusability; `disabled=true` clears the
/// base enabled flag.
pub fn merge_ax_info(el: &mut Element, ax: &AxNode) {
    if el.name.is_empty() {
        if let Some(name) = ax.name.as_ref().and_then(AxValue::as_str) {
            el.name = name.to_string();
        }
    }
    if el.role.is_empty() {
        if let Some(role) = ax.role.as_ref().and_then(AxValue::as_str) {
            el.role = role.to_string();
        }
    }
    if let Some(description) = ax.description.as_ref().and_then(AxValue::as_str) {
        el.ax_description = description.to_string();
    }

    for prop in &ax.properties {
        let Some(value) = prop.value.as_ref() else {
            continue;
        };
        match prop.name.as_str() {
            "focusable" => {
                if let Some(v) = value.as_bool() {
                    el.ax_focusable = v;
                    el.is_focusable = v;
                }
            }
            "editable" => {
                if let Some(v) = value.as_bool() {
                    el.ax_editable = v;
                }
            }
            "expanded" => {
                if let Some(v) = value.as_bool() {
                    el.ax_expanded = Some(v);
                }
            }
            "checked" => {
                if let Some(v) = value.as_bool() {
                    el.ax_checked = Some(v);
                }
            }
            "selected" => {
                if let Some(v) = value.as_bool() {
                    el.ax_selected = Some(v);
                }
            }
            "required" => {
                if let Some(v) = value.as_bool() {
                    el.ax_required = v;
                }
            }
            "disabled" => {
                if let Some(v) = value.as_bool() {
                    el.ax_disabled = v;
                    if v {
                        el.is_enabled = false;
                    }
                }
            }
            _ => {}
        }
    }
}
