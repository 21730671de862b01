use crate::core::config::ExtractionConfig;
use crate::dom::ax::{merge_ax_info, AxIndex};
use crate::dom::classify;
use crate::dom::element::{truncate, BoundingBox, Element};
use crate::errors::{PageLensError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Columnar payload of `DOMSnapshot.captureSnapshot`. All string-valued
/// columns are indices into the shared top-level `strings` table; a
/// negative index means "no value".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotPayload {
    #[serde(default)]
    documents: Vec<DocumentSnapshot>,
    #[serde(default)]
    strings: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentSnapshot {
    #[serde(default)]
    nodes: NodeTreeSnapshot,
    #[serde(default)]
    layout: LayoutTreeSnapshot,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeTreeSnapshot {
    #[serde(default)]
    node_type: Vec<i64>,
    #[serde(default)]
    node_name: Vec<i64>,
    #[serde(default)]
    backend_node_id: Vec<i64>,
    /// Flat per-node list of alternating name/value string indices.
    #[serde(default)]
    attributes: Vec<Vec<i64>>,
    #[serde(default)]
    text_value: Vec<i64>,
    #[serde(default)]
    input_value: Vec<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutTreeSnapshot {
    #[serde(default)]
    node_index: Vec<i64>,
    /// Per-layout-record `[x, y, width, height]`.
    #[serde(default)]
    bounds: Vec<Vec<f64>>,
    #[serde(default)]
    paint_orders: Vec<i64>,
    #[serde(default)]
    scroll_rects: Vec<Vec<f64>>,
    #[serde(default)]
    client_rects: Vec<Vec<f64>>,
    /// Per-layout-record string indices, one per requested computed style.
    #[serde(default)]
    styles: Vec<Vec<i64>>,
}

const ELEMENT_NODE: i64 = 1;

// Positions in each styles row, matching SNAPSHOT_COMPUTED_STYLES.
const STYLE_DISPLAY: usize = 0;
const STYLE_VISIBILITY: usize = 1;
const STYLE_OPACITY: usize = 2;
const STYLE_CURSOR: usize = 3;
const STYLE_OVERFLOW: usize = 5;

fn get_string<'a>(strings: &'a [String], idx: i64) -> &'a str {
    if idx < 0 {
        return "";
    }
    strings.get(idx as usize).map(String::as_str).unwrap_or("")
}

fn rect_extent(rects: &[Vec<f64>], layout_idx: usize) -> (i64, i64) {
    match rects.get(layout_idx) {
        Some(rect) if rect.len() >= 4 => (rect[2] as i64, rect[3] as i64),
        _ => (0, 0),
    }
}

/// Decodes a snapshot payload into classified candidate elements.
///
/// Candidates carry visibility, interactivity, and scrollability flags
/// plus merged accessibility data; geometric filtering happens later.
/// Fails with [`PageLensError::SnapshotDecode`] when the payload is
/// malformed or contains no documents, which sends orchestration down the
/// scripted fallback path.
pub fn parse_snapshot(
    payload: &Value,
    ax_index: &AxIndex,
    config: &ExtractionConfig,
) -> Result<Vec<Element>> {
    let snapshot: SnapshotPayload = serde_json::from_value(payload.clone())
        .map_err(|e| PageLensError::SnapshotDecode(e.to_string()))?;

    if snapshot.documents.is_empty() {
        return Err(PageLensError::SnapshotDecode(
            "no documents in snapshot".to_string(),
        ));
    }

    let strings = &snapshot.strings;
    let doc = &snapshot.documents[0];
    let nodes = &doc.nodes;
    let layout = &doc.layout;

    // nodeIndex -> layout record position
    let mut layout_lookup: HashMap<i64, usize> = HashMap::new();
    for (pos, &node_idx) in layout.node_index.iter().enumerate() {
        layout_lookup.insert(node_idx, pos);
    }

    let mut elements = Vec::new();

    for i in 0..nodes.node_type.len() {
        if nodes.node_type[i] != ELEMENT_NODE {
            continue;
        }

        let tag_name = nodes
            .node_name
            .get(i)
            .map(|&idx| get_string(strings, idx).to_lowercase())
            .unwrap_or_default();

        if !classify::should_process_tag(&tag_name) {
            continue;
        }

        let backend_node_id = nodes.backend_node_id.get(i).copied().unwrap_or(0);

        // Decode this node's attributes into a scratch map.
        let mut attrs: HashMap<&str, &str> = HashMap::new();
        if let Some(pairs) = nodes.attributes.get(i) {
            for pair in pairs.chunks(2) {
                if let [name_idx, value_idx] = pair {
                    let name = get_string(strings, *name_idx);
                    if !name.is_empty() {
                        attrs.insert(name, get_string(strings, *value_idx));
                    }
                }
            }
        }

        let mut bbox = BoundingBox::default();
        let mut paint_order = 0;
        let mut is_visible = false;
        let mut cursor = "";
        let mut overflow = "";
        let mut scroll_extent = (0, 0);
        let mut client_extent = (0, 0);

        if let Some(&layout_idx) = layout_lookup.get(&(i as i64)) {
            if let Some(bounds) = layout.bounds.get(layout_idx) {
                if bounds.len() >= 4 {
                    bbox = BoundingBox::new(bounds[0], bounds[1], bounds[2], bounds[3]);
                    is_visible = !bbox.is_empty();
                }
            }
            if let Some(&order) = layout.paint_orders.get(layout_idx) {
                paint_order = order;
            }
            if let Some(styles) = layout.styles.get(layout_idx) {
                if let Some(&idx) = styles.get(STYLE_DISPLAY) {
                    if get_string(strings, idx) == "none" {
                        is_visible = false;
                    }
                }
                if let Some(&idx) = styles.get(STYLE_VISIBILITY) {
                    if get_string(strings, idx) == "hidden" {
                        is_visible = false;
                    }
                }
                if let Some(&idx) = styles.get(STYLE_OPACITY) {
                    // Only the literal "0" counts; fractional near-zero
                    // opacities pass through.
                    if get_string(strings, idx) == "0" {
                        is_visible = false;
                    }
                }
                if let Some(&idx) = styles.get(STYLE_CURSOR) {
                    cursor = get_string(strings, idx);
                }
                if let Some(&idx) = styles.get(STYLE_OVERFLOW) {
                    overflow = get_string(strings, idx);
                }
            }
            scroll_extent = rect_extent(&layout.scroll_rects, layout_idx);
            client_extent = rect_extent(&layout.client_rects, layout_idx);
        }

        let role = attrs.get("role").copied().unwrap_or("");
        let tabindex = attrs.get("tabindex").copied().unwrap_or("");
        let has_click_handler = attrs.contains_key("onclick");

        let mut text = "";
        if let Some(&idx) = nodes.text_value.get(i) {
            text = get_string(strings, idx);
        }
        if text.is_empty() {
            if let Some(&idx) = nodes.input_value.get(i) {
                text = get_string(strings, idx);
            }
        }

        let is_interactive = classify::is_interactive(
            &tag_name,
            role,
            has_click_handler,
            tabindex,
            cursor,
            ax_index.get(backend_node_id),
        );

        let is_scrollable = classify::is_scrollable(
            overflow,
            scroll_extent.0,
            scroll_extent.1,
            client_extent.0,
            client_extent.1,
        );

        let is_enabled =
            !attrs.contains_key("disabled") && attrs.get("aria-disabled").copied() != Some("true");

        let selector = if let Some(id) = attrs.get("id").filter(|id| !id.is_empty()) {
            format!("#{}", id)
        } else if let Some(name) = attrs.get("name").filter(|name| !name.is_empty()) {
            format!("{}[name=\"{}\"]", tag_name, name)
        } else {
            String::new()
        };

        let mut el = Element {
            tag_name,
            role: role.to_string(),
            name: attrs.get("name").copied().unwrap_or("").to_string(),
            text: truncate(text, config.max_text_len),
            input_type: attrs.get("type").copied().unwrap_or("").to_string(),
            href: attrs.get("href").copied().unwrap_or("").to_string(),
            placeholder: attrs.get("placeholder").copied().unwrap_or("").to_string(),
            aria_label: attrs.get("aria-label").copied().unwrap_or("").to_string(),
            is_visible,
            is_enabled,
            is_interactive,
            bounding_box: bbox,
            selector,
            backend_node_id,
            paint_order,
            computed_cursor: cursor.to_string(),
            is_scrollable,
            scroll_width: scroll_extent.0,
            scroll_height: scroll_extent.1,
            client_width: client_extent.0,
            client_height: client_extent.1,
            ..Element::default()
        };

        if let Some(ax_node) = ax_index.get(backend_node_id) {
            merge_ax_info(&mut el, ax_node);
        }

        elements.push(el);
    }

    Ok(elements)
}
