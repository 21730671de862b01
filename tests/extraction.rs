//! Orchestration tests driving the extraction pipeline through a mock
//! browser that serves canned protocol payloads.

use async_trait::async_trait;
use pagelens::{
    BrowserTrait, Config, DomProcessor, ExtractionConfig, PageInfo, PageLensError, Result,
};
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Default)]
struct MockBrowser {
    /// Payload served by the snapshot call; `None` makes the call fail.
    snapshot: Option<Value>,
    /// Payload served by the AX tree call; `None` makes the call fail.
    ax_tree: Option<Value>,
    /// Document served to the fallback's outerHTML evaluation.
    html: Option<String>,
    /// Artificial latency on the snapshot call.
    snapshot_delay: Duration,
}

#[async_trait]
impl BrowserTrait for MockBrowser {
    type TabHandle = ();

    async fn launch(&mut self, _config: &Config) -> Result<()> {
        Ok(())
    }

    async fn new_tab(&self) -> Result<()> {
        Ok(())
    }

    async fn navigate(&self, _tab: &(), _url: &str) -> Result<()> {
        Ok(())
    }

    async fn execute_script(&self, _tab: &(), script: &str) -> Result<Value> {
        if script.contains("outerHTML") {
            if let Some(html) = &self.html {
                return Ok(Value::String(html.clone()));
            }
        }
        Ok(Value::Null)
    }

    async fn take_screenshot(&self, _tab: &()) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    async fn capture_snapshot(&self, _tab: &(), _computed_styles: &[&str]) -> Result<Value> {
        if !self.snapshot_delay.is_zero() {
            tokio::time::sleep(self.snapshot_delay).await;
        }
        self.snapshot.clone().ok_or(PageLensError::Protocol {
            stage: "snapshot",
            reason: "mock snapshot failure".to_string(),
        })
    }

    async fn fetch_ax_tree(&self, _tab: &()) -> Result<Value> {
        self.ax_tree.clone().ok_or(PageLensError::Protocol {
            stage: "ax-tree",
            reason: "mock ax failure".to_string(),
        })
    }

    async fn page_info(&self, _tab: &()) -> Result<PageInfo> {
        Ok(PageInfo {
            url: "https://mock.test/".to_string(),
            title: "Mock Page".to_string(),
        })
    }

    fn is_running(&self) -> bool {
        true
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// One node of a hand-built columnar snapshot payload.
struct Node {
    tag: &'static str,
    backend_id: i64,
    bounds: [f64; 4],
    paint_order: i64,
    attrs: Vec<(&'static str, &'static str)>,
    text: Option<&'static str>,
    cursor: &'static str,
}

impl Node {
    fn new(tag: &'static str, backend_id: i64, bounds: [f64; 4], paint_order: i64) -> Self {
        Self {
            tag,
            backend_id,
            bounds,
            paint_order,
            attrs: vec![],
            text: None,
            cursor: "auto",
        }
    }

    fn attr(mut self, name: &'static str, value: &'static str) -> Self {
        self.attrs.push((name, value));
        self
    }

    fn text(mut self, text: &'static str) -> Self {
        self.text = Some(text);
        self
    }

    fn cursor(mut self, cursor: &'static str) -> Self {
        self.cursor = cursor;
        self
    }
}

fn snapshot_payload(nodes: &[Node]) -> Value {
    let mut strings: Vec<String> = Vec::new();
    let mut intern = |s: &str| -> i64 {
        if let Some(pos) = strings.iter().position(|x| x == s) {
            return pos as i64;
        }
        strings.push(s.to_string());
        strings.len() as i64 - 1
    };

    let mut node_type = Vec::new();
    let mut node_name = Vec::new();
    let mut backend_node_id = Vec::new();
    let mut attributes = Vec::new();
    let mut text_value = Vec::new();
    let mut input_value = Vec::new();
    let mut node_index = Vec::new();
    let mut bounds = Vec::new();
    let mut paint_orders = Vec::new();
    let mut styles = Vec::new();

    for (i, node) in nodes.iter().enumerate() {
        node_type.push(1);
        node_name.push(intern(&node.tag.to_uppercase()));
        backend_node_id.push(node.backend_id);

        let mut pairs = Vec::new();
        for (name, value) in &node.attrs {
            pairs.push(intern(name));
            pairs.push(intern(value));
        }
        attributes.push(pairs);
        text_value.push(node.text.map(&mut intern).unwrap_or(-1));
        input_value.push(-1);

        node_index.push(i as i64);
        bounds.push(node.bounds.to_vec());
        paint_orders.push(node.paint_order);
        styles.push(vec![
            intern("block"),
            intern("visible"),
            intern("1"),
            intern(node.cursor),
            intern("auto"),
            intern("visible"),
        ]);
    }

    json!({
        "documents": [{
            "nodes": {
                "nodeType": node_type,
                "nodeName": node_name,
                "backendNodeId": backend_node_id,
                "attributes": attributes,
                "textValue": text_value,
                "inputValue": input_value,
            },
            "layout": {
                "nodeIndex": node_index,
                "bounds": bounds,
                "paintOrders": paint_orders,
                "styles": styles,
            }
        }],
        "strings": strings,
    })
}

fn fast_config() -> ExtractionConfig {
    ExtractionConfig {
        protocol_timeout_ms: 2000,
        ..ExtractionConfig::default()
    }
}

#[tokio::test]
async fn single_anchor_yields_one_indexed_element() {
    let browser = MockBrowser {
        snapshot: Some(snapshot_payload(&[Node::new(
            "a",
            101,
            [10.0, 20.0, 80.0, 24.0],
            5,
        )
        .attr("href", "/x")
        .text("Next")])),
        ax_tree: Some(json!({"nodes": []})),
        ..MockBrowser::default()
    };

    let processor = DomProcessor::new(fast_config());
    let map = processor
        .extract_element_map(&browser, &(), None)
        .await
        .unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(map.page_url, "https://mock.test/");
    assert_eq!(map.page_title, "Mock Page");

    let el = map.by_index(0).unwrap();
    assert_eq!(el.tag_name, "a");
    assert_eq!(el.index, 0);
    assert_eq!(el.text, "Next");
    assert_eq!(el.href, "/x");
    assert_eq!(el.backend_node_id, 101);

    let tokens = map.to_token_string(0);
    let element_line = tokens.lines().nth(3).unwrap();
    assert!(element_line.starts_with("[0] a \"Next\" href=\"/x\""));
}

#[tokio::test]
async fn icon_inside_button_is_filtered_by_containment() {
    let browser = MockBrowser {
        snapshot: Some(snapshot_payload(&[
            Node::new("button", 10, [0.0, 0.0, 100.0, 40.0], 40).text("Save"),
            Node::new("svg", 11, [8.0, 8.0, 24.0, 24.0], 50).cursor("pointer"),
        ])),
        ax_tree: Some(json!({"nodes": []})),
        ..MockBrowser::default()
    };

    let processor = DomProcessor::new(fast_config());
    let map = processor
        .extract_element_map(&browser, &(), None)
        .await
        .unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(map.by_index(0).unwrap().tag_name, "button");
    assert_eq!(map.stats.filtered_by_contain, 1);
}

#[tokio::test]
async fn modal_overlay_occludes_everything_under_it() {
    let browser = MockBrowser {
        snapshot: Some(snapshot_payload(&[
            Node::new("div", 20, [0.0, 0.0, 1280.0, 720.0], 1000),
            Node::new("a", 21, [100.0, 100.0, 80.0, 24.0], 10).attr("href", "/hidden"),
        ])),
        ax_tree: Some(json!({"nodes": []})),
        ..MockBrowser::default()
    };

    let processor = DomProcessor::new(fast_config());
    let map = processor
        .extract_element_map(&browser, &(), None)
        .await
        .unwrap();

    assert_eq!(map.len(), 0);
    assert!(map.stats.filtered_by_paint >= 1);
}

#[tokio::test]
async fn second_extraction_marks_new_elements() {
    let first = MockBrowser {
        snapshot: Some(snapshot_payload(&[
            Node::new("a", 101, [0.0, 0.0, 50.0, 20.0], 2).attr("href", "/a"),
            Node::new("a", 102, [0.0, 30.0, 50.0, 20.0], 1).attr("href", "/b"),
        ])),
        ax_tree: Some(json!({"nodes": []})),
        ..MockBrowser::default()
    };
    let processor = DomProcessor::new(fast_config());
    let prior = processor
        .extract_element_map(&first, &(), None)
        .await
        .unwrap();

    let second = MockBrowser {
        snapshot: Some(snapshot_payload(&[
            Node::new("a", 102, [0.0, 30.0, 50.0, 20.0], 2).attr("href", "/b"),
            Node::new("a", 103, [0.0, 60.0, 50.0, 20.0], 1).attr("href", "/c"),
        ])),
        ax_tree: Some(json!({"nodes": []})),
        ..MockBrowser::default()
    };
    let map = processor
        .extract_element_map(&second, &(), Some(&prior))
        .await
        .unwrap();

    assert!(!map.by_backend_node_id(102).unwrap().is_new);
    assert!(map.by_backend_node_id(103).unwrap().is_new);
    assert!(map.to_token_string(0).contains("*[1] a"));

    // Without a prior map nothing is marked new.
    assert!(prior.elements.iter().all(|e| !e.is_new));
}

#[tokio::test]
async fn cursor_only_div_appears_in_map() {
    let browser = MockBrowser {
        snapshot: Some(snapshot_payload(&[Node::new(
            "div",
            30,
            [0.0, 0.0, 60.0, 20.0],
            3,
        )
        .cursor("pointer")
        .text("Go")])),
        ax_tree: Some(json!({"nodes": []})),
        ..MockBrowser::default()
    };

    let processor = DomProcessor::new(fast_config());
    let map = processor
        .extract_element_map(&browser, &(), None)
        .await
        .unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(map.by_index(0).unwrap().tag_name, "div");
}

#[tokio::test]
async fn ax_failure_is_absorbed() {
    let browser = MockBrowser {
        snapshot: Some(snapshot_payload(&[Node::new(
            "button",
            40,
            [0.0, 0.0, 80.0, 30.0],
            1,
        )
        .text("OK")])),
        ax_tree: None,
        ..MockBrowser::default()
    };

    let processor = DomProcessor::new(fast_config());
    let map = processor
        .extract_element_map(&browser, &(), None)
        .await
        .unwrap();

    assert_eq!(map.len(), 1);
    assert!(!map.by_index(0).unwrap().ax_focusable);
}

#[tokio::test]
async fn ax_data_is_merged_into_elements() {
    let browser = MockBrowser {
        snapshot: Some(snapshot_payload(&[Node::new(
            "div",
            50,
            [0.0, 0.0, 40.0, 40.0],
            1,
        )])),
        ax_tree: Some(json!({
            "nodes": [{
                "nodeId": "1",
                "backendDOMNodeId": 50,
                "role": {"type": "role", "value": "button"},
                "name": {"type": "computedString", "value": "Close dialog"},
                "properties": [
                    {"name": "focusable", "value": {"type": "booleanOrUndefined", "value": true}}
                ]
            }]
        })),
        ..MockBrowser::default()
    };

    let processor = DomProcessor::new(fast_config());
    let map = processor
        .extract_element_map(&browser, &(), None)
        .await
        .unwrap();

    // The AX focusable flag makes the bare div interactive, and the
    // merged role and name flow into the token rendering.
    assert_eq!(map.len(), 1);
    let el = map.by_index(0).unwrap();
    assert_eq!(el.role, "button");
    assert_eq!(el.name, "Close dialog");
    assert!(map.to_token_string(0).contains("role=button name=\"Close dialog\""));
}

#[tokio::test]
async fn snapshot_failure_falls_back_to_scripted_extraction() {
    let browser = MockBrowser {
        snapshot: None,
        ax_tree: Some(json!({"nodes": []})),
        html: Some(
            r#"<html><body>
                <a href="/about">About</a>
                <button>Go</button>
            </body></html>"#
                .to_string(),
        ),
        ..MockBrowser::default()
    };

    let processor = DomProcessor::new(fast_config());
    let map = processor
        .extract_element_map(&browser, &(), None)
        .await
        .unwrap();

    assert_eq!(map.len(), 2);
    // Fallback elements carry no protocol-sourced data.
    assert!(map.elements.iter().all(|e| e.backend_node_id == 0));
    assert!(map.elements.iter().all(|e| e.bounding_box.is_empty()));
    assert!(map.elements.iter().all(|e| !e.is_new));
}

#[tokio::test]
async fn zero_document_snapshot_also_falls_back() {
    let browser = MockBrowser {
        snapshot: Some(json!({"documents": [], "strings": []})),
        ax_tree: Some(json!({"nodes": []})),
        html: Some(r#"<button>Only me</button>"#.to_string()),
        ..MockBrowser::default()
    };

    let processor = DomProcessor::new(fast_config());
    let map = processor
        .extract_element_map(&browser, &(), None)
        .await
        .unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(map.by_index(0).unwrap().text, "Only me");
}

#[tokio::test]
async fn failing_fallback_fails_the_extraction() {
    let browser = MockBrowser {
        snapshot: None,
        ax_tree: Some(json!({"nodes": []})),
        html: None,
        ..MockBrowser::default()
    };

    let processor = DomProcessor::new(fast_config());
    let err = processor
        .extract_element_map(&browser, &(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PageLensError::ExtractionFailed(_)));
}

#[tokio::test]
async fn slow_protocol_calls_are_cancelled_at_the_deadline() {
    let browser = MockBrowser {
        snapshot: Some(snapshot_payload(&[])),
        ax_tree: Some(json!({"nodes": []})),
        snapshot_delay: Duration::from_secs(60),
        ..MockBrowser::default()
    };

    let config = ExtractionConfig {
        protocol_timeout_ms: 50,
        ..ExtractionConfig::default()
    };
    let processor = DomProcessor::new(config);
    let err = processor
        .extract_element_map(&browser, &(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PageLensError::Cancelled(_)));
}

#[tokio::test]
async fn map_invariants_hold_on_a_mixed_page() {
    let browser = MockBrowser {
        snapshot: Some(snapshot_payload(&[
            // Tooltip covering the second link.
            Node::new("div", 1, [200.0, 0.0, 120.0, 40.0], 900),
            Node::new("a", 2, [0.0, 0.0, 100.0, 20.0], 30).attr("href", "/a"),
            Node::new("a", 3, [205.0, 5.0, 100.0, 20.0], 20).attr("href", "/b"),
            // Icon inside the first link.
            Node::new("svg", 4, [2.0, 2.0, 16.0, 16.0], 35).cursor("pointer"),
            // Plain container, never interactive.
            Node::new("section", 5, [0.0, 100.0, 500.0, 300.0], 5),
        ])),
        ax_tree: Some(json!({"nodes": []})),
        ..MockBrowser::default()
    };

    let processor = DomProcessor::new(fast_config());
    let map = processor
        .extract_element_map(&browser, &(), None)
        .await
        .unwrap();

    // Indices are contiguous from zero and match positions.
    for (pos, el) in map.elements.iter().enumerate() {
        assert_eq!(el.index, pos);
    }
    // Backend lookup is consistent.
    for el in &map.elements {
        if el.backend_node_id > 0 {
            let found = map.by_backend_node_id(el.backend_node_id).unwrap();
            assert_eq!(found.index, el.index);
        }
    }
    // Nothing filtered survives.
    for el in &map.elements {
        assert!(el.is_visible);
        assert!(el.is_interactive);
        assert!(!el.is_occluded);
        assert!(!el.is_contained);
    }
    // Counters account for every candidate.
    assert_eq!(
        map.len()
            + map.stats.filtered_by_hidden
            + map.stats.filtered_by_paint
            + map.stats.filtered_by_contain,
        map.stats.total_elements
    );
    // Front-most-first ordering.
    for pair in map.elements.windows(2) {
        assert!(pair[0].paint_order >= pair[1].paint_order);
    }
}
