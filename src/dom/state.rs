use crate::dom::element::{truncate, Element};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write;

/// Counters describing what one extraction saw and dropped.
///
/// `total_elements` counts every parsed candidate; the three `filtered_*`
/// counters plus the retained elements always sum back to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub total_elements: usize,
    pub filtered_by_paint: usize,
    pub filtered_by_contain: usize,
    pub filtered_by_hidden: usize,
}

/// The dense-indexed inventory of interactive elements on a page.
///
/// Elements are ordered front-most first (descending paint order) and
/// `index` always equals an element's position in the list. The map is
/// built by one extraction call and read-only afterwards; callers keep it
/// around only to feed the next extraction as the prior reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementMap {
    pub page_url: String,
    pub page_title: String,
    pub elements: Vec<Element>,
    #[serde(skip)]
    backend_index: HashMap<i64, usize>,
    pub stats: ExtractionStats,
    pub captured_at: chrono::DateTime<chrono::Utc>,
}

impl ElementMap {
    pub fn new(page_url: String, page_title: String) -> Self {
        Self {
            page_url,
            page_title,
            elements: Vec::new(),
            backend_index: HashMap::new(),
            stats: ExtractionStats::default(),
            captured_at: chrono::Utc::now(),
        }
    }

    /// Appends an element. Extraction assigns `index` to the position the
    /// element will land in before pushing.
    pub(crate) fn push(&mut self, element: Element) {
        if element.backend_node_id > 0 {
            self.backend_index
                .insert(element.backend_node_id, self.elements.len());
        }
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn by_index(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn by_backend_node_id(&self, backend_node_id: i64) -> Option<&Element> {
        self.backend_index
            .get(&backend_node_id)
            .and_then(|&pos| self.elements.get(pos))
    }

    pub fn contains_backend_node(&self, backend_node_id: i64) -> bool {
        self.backend_index.contains_key(&backend_node_id)
    }

    /// Renders the map as deterministic line-per-element text for LLM
    /// consumption.
    ///
    /// When `max_elements` is positive, only that many visible entries are
    /// emitted and the header switches to "X of Y shown". A `*` prefix
    /// marks elements that were absent from the prior map.
    pub fn to_token_string(&self, max_elements: usize) -> String {
        let visible = self.elements.iter().filter(|e| e.is_visible).count();

        let mut out = String::new();
        let _ = writeln!(out, "Page: {}", self.page_title);
        let _ = writeln!(out, "URL: {}", self.page_url);
        if max_elements > 0 && visible > max_elements {
            let _ = writeln!(out, "Elements ({} of {} shown):", max_elements, visible);
        } else {
            let _ = writeln!(out, "Elements ({}):", visible);
        }

        let mut count = 0;
        for el in &self.elements {
            if !el.is_visible {
                continue;
            }
            if max_elements > 0 && count >= max_elements {
                break;
            }
            count += 1;

            if el.is_new {
                out.push('*');
            }
            let _ = write!(out, "[{}] {}", el.index, el.tag_name);

            if !el.role.is_empty() && el.role != el.tag_name {
                let _ = write!(out, " role={}", el.role);
            }

            if !el.name.is_empty() {
                let _ = write!(out, " name=\"{}\"", truncate(&el.name, 50));
            } else if !el.text.is_empty() {
                let _ = write!(out, " \"{}\"", truncate(&el.text, 50));
            } else if !el.aria_label.is_empty() {
                let _ = write!(out, " aria=\"{}\"", truncate(&el.aria_label, 50));
            } else if !el.placeholder.is_empty() {
                let _ = write!(out, " placeholder=\"{}\"", truncate(&el.placeholder, 50));
            }

            if !el.input_type.is_empty() {
                let _ = write!(out, " type={}", el.input_type);
            }

            if !el.href.is_empty() {
                let _ = write!(out, " href=\"{}\"", truncate(&el.href, 80));
            }

            if el.is_scrollable {
                out.push_str(" |SCROLL|");
            }

            if !el.is_enabled {
                out.push_str(" [disabled]");
            }

            out.push('\n');
        }

        out
    }
}
