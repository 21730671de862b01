use serde::{Deserialize, Serialize};

/// Axis-aligned element bounds in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A box with no painted extent.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn area(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// Area of the axis-aligned intersection with `other`.
    pub fn intersection_area(&self, other: &BoundingBox) -> f64 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }
        (x2 - x1) * (y2 - y1)
    }

    /// Fraction of this box covered by `other`, in `0.0..=1.0`.
    pub fn coverage_by(&self, other: &BoundingBox) -> f64 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }
        self.intersection_area(other) / area
    }
}

/// One interactive element as seen by a single extraction.
///
/// Carries the base record (tag, naming, flags, bounds) together with the
/// protocol-sourced data used by the filters: paint order, scroll extents,
/// cursor, and the merged accessibility block. Filter outcomes
/// (`is_occluded`, `is_contained`) are transient; elements that end up in
/// an [`ElementMap`](crate::dom::ElementMap) never carry them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Element {
    pub tag_name: String,
    pub role: String,
    pub name: String,
    pub text: String,
    pub input_type: String,
    pub href: String,
    pub placeholder: String,
    pub aria_label: String,

    pub is_visible: bool,
    pub is_enabled: bool,
    pub is_interactive: bool,
    pub is_focusable: bool,

    pub bounding_box: BoundingBox,
    /// Best-effort CSS selector; empty when no id or name attribute exists.
    pub selector: String,
    /// Dense position in the final map; assigned after filtering.
    pub index: usize,
    /// Stable node identity within one document tree.
    pub backend_node_id: i64,

    /// Browser paint rank; higher paints later and sits on top.
    pub paint_order: i64,
    pub computed_cursor: String,
    pub z_index: i64,
    pub is_scrollable: bool,
    pub scroll_width: i64,
    pub scroll_height: i64,
    pub client_width: i64,
    pub client_height: i64,
    pub is_occluded: bool,
    pub is_contained: bool,
    /// Absent from the prior map; only set when a prior map was supplied.
    pub is_new: bool,

    pub ax_focusable: bool,
    pub ax_editable: bool,
    pub ax_required: bool,
    pub ax_disabled: bool,
    pub ax_expanded: Option<bool>,
    pub ax_checked: Option<bool>,
    pub ax_selected: Option<bool>,
    pub ax_description: String,
}

/// Truncates to at most `max` characters, respecting char boundaries.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}
