use crate::dom::ax::AxNode;

/// Tags that are always interactive.
const INTERACTIVE_TAGS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "details", "summary", "option", "optgroup",
];

/// ARIA roles that mark an element interactive.
const INTERACTIVE_ROLES: &[&str] = &[
    "button",
    "link",
    "textbox",
    "checkbox",
    "radio",
    "combobox",
    "listbox",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "option",
    "tab",
    "switch",
    "slider",
    "spinbutton",
    "searchbox",
    "gridcell",
    "treeitem",
];

/// Container tags that may still turn out interactive through roles,
/// handlers, accessibility flags, or cursor styling.
const AMBIGUOUS_CONTAINER_TAGS: &[&str] = &[
    "div", "span", "li", "tr", "td", "img", "svg", "label", "nav", "header", "footer", "article",
    "section",
];

pub fn is_interactive_tag(tag_name: &str) -> bool {
    INTERACTIVE_TAGS.contains(&tag_name)
}

/// Whether the snapshot parser should keep this tag as a candidate at all.
pub fn should_process_tag(tag_name: &str) -> bool {
    is_interactive_tag(tag_name) || AMBIGUOUS_CONTAINER_TAGS.contains(&tag_name)
}

/// Five-tier interactivity decision; the first tier to fire wins.
///
/// 1. Tag in the fixed interactive set.
/// 2. ARIA role in the fixed interactive set.
/// 3. Click handler attribute, or a tabindex other than "-1".
/// 4. Accessibility node asserts focusable or editable.
/// 5. Computed cursor is "pointer".
pub fn is_interactive(
    tag_name: &str,
    role: &str,
    has_click_handler: bool,
    tabindex: &str,
    cursor: &str,
    ax_node: Option<&AxNode>,
) -> bool {
    if is_interactive_tag(tag_name) {
        return true;
    }

    if INTERACTIVE_ROLES.contains(&role) {
        return true;
    }

    if has_click_handler {
        return true;
    }
    if !tabindex.is_empty() && tabindex != "-1" {
        return true;
    }

    if let Some(ax) = ax_node {
        if ax.bool_property("focusable") == Some(true) || ax.bool_property("editable") == Some(true)
        {
            return true;
        }
    }

    cursor == "pointer"
}

/// Overflow permits scrolling and the content exceeds the visible extent.
pub fn is_scrollable(
    overflow: &str,
    scroll_width: i64,
    scroll_height: i64,
    client_width: i64,
    client_height: i64,
) -> bool {
    let scrolls = overflow.contains("auto") || overflow.contains("scroll");
    let overflows = scroll_width > client_width || scroll_height > client_height;
    scrolls && overflows
}
