use crate::dom::classify;
use crate::dom::element::{truncate, Element};
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Selectors that identify interactive markup without layout data.
const FALLBACK_SELECTORS: &[&str] = &[
    "a",
    "button",
    "input",
    "select",
    "textarea",
    "details",
    "summary",
    "option",
    "optgroup",
    "[onclick]",
    "[tabindex]",
    "[role='button']",
    "[role='link']",
    "[role='textbox']",
    "[role='checkbox']",
    "[role='radio']",
    "[role='combobox']",
    "[role='listbox']",
    "[role='menuitem']",
    "[role='tab']",
    "[role='switch']",
    "[role='slider']",
    "[role='spinbutton']",
    "[role='searchbox']",
];

/// Static extraction over the serialized document, used when the layout
/// snapshot cannot be captured or decoded. Produces elements with the
/// protocol-sourced fields left at their defaults: no bounds, no paint
/// order, no backend node id.
pub fn extract_from_html(html: &str, max_text_len: usize) -> Vec<Element> {
    let document = Html::parse_document(html);
    let mut elements = Vec::new();
    let mut seen = HashSet::new();

    for selector_str in FALLBACK_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };

        for node in document.select(&selector) {
            let value = node.value();
            let tag_name = value.name().to_lowercase();

            // The attribute selectors can match anything; only keep tags
            // the snapshot path would also have considered.
            if !classify::should_process_tag(&tag_name) {
                continue;
            }

            let fingerprint = format!(
                "{}_{}",
                tag_name,
                value
                    .attrs()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join("_")
            );
            if !seen.insert(fingerprint) {
                continue;
            }

            let role = value.attr("role").unwrap_or("");
            let tabindex = value.attr("tabindex").unwrap_or("");
            let has_click_handler = value.attr("onclick").is_some();
            if !classify::is_interactive(&tag_name, role, has_click_handler, tabindex, "", None) {
                continue;
            }

            let text = node.text().collect::<Vec<_>>().join(" ");
            let text = text.trim();

            let id = value.attr("id").unwrap_or("");
            let name = value.attr("name").unwrap_or("");
            let selector = if !id.is_empty() {
                format!("#{}", id)
            } else if !name.is_empty() {
                format!("{}[name=\"{}\"]", tag_name, name)
            } else {
                String::new()
            };

            let is_enabled = value.attr("disabled").is_none()
                && value.attr("aria-disabled") != Some("true");

            elements.push(Element {
                tag_name,
                role: role.to_string(),
                name: name.to_string(),
                text: truncate(text, max_text_len),
                input_type: value.attr("type").unwrap_or("").to_string(),
                href: value.attr("href").unwrap_or("").to_string(),
                placeholder: value.attr("placeholder").unwrap_or("").to_string(),
                aria_label: value.attr("aria-label").unwrap_or("").to_string(),
                is_visible: !is_statically_hidden(value),
                is_enabled,
                is_interactive: true,
                selector,
                ..Element::default()
            });
        }
    }

    elements
}

/// Hidden as far as static markup can tell: hidden inputs, the `hidden`
/// attribute, or inline display/visibility styles.
fn is_statically_hidden(value: &scraper::node::Element) -> bool {
    if value.attr("type") == Some("hidden") {
        return true;
    }
    if value.attr("hidden").is_some() {
        return true;
    }
    if let Some(style) = value.attr("style") {
        let style = style.to_lowercase();
        if style.contains("display:none")
            || style.contains("display: none")
            || style.contains("visibility:hidden")
            || style.contains("visibility: hidden")
        {
            return true;
        }
    }
    false
}
