use crate::core::browser::{BrowserTrait, PageInfo, SNAPSHOT_COMPUTED_STYLES};
use crate::core::config::ExtractionConfig;
use crate::dom::ax::AxIndex;
use crate::dom::element::Element;
use crate::dom::state::ElementMap;
use crate::dom::{fallback, filters, snapshot};
use crate::errors::{PageLensError, Result};
use std::time::Duration;
use tracing::{debug, warn};

/// Runs the extraction pipeline against a live page.
///
/// One call fans out the two protocol requests, fuses their results, and
/// returns either a complete [`ElementMap`] or a failure; partial maps are
/// never returned. The processor holds no state between calls.
pub struct DomProcessor {
    config: ExtractionConfig,
}

impl DomProcessor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extracts the interactive element map for the page in `tab`.
    ///
    /// Supplying `previous` enables new-element marking. Backend node ids
    /// are only stable within one document tree, so prior maps must come
    /// from the same document; do not carry them across navigations.
    pub async fn extract_element_map<B: BrowserTrait>(
        &self,
        browser: &B,
        tab: &B::TabHandle,
        previous: Option<&ElementMap>,
    ) -> Result<ElementMap> {
        let info = match browser.page_info(tab).await {
            Ok(info) => info,
            Err(e) => {
                warn!("page info unavailable: {}", e);
                PageInfo::default()
            }
        };
        let mut map = ElementMap::new(info.url, info.title);

        let deadline = Duration::from_millis(self.config.protocol_timeout_ms);
        let (snapshot_result, ax_result) = tokio::time::timeout(deadline, async {
            tokio::join!(
                browser.capture_snapshot(tab, SNAPSHOT_COMPUTED_STYLES),
                browser.fetch_ax_tree(tab),
            )
        })
        .await
        .map_err(|_| {
            PageLensError::Cancelled(format!(
                "protocol calls did not complete within {}ms",
                self.config.protocol_timeout_ms
            ))
        })?;

        // A missing accessibility tree degrades the merge, nothing more.
        let ax_index = match ax_result {
            Ok(payload) => AxIndex::from_payload(&payload),
            Err(e) => {
                warn!("accessibility tree unavailable: {}", e);
                AxIndex::default()
            }
        };
        debug!(ax_nodes = ax_index.len(), "accessibility index built");

        let candidates = match snapshot_result {
            Ok(payload) => match snapshot::parse_snapshot(&payload, &ax_index, &self.config) {
                Ok(candidates) => Some(candidates),
                Err(e) => {
                    warn!("snapshot decode failed, using scripted fallback: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("snapshot call failed, using scripted fallback: {}", e);
                None
            }
        };

        match candidates {
            Some(mut candidates) => {
                filters::sort_by_paint_order(&mut candidates);
                filters::mark_occluded(&mut candidates, self.config.occlusion_threshold);
                filters::mark_contained(&mut candidates, self.config.containment_threshold);
                Self::index_survivors(&mut map, candidates, previous);
            }
            None => {
                let candidates = self.extract_fallback(browser, tab).await?;
                // Fallback elements carry no backend node ids, so a prior
                // map cannot meaningfully mark anything as new.
                Self::index_survivors(&mut map, candidates, None);
            }
        }

        debug!(
            elements = map.len(),
            total = map.stats.total_elements,
            hidden = map.stats.filtered_by_hidden,
            occluded = map.stats.filtered_by_paint,
            contained = map.stats.filtered_by_contain,
            "extraction complete"
        );
        Ok(map)
    }

    /// Scripted in-page extraction: serialize the document and mine it
    /// statically. Must succeed where the snapshot path could not.
    async fn extract_fallback<B: BrowserTrait>(
        &self,
        browser: &B,
        tab: &B::TabHandle,
    ) -> Result<Vec<Element>> {
        let html = browser
            .execute_script(tab, "document.documentElement.outerHTML")
            .await?;
        let html = html.as_str().ok_or_else(|| {
            PageLensError::ExtractionFailed("page source evaluation returned no string".to_string())
        })?;

        let candidates = fallback::extract_from_html(html, self.config.max_text_len);
        debug!(candidates = candidates.len(), "fallback extraction");
        Ok(candidates)
    }

    /// Walks candidates in their current (paint-ranked) order, drops the
    /// hidden, occluded, and contained ones, and densely indexes the rest.
    fn index_survivors(
        map: &mut ElementMap,
        candidates: Vec<Element>,
        previous: Option<&ElementMap>,
    ) {
        map.stats.total_elements = candidates.len();

        let mut index = 0;
        for mut el in candidates {
            if !el.is_interactive || !el.is_visible {
                map.stats.filtered_by_hidden += 1;
                continue;
            }
            if el.is_occluded {
                map.stats.filtered_by_paint += 1;
                continue;
            }
            if el.is_contained {
                map.stats.filtered_by_contain += 1;
                continue;
            }

            el.index = index;
            if let Some(prev) = previous {
                el.is_new = !prev.contains_backend_node(el.backend_node_id);
            }
            map.push(el);
            index += 1;
        }
    }
}
