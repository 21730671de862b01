pub mod annotate;
pub mod digits;

pub use annotate::{annotate, AnnotationConfig};

use crate::core::browser::BrowserTrait;
use crate::dom::state::ElementMap;
use crate::errors::Result;
use base64::Engine;

/// Captures a screenshot and returns it base64-encoded, ready for an
/// inline image payload.
pub async fn capture_base64<B: BrowserTrait>(browser: &B, tab: &B::TabHandle) -> Result<String> {
    let bytes = browser.take_screenshot(tab).await?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// Captures a screenshot, annotates it with the element map, and writes
/// the result to `path`.
pub async fn save_annotated<B: BrowserTrait>(
    browser: &B,
    tab: &B::TabHandle,
    map: &ElementMap,
    config: &AnnotationConfig,
    path: &str,
) -> Result<()> {
    let bytes = browser.take_screenshot(tab).await?;
    let annotated = annotate(&bytes, map, config)?;
    tokio::fs::write(path, annotated).await?;
    Ok(())
}
