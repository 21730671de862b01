use crate::errors::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Computed style names requested with the layout snapshot, in the exact
/// order the snapshot parser reads them back.
pub const SNAPSHOT_COMPUTED_STYLES: &[&str] = &[
    "display",
    "visibility",
    "opacity",
    "cursor",
    "pointer-events",
    "overflow",
];

/// Current URL and title of a page, best effort.
#[derive(Debug, Clone, Default)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
}

#[async_trait]
pub trait BrowserTrait: Send + Sync {
    type TabHandle: Send + Sync;

    /// Launch a new browser instance
    async fn launch(&mut self, config: &crate::core::Config) -> Result<()>;

    /// Create a new tab/page
    async fn new_tab(&self) -> Result<Self::TabHandle>;

    /// Navigate to a URL
    async fn navigate(&self, tab: &Self::TabHandle, url: &str) -> Result<()>;

    /// Execute JavaScript in the browser
    async fn execute_script(&self, tab: &Self::TabHandle, script: &str) -> Result<Value>;

    /// Take a screenshot
    async fn take_screenshot(&self, tab: &Self::TabHandle) -> Result<Vec<u8>>;

    /// Capture a layout-inclusive DOM snapshot (columnar payload) with the
    /// given computed styles resolved per layout node
    async fn capture_snapshot(
        &self,
        tab: &Self::TabHandle,
        computed_styles: &[&str],
    ) -> Result<Value>;

    /// Fetch the full accessibility tree for the page
    async fn fetch_ax_tree(&self, tab: &Self::TabHandle) -> Result<Value>;

    /// Get current URL and title
    async fn page_info(&self, tab: &Self::TabHandle) -> Result<PageInfo>;

    /// Check if browser is still running
    fn is_running(&self) -> bool;

    /// Close the browser
    async fn close(&mut self) -> Result<()>;
}
