use crate::core::{BrowserTrait, Config, PageInfo};
use crate::errors::{PageLensError, Result};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::types::Method;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsStr;
use std::sync::Arc;

/// `DOMSnapshot.captureSnapshot` with layout and paint-order data. The
/// return payload is kept as raw JSON; the snapshot parser owns its shape.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CaptureSnapshot {
    computed_styles: Vec<String>,
    include_dom_rects: bool,
    include_paint_order: bool,
    include_text_color_opacities: bool,
}

impl Method for CaptureSnapshot {
    const NAME: &'static str = "DOMSnapshot.captureSnapshot";
    type ReturnObject = Value;
}

#[derive(Debug, Serialize)]
struct AccessibilityEnable {}

impl Method for AccessibilityEnable {
    const NAME: &'static str = "Accessibility.enable";
    type ReturnObject = Value;
}

#[derive(Debug, Serialize)]
struct GetFullAxTree {}

impl Method for GetFullAxTree {
    const NAME: &'static str = "Accessibility.getFullAXTree";
    type ReturnObject = Value;
}

/// Chrome browser implementation
pub struct ChromeBrowser {
    browser: Option<Browser>,
}

impl ChromeBrowser {
    pub fn new() -> Self {
        Self { browser: None }
    }
}

impl Default for ChromeBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserTrait for ChromeBrowser {
    type TabHandle = Arc<Tab>;

    async fn launch(&mut self, config: &Config) -> Result<()> {
        let window_size_arg = format!(
            "--window-size={},{}",
            config.browser.viewport.width, config.browser.viewport.height
        );

        let user_agent_arg = config
            .browser
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));

        let mut args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new(&window_size_arg),
        ];

        if let Some(ref ua_arg) = user_agent_arg {
            args.push(OsStr::new(ua_arg));
        }

        if config.browser.disable_images {
            args.push(OsStr::new("--blink-settings=imagesEnabled=false"));
        }

        for arg in &config.browser.args {
            args.push(OsStr::new(arg));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.browser.headless)
            .args(args)
            .build()
            .map_err(|e| PageLensError::LaunchFailed(e.to_string()))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| PageLensError::LaunchFailed(e.to_string()))?;

        self.browser = Some(browser);
        Ok(())
    }

    async fn new_tab(&self) -> Result<Self::TabHandle> {
        let browser = self
            .browser
            .as_ref()
            .ok_or(PageLensError::BrowserNotLaunched)?;

        let tab = browser
            .new_tab()
            .map_err(|e| PageLensError::TabCreationFailed(e.to_string()))?;

        Ok(tab)
    }

    async fn navigate(&self, tab: &Self::TabHandle, url: &str) -> Result<()> {
        tab.navigate_to(url)
            .map_err(|e| PageLensError::NavigationFailed(e.to_string()))?;

        tab.wait_until_navigated()
            .map_err(|e| PageLensError::NavigationFailed(e.to_string()))?;

        Ok(())
    }

    async fn execute_script(&self, tab: &Self::TabHandle, script: &str) -> Result<Value> {
        let result = tab
            .evaluate(script, false)
            .map_err(|e| PageLensError::JavaScriptFailed(e.to_string()))?;

        Ok(result.value.unwrap_or(Value::Null))
    }

    async fn take_screenshot(&self, tab: &Self::TabHandle) -> Result<Vec<u8>> {
        let screenshot = tab
            .capture_screenshot(
                headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption::Png,
                None,
                None,
                true,
            )
            .map_err(|e| PageLensError::ScreenshotFailed(e.to_string()))?;

        Ok(screenshot)
    }

    async fn capture_snapshot(
        &self,
        tab: &Self::TabHandle,
        computed_styles: &[&str],
    ) -> Result<Value> {
        let tab = tab.clone();
        let computed_styles: Vec<String> =
            computed_styles.iter().map(|s| s.to_string()).collect();

        // headless_chrome calls block; run on the blocking pool so the
        // accessibility fetch can proceed alongside.
        tokio::task::spawn_blocking(move || {
            tab.call_method(CaptureSnapshot {
                computed_styles,
                include_dom_rects: true,
                include_paint_order: true,
                include_text_color_opacities: false,
            })
            .map_err(|e| PageLensError::Protocol {
                stage: "snapshot",
                reason: e.to_string(),
            })
        })
        .await
        .map_err(|e| PageLensError::Protocol {
            stage: "snapshot",
            reason: e.to_string(),
        })?
    }

    async fn fetch_ax_tree(&self, tab: &Self::TabHandle) -> Result<Value> {
        let tab = tab.clone();

        tokio::task::spawn_blocking(move || {
            tab.call_method(AccessibilityEnable {})
                .map_err(|e| PageLensError::Protocol {
                    stage: "ax-tree",
                    reason: e.to_string(),
                })?;
            tab.call_method(GetFullAxTree {})
                .map_err(|e| PageLensError::Protocol {
                    stage: "ax-tree",
                    reason: e.to_string(),
                })
        })
        .await
        .map_err(|e| PageLensError::Protocol {
            stage: "ax-tree",
            reason: e.to_string(),
        })?
    }

    async fn page_info(&self, tab: &Self::TabHandle) -> Result<PageInfo> {
        let url = tab.get_url();
        let title = self
            .execute_script(tab, "document.title")
            .await?
            .as_str()
            .unwrap_or("")
            .to_string();

        Ok(PageInfo { url, title })
    }

    fn is_running(&self) -> bool {
        self.browser.is_some()
    }

    async fn close(&mut self) -> Result<()> {
        self.browser = None;
        Ok(())
    }
}
