use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub browser: BrowserConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport: Viewport,
    pub user_agent: Option<String>,
    pub disable_images: bool,
    pub args: Vec<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Upper bound on extracted element text, in characters.
    pub max_text_len: usize,
    /// Coverage ratio at which a lower-painted element counts as occluded.
    pub occlusion_threshold: f64,
    /// Coverage ratio at which an element counts as contained in an
    /// interactive parent.
    pub containment_threshold: f64,
    /// Deadline for the two concurrent protocol calls.
    pub protocol_timeout_ms: u64,
    /// Maximum entries emitted by the token serializer; 0 means all.
    pub max_token_elements: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            user_agent: None,
            disable_images: false,
            args: vec![],
            timeout_ms: 30000,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_text_len: 200,
            occlusion_threshold: 0.9,
            containment_threshold: 0.99,
            protocol_timeout_ms: 15000,
            max_token_elements: 0,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            device_scale_factor: 1.0,
        }
    }
}
