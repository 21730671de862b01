use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageLensError {
    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("Browser not launched")]
    BrowserNotLaunched,

    #[error("Tab creation failed: {0}")]
    TabCreationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Protocol call failed in {stage}: {reason}")]
    Protocol { stage: &'static str, reason: String },

    #[error("Snapshot decode failed: {0}")]
    SnapshotDecode(String),

    #[error("Extraction cancelled: {0}")]
    Cancelled(String),

    #[error("DOM extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("JavaScript execution failed: {0}")]
    JavaScriptFailed(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("Image decode failed: {0}")]
    ImageDecode(String),

    #[error("Image encode failed: {0}")]
    ImageEncode(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, PageLensError>;

// Convert anyhow::Error to PageLensError
impl From<anyhow::Error> for PageLensError {
    fn from(err: anyhow::Error) -> Self {
        PageLensError::ExtractionFailed(err.to_string())
    }
}
