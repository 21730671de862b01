pub mod browser;
pub mod config;

pub use browser::{BrowserTrait, PageInfo, SNAPSHOT_COMPUTED_STYLES};
pub use config::{BrowserConfig, Config, ExtractionConfig, Viewport};
