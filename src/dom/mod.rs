pub mod ax;
pub mod classify;
pub mod element;
pub mod fallback;
pub mod filters;
pub mod processor;
pub mod snapshot;
pub mod state;

pub use element::{BoundingBox, Element};
pub use processor::DomProcessor;
pub use state::{ElementMap, ExtractionStats};
