//! Interactive element extraction and screenshot annotation for AI agents.
//!
//! `pagelens` turns a live web page into a compact, numerically indexed
//! inventory of its clickable, typeable, and scrollable elements, and can
//! draw that inventory back onto captured screenshots. An LLM (or any other
//! driver) receives the token rendering plus an annotated image whose
//! boxes carry the same indices, so it can act on "element N" without ever
//! seeing raw DOM.
//!
//! # Architecture
//!
//! - **Core**: the browser collaborator trait and configuration
//! - **Browser**: Chrome implementation over the debugger protocol
//! - **DOM**: snapshot parsing, accessibility fusion, classification,
//!   geometric filtering, and the element map
//! - **Screenshot**: border and index-label annotation with pure pixel
//!   operations
//! - **Errors**: error handling across all stages
//!
//! # Extraction pipeline
//!
//! One extraction issues two concurrent protocol calls (a layout-inclusive
//! DOM snapshot and the full accessibility tree), fuses the results,
//! classifies interactivity in five tiers, prunes occluded and
//! redundantly nested elements by geometry, diffs against an optional
//! prior map to mark new elements, and returns a densely indexed
//! [`ElementMap`].

pub mod browser;
pub mod core;
pub mod dom;
pub mod errors;
pub mod screenshot;

pub use browser::ChromeBrowser;
pub use core::{BrowserConfig, BrowserTrait, Config, ExtractionConfig, PageInfo, Viewport};
pub use dom::{BoundingBox, DomProcessor, Element, ElementMap, ExtractionStats};
pub use errors::{PageLensError, Result};
pub use screenshot::{annotate, AnnotationConfig};
