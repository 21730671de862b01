pub mod types;

pub use types::{PageLensError, Result};
