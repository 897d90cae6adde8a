//! # Photo Module
//!
//! Source photo handles and the metadata readers that derive ordering
//! and orientation from them.

pub mod date;
pub mod orientation;
pub mod types;

pub use date::{extract, CaptureTimestamp};
pub use orientation::Orientation;
pub use types::Photo;
