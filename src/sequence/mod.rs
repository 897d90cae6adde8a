//! # Sequence Module
//!
//! Orders photos by capture time and composes them into the frame
//! sequence the encoder consumes.

pub mod builder;

pub use builder::{Direction, SequenceBuilder};
