//! Foundation types for relay-lint.
//!
//! This crate provides shared types used across the relay-lint stack.
//! It has zero external dependencies, making it suitable as a foundation layer.
//!
//! # Type Categories
//!
//! - **Language detection**: [`Language`]
//! - **Position types**: [`Position`], [`Range`], [`OffsetRange`]
//! - **Offset mapping**: [`LineIndex`]

mod language;
mod line_index;
mod position;

pub use language::Language;
pub use line_index::LineIndex;
pub use position::{OffsetRange, Position, Range};
