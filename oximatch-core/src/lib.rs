//! # OxiMatch Core
//!
//! Core components for the OxiMatch match-finding library.
//!
//! This crate provides the building blocks the LZ77 match finder runs on:
//!
//! - [`window`]: Sliding window with lookahead slack
//! - [`compare`]: Byte-range comparators (bytewise, wordwise, SIMD)
//! - [`level`]: Compression effort levels
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Parse driver                                            │
//! │     greedy / lazy evaluation, level presets             │
//! ├─────────────────────────────────────────────────────────┤
//! │ Match search                                            │
//! │     hash-chain walk, cutoffs, tie-break                 │
//! ├─────────────────────────────────────────────────────────┤
//! │ Primitives (this crate)                                 │
//! │     Window, Comparator, CompressionLevel                │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oximatch_core::{Comparator, Window};
//!
//! let mut window = Window::new(9).unwrap();
//! window.write(0, b"abcXYZabcXYZ").unwrap();
//!
//! let cmp = Comparator::detect();
//! let buf = window.as_slice();
//! assert_eq!(cmp.common_prefix(&buf[0..12], &buf[6..18]), 6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod compare;
#[cfg(feature = "simd")]
pub mod compare_simd;
pub mod error;
pub mod level;
pub mod window;

// Re-exports for convenience
pub use compare::{CompareKind, Comparator};
pub use error::{OxiMatchError, Result};
pub use level::CompressionLevel;
pub use window::{
    MAX_MATCH, MAX_WINDOW_BITS, MIN_LOOKAHEAD, MIN_MATCH, MIN_WINDOW_BITS, WINDOW_SLACK, Window,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::compare::{CompareKind, Comparator};
    pub use crate::error::{OxiMatchError, Result};
    pub use crate::level::CompressionLevel;
    pub use crate::window::{MAX_MATCH, MIN_LOOKAHEAD, MIN_MATCH, Window};
}
