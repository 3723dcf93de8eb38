//! # OxiMatch LZ77
//!
//! Pure Rust hash-chain longest-match search for LZ77 compressors, in the
//! DEFLATE tradition.
//!
//! The heart of this crate is [`MatchFinder::longest_match`]: given the
//! current position, the head of its hash chain, and the search parameters,
//! it walks the chain and returns the longest earlier match within the
//! distance limit. Everything else exists to drive it.
//!
//! ## Features
//!
//! - **Match search**: chain walk with cheap candidate rejection, "good
//!   match" budget reduction, "nice match" cutoff, and low-level early exit
//!   - Byte comparison resolved once per finder (bytewise, wordwise, SSE2,
//!     AVX2, NEON), with identical results for every realization
//! - **Hash chains**: 3-byte hashing, insertion, window slide rebasing
//! - **Parse driver**: greedy (levels 1-3) and lazy (levels 4-9) parsing into
//!   [`Lz77Token`]s, preset dictionaries, and a reference [`expand`]
//!
//! ## Example
//!
//! ```rust
//! use oximatch_lz77::{Lz77Parser, Lz77Token, expand};
//!
//! let input = b"_Hello, World! Hello, World!";
//! let tokens = Lz77Parser::parse_all(input, 6);
//!
//! assert!(tokens.iter().any(|t| matches!(t, Lz77Token::Match { .. })));
//! assert_eq!(expand(&tokens, &[]).unwrap(), input);
//! ```
//!
//! ## Compression Levels
//!
//! - Level 0: No matching (literals only)
//! - Level 1-3: Greedy parsing, early exit from the chain walk
//! - Level 4: Lazy parsing, early exit from the chain walk
//! - Level 5-9: Lazy parsing, full chain walk within the budget

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod chain;
pub mod matcher;
pub mod params;
pub mod parse;

// Re-exports
pub use chain::{ChainIndex, HashChain, NIL};
pub use matcher::{Match, MatchFinder};
pub use params::{
    CONFIGURATION_TABLE, LevelConfig, ParseStrategy, SearchParams, TOO_FAR, TRIGGER_LEVEL,
};
pub use parse::{Lz77Parser, Lz77Token, expand};

pub use oximatch_core::{
    CompareKind, Comparator, CompressionLevel, MAX_MATCH, MIN_LOOKAHEAD, MIN_MATCH,
    OxiMatchError, Result, Window,
};
