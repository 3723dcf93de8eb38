//! Byte-range comparators for match extension.
//!
//! A comparator counts how many leading bytes two ranges have in common,
//! capped at [`MAX_MATCH`]. This is the innermost loop of match finding, so
//! several realizations exist:
//!
//! - [`CompareKind::Bytewise`]: one byte at a time, the reference.
//! - [`CompareKind::Wordwise`]: eight bytes at a time; the first differing
//!   byte is located with a trailing-zero count on the XOR of two
//!   little-endian words.
//! - [`CompareKind::Sse2`], [`CompareKind::Avx2`], [`CompareKind::Neon`]:
//!   explicit vector compares, available with the `simd` feature.
//!
//! Every kind returns exactly what the bytewise scan returns for the same
//! input. The choice only affects throughput.
//!
//! ## Example
//!
//! ```rust
//! use oximatch_core::compare::{CompareKind, Comparator};
//!
//! let cmp = Comparator::detect();
//! assert_eq!(cmp.common_prefix(b"abcdef", b"abcxyz"), 3);
//!
//! let reference = Comparator::new(CompareKind::Bytewise).unwrap();
//! assert_eq!(reference.common_prefix(b"same", b"same"), 4);
//! ```

use std::fmt;

use crate::error::{OxiMatchError, Result};
use crate::window::MAX_MATCH;

/// Signature shared by every comparator realization.
///
/// Implementations compare the first `min(a.len(), b.len())` bytes.
/// Vector realizations may only be called once the CPU features they were
/// compiled for are known to be present.
type CompareFn = unsafe fn(&[u8], &[u8]) -> usize;

/// Realization used by a [`Comparator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareKind {
    /// Byte-at-a-time scan.
    Bytewise,
    /// 64-bit word-at-a-time scan.
    Wordwise,
    /// 16-byte SSE2 compares (x86_64).
    Sse2,
    /// 32-byte AVX2 compares (x86_64, runtime detected).
    Avx2,
    /// 16-byte NEON compares (aarch64).
    Neon,
}

impl CompareKind {
    /// Every kind, in increasing order of preference.
    pub const ALL: [CompareKind; 5] = [
        CompareKind::Bytewise,
        CompareKind::Wordwise,
        CompareKind::Neon,
        CompareKind::Sse2,
        CompareKind::Avx2,
    ];

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            CompareKind::Bytewise => "bytewise",
            CompareKind::Wordwise => "wordwise",
            CompareKind::Sse2 => "sse2",
            CompareKind::Avx2 => "avx2",
            CompareKind::Neon => "neon",
        }
    }

    /// Whether this kind can run in this build on this CPU.
    pub fn is_available(self) -> bool {
        resolve(self).is_some()
    }
}

impl fmt::Display for CompareKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved comparator.
///
/// The realization is picked once, when the comparator is built, and stored
/// as a function pointer so the hot path carries no per-call dispatch.
#[derive(Clone, Copy)]
pub struct Comparator {
    kind: CompareKind,
    compare_fn: CompareFn,
}

impl Comparator {
    /// Build a comparator of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`OxiMatchError::UnsupportedComparator`] if the kind was not
    /// compiled in or the CPU lacks the required features.
    pub fn new(kind: CompareKind) -> Result<Self> {
        resolve(kind)
            .map(|compare_fn| Self { kind, compare_fn })
            .ok_or_else(|| OxiMatchError::unsupported_comparator(kind.name()))
    }

    /// The byte-at-a-time reference comparator.
    pub fn bytewise() -> Self {
        Self {
            kind: CompareKind::Bytewise,
            compare_fn: scalar::bytewise,
        }
    }

    /// The portable word-at-a-time comparator.
    pub fn wordwise() -> Self {
        Self {
            kind: CompareKind::Wordwise,
            compare_fn: scalar::wordwise,
        }
    }

    /// The fastest comparator available on this machine.
    pub fn detect() -> Self {
        let best = CompareKind::ALL
            .iter()
            .rev()
            .find_map(|&kind| Self::new(kind).ok())
            .unwrap_or_else(Self::wordwise);
        log::debug!("selected {} byte-range comparator", best.kind);
        best
    }

    /// Every kind usable on this machine, in increasing order of preference.
    pub fn available() -> Vec<CompareKind> {
        CompareKind::ALL
            .iter()
            .copied()
            .filter(|kind| kind.is_available())
            .collect()
    }

    /// The realization in use.
    pub fn kind(&self) -> CompareKind {
        self.kind
    }

    /// Count the leading bytes `a` and `b` have in common, capped at
    /// `min(a.len(), b.len(), MAX_MATCH)`.
    #[inline]
    pub fn common_prefix(&self, a: &[u8], b: &[u8]) -> usize {
        let len = a.len().min(b.len()).min(MAX_MATCH);
        if len == 0 {
            return 0;
        }
        // SAFETY: `compare_fn` came from `resolve`, which only hands out
        // vector realizations after confirming the CPU supports them. Both
        // slices are trimmed to `len`, so every read stays in bounds.
        unsafe { (self.compare_fn)(&a[..len], &b[..len]) }
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::detect()
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator")
            .field("kind", &self.kind)
            .finish()
    }
}

impl PartialEq for Comparator {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Comparator {}

/// Map a kind to its realization, if it can run here.
fn resolve(kind: CompareKind) -> Option<CompareFn> {
    match kind {
        CompareKind::Bytewise => Some(scalar::bytewise as CompareFn),
        CompareKind::Wordwise => Some(scalar::wordwise as CompareFn),
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        CompareKind::Sse2 => Some(crate::compare_simd::x86::common_prefix_sse2 as CompareFn),
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        CompareKind::Avx2 if crate::compare_simd::x86::has_avx2() => {
            Some(crate::compare_simd::x86::common_prefix_avx2 as CompareFn)
        }
        #[cfg(all(feature = "simd", target_arch = "aarch64"))]
        CompareKind::Neon if crate::compare_simd::aarch64::has_neon() => {
            Some(crate::compare_simd::aarch64::common_prefix_neon as CompareFn)
        }
        _ => None,
    }
}

/// Portable comparators.
pub mod scalar {
    /// Byte-at-a-time common prefix length of `a` and `b`.
    pub fn bytewise(a: &[u8], b: &[u8]) -> usize {
        a.iter().zip(b).take_while(|(x, y)| x == y).count()
    }

    /// Word-at-a-time common prefix length of `a` and `b`.
    ///
    /// Words are loaded little-endian regardless of the host, so the lowest
    /// set bit of the XOR always belongs to the earliest differing byte.
    pub fn wordwise(a: &[u8], b: &[u8]) -> usize {
        let len = a.len().min(b.len());
        let mut i = 0;

        while i + 8 <= len {
            let diff = load_u64_le(&a[i..i + 8]) ^ load_u64_le(&b[i..i + 8]);
            if diff != 0 {
                return i + (diff.trailing_zeros() / 8) as usize;
            }
            i += 8;
        }

        while i < len && a[i] == b[i] {
            i += 1;
        }
        i
    }

    #[inline(always)]
    fn load_u64_le(bytes: &[u8]) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(bytes);
        u64::from_le_bytes(word)
    }
}
