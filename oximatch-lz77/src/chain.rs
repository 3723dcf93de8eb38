//! Hash chains over the sliding window.
//!
//! Every window position is linked to the previous position whose first
//! three bytes hashed to the same bucket, giving a most-recent-first list
//! per bucket. The match search only reads these links through
//! [`ChainIndex`]; [`HashChain`] is the reference provider that builds them.

use oximatch_core::{MAX_WINDOW_BITS, MIN_MATCH, MIN_WINDOW_BITS, OxiMatchError, Result};

/// Position value that ends every chain.
pub const NIL: usize = 0;

/// Smallest supported hash table exponent.
pub const MIN_HASH_BITS: u8 = 8;

/// Largest supported hash table exponent.
pub const MAX_HASH_BITS: u8 = 16;

/// Read access to chain links.
///
/// `prev_link(pos)` returns the previous position sharing `pos`'s hash, or
/// [`NIL`]. Implementations index their per-slot table modulo the window
/// size. A link that does not point strictly below `pos` ends the walk.
pub trait ChainIndex {
    /// Previous position in `pos`'s chain.
    fn prev_link(&self, pos: usize) -> usize;
}

/// Reference hash-chain index.
#[derive(Debug, Clone)]
pub struct HashChain {
    /// Hash table: maps hash -> most recent position.
    head: Vec<u16>,
    /// Hash chain: previous position with same hash, per window slot.
    prev: Vec<u16>,
    /// Mask for hash values.
    hash_mask: usize,
    /// Mask for window slots.
    w_mask: usize,
}

impl HashChain {
    /// Create a chain for a `1 << w_bits` window with `1 << hash_bits`
    /// buckets.
    ///
    /// # Errors
    ///
    /// Returns [`OxiMatchError::InvalidWindowBits`] or
    /// [`OxiMatchError::InvalidHashBits`] for out-of-range exponents.
    pub fn new(w_bits: u8, hash_bits: u8) -> Result<Self> {
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&w_bits) {
            return Err(OxiMatchError::invalid_window_bits(
                w_bits,
                MIN_WINDOW_BITS,
                MAX_WINDOW_BITS,
            ));
        }
        if !(MIN_HASH_BITS..=MAX_HASH_BITS).contains(&hash_bits) {
            return Err(OxiMatchError::invalid_hash_bits(
                hash_bits,
                MIN_HASH_BITS,
                MAX_HASH_BITS,
            ));
        }

        Ok(Self::with_bits(w_bits, hash_bits))
    }

    /// Create a chain sized for DEFLATE (32 KB window, 32K buckets).
    pub fn deflate() -> Self {
        Self::with_bits(MAX_WINDOW_BITS, MAX_WINDOW_BITS)
    }

    fn with_bits(w_bits: u8, hash_bits: u8) -> Self {
        let w_size = 1usize << w_bits;
        let hash_size = 1usize << hash_bits;
        Self {
            head: vec![0; hash_size],
            prev: vec![0; w_size],
            hash_mask: hash_size - 1,
            w_mask: w_size - 1,
        }
    }

    /// Compute hash for 3 bytes using multiply-and-mix for better
    /// distribution.
    #[inline(always)]
    fn hash(&self, b0: u8, b1: u8, b2: u8) -> usize {
        let h = ((b0 as usize).wrapping_mul(506832829))
            ^ ((b1 as usize).wrapping_mul(2654435761) << 8)
            ^ ((b2 as usize).wrapping_mul(374761393) << 16);
        (h ^ (h >> 15)) & self.hash_mask
    }

    #[inline]
    fn bucket(&self, window: &[u8], pos: usize) -> usize {
        self.hash(window[pos], window[pos + 1], window[pos + 2])
    }

    /// Most recent position in the bucket of the string at `pos`, without
    /// inserting it.
    pub fn head(&self, window: &[u8], pos: usize) -> usize {
        self.head[self.bucket(window, pos)] as usize
    }

    /// Insert the string at `pos` and return the previous bucket head.
    ///
    /// The `MIN_MATCH` bytes at `pos` must already be in the window.
    #[inline]
    pub fn insert(&mut self, window: &[u8], pos: usize) -> usize {
        debug_assert!(pos + MIN_MATCH <= window.len(), "insert past window end");
        debug_assert!(pos <= u16::MAX as usize, "position does not fit a chain slot");

        let h = self.bucket(window, pos);
        let head = self.head[h];
        self.prev[pos & self.w_mask] = head;
        self.head[h] = pos as u16;
        head as usize
    }

    /// Set the link for `pos` directly.
    ///
    /// For providers that compute their own hashes.
    pub fn link(&mut self, pos: usize, prev: usize) {
        debug_assert!(prev <= u16::MAX as usize, "position does not fit a chain slot");
        self.prev[pos & self.w_mask] = prev as u16;
    }

    /// Rebase every entry after the window slid down by `w_size` bytes.
    ///
    /// Entries that fall out of the window become [`NIL`].
    pub fn slide(&mut self, w_size: usize) {
        let slide = w_size as u16;
        for entry in self.head.iter_mut().chain(self.prev.iter_mut()) {
            *entry = entry.saturating_sub(slide);
        }
    }

    /// Clear all links.
    pub fn reset(&mut self) {
        self.head.fill(0);
        self.prev.fill(0);
    }
}

impl Default for HashChain {
    fn default() -> Self {
        Self::deflate()
    }
}

impl ChainIndex for HashChain {
    #[inline]
    fn prev_link(&self, pos: usize) -> usize {
        self.prev[pos & self.w_mask] as usize
    }
}

impl<T: ChainIndex + ?Sized> ChainIndex for &T {
    #[inline]
    fn prev_link(&self, pos: usize) -> usize {
        (**self).prev_link(pos)
    }
}
