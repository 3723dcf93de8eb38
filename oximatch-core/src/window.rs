//! Sliding window for LZ77 match finding.
//!
//! The window holds the most recently seen input. Its logical capacity is
//! twice the window size so that a full window of history can sit behind the
//! current position while the upper half is refilled. Past the logical
//! capacity the allocation carries [`WINDOW_SLACK`] extra bytes, so a match
//! extension starting anywhere below the capacity can read [`MAX_MATCH`]
//! bytes without a per-byte bounds check. Bytes past the valid input may be
//! stale; callers clamp match lengths to their lookahead.

use crate::error::{OxiMatchError, Result};

/// Minimum match length.
pub const MIN_MATCH: usize = 3;

/// Maximum match length.
pub const MAX_MATCH: usize = 258;

/// Minimum lookahead kept in front of the current position, except at the
/// end of the input.
pub const MIN_LOOKAHEAD: usize = MAX_MATCH + MIN_MATCH + 1;

/// Readable bytes allocated past the logical window capacity.
pub const WINDOW_SLACK: usize = MIN_LOOKAHEAD;

/// Smallest supported window size exponent.
pub const MIN_WINDOW_BITS: u8 = 9;

/// Largest supported window size exponent (32 KB, the DEFLATE maximum).
pub const MAX_WINDOW_BITS: u8 = 15;

/// A sliding window buffer with lookahead slack.
#[derive(Debug, Clone)]
pub struct Window {
    /// Backing storage: `2 * w_size + WINDOW_SLACK` bytes.
    buffer: Vec<u8>,
    /// Window size exponent.
    w_bits: u8,
    /// Window size (power of 2).
    w_size: usize,
    /// Mask for efficient modulo (w_size - 1).
    w_mask: usize,
}

impl Window {
    /// Create a new window of `1 << w_bits` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`OxiMatchError::InvalidWindowBits`] unless `w_bits` lies in
    /// `MIN_WINDOW_BITS..=MAX_WINDOW_BITS`.
    pub fn new(w_bits: u8) -> Result<Self> {
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&w_bits) {
            return Err(OxiMatchError::invalid_window_bits(
                w_bits,
                MIN_WINDOW_BITS,
                MAX_WINDOW_BITS,
            ));
        }

        Ok(Self::with_bits(w_bits))
    }

    /// Create a 32 KB window, as used by DEFLATE.
    pub fn deflate() -> Self {
        Self::with_bits(MAX_WINDOW_BITS)
    }

    /// Allocate for an exponent already known to be in range.
    fn with_bits(w_bits: u8) -> Self {
        let w_size = 1usize << w_bits;
        Self {
            buffer: vec![0; 2 * w_size + WINDOW_SLACK],
            w_bits,
            w_size,
            w_mask: w_size - 1,
        }
    }

    /// Window size exponent.
    pub fn w_bits(&self) -> u8 {
        self.w_bits
    }

    /// Window size in bytes.
    pub fn w_size(&self) -> usize {
        self.w_size
    }

    /// Mask applied to positions when indexing per-slot tables.
    pub fn w_mask(&self) -> usize {
        self.w_mask
    }

    /// Logical capacity (`2 * w_size`), excluding slack.
    pub fn capacity(&self) -> usize {
        2 * self.w_size
    }

    /// Largest match distance allowed for this window.
    ///
    /// A full [`MIN_LOOKAHEAD`] is reserved so that the current string never
    /// overlaps the bytes about to be slid out.
    pub fn max_dist(&self) -> usize {
        self.w_size - MIN_LOOKAHEAD
    }

    /// The whole allocation, slack included.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Byte at `pos`.
    #[inline]
    pub fn byte(&self, pos: usize) -> u8 {
        self.buffer[pos]
    }

    /// Write `data` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`OxiMatchError::BufferTooSmall`] if the data would run past
    /// the logical capacity.
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let end = offset.saturating_add(data.len());
        if end > self.capacity() {
            return Err(OxiMatchError::buffer_too_small(end, self.capacity()));
        }
        self.buffer[offset..end].copy_from_slice(data);
        Ok(())
    }

    /// Copy as much of `data` as fits between `offset` and the logical
    /// capacity. Returns the number of bytes copied.
    pub fn fill_from(&mut self, offset: usize, data: &[u8]) -> usize {
        let room = self.capacity().saturating_sub(offset);
        let count = room.min(data.len());
        if count == 0 {
            return 0;
        }
        self.buffer[offset..offset + count].copy_from_slice(&data[..count]);
        count
    }

    /// Move the upper half of the window down by `w_size` bytes.
    ///
    /// Positions held by callers must be rebased by the same amount.
    pub fn slide(&mut self) {
        let w_size = self.w_size;
        self.buffer.copy_within(w_size..2 * w_size, 0);
    }

    /// Zero the buffer.
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::deflate()
    }
}
