//! SIMD-accelerated byte-range comparators
//!
//! This module provides vectorized common-prefix scans using:
//! - SSE2 (16 bytes per step, x86_64 baseline)
//! - AVX2 (32 bytes per step, detected at runtime on x86_64)
//! - NEON (16 bytes per step on aarch64)
//!
//! Each step compares two vectors lane by lane, reduces the result to a
//! bitmask with one or more bits per byte, and locates the first differing
//! byte with a trailing-zero count. Tails shorter than a vector fall back to
//! the portable word-at-a-time scan, so results are identical to the
//! bytewise reference.

/// x86_64 SSE2/AVX2 comparators
#[cfg(target_arch = "x86_64")]
pub mod x86 {
    use crate::compare::scalar;
    use core::arch::x86_64::*;

    /// Check if AVX2 is available at runtime
    #[inline]
    pub fn has_avx2() -> bool {
        #[cfg(target_feature = "avx2")]
        {
            true
        }
        #[cfg(not(target_feature = "avx2"))]
        {
            is_x86_feature_detected!("avx2")
        }
    }

    /// Common prefix length using 16-byte SSE2 compares
    ///
    /// # Safety
    ///
    /// Requires SSE2, which every x86_64 CPU provides.
    #[target_feature(enable = "sse2")]
    pub unsafe fn common_prefix_sse2(a: &[u8], b: &[u8]) -> usize {
        let len = a.len().min(b.len());
        let mut i = 0;

        unsafe {
            while i + 16 <= len {
                let va = _mm_loadu_si128(a.as_ptr().add(i).cast());
                let vb = _mm_loadu_si128(b.as_ptr().add(i).cast());
                let mask = _mm_movemask_epi8(_mm_cmpeq_epi8(va, vb)) as u32;
                if mask != 0xFFFF {
                    return i + (!mask).trailing_zeros() as usize;
                }
                i += 16;
            }
        }

        i + scalar::wordwise(&a[i..len], &b[i..len])
    }

    /// Common prefix length using 32-byte AVX2 compares
    ///
    /// # Safety
    ///
    /// Requires AVX2. Caller must verify `has_avx2()` returns true.
    #[target_feature(enable = "avx2")]
    pub unsafe fn common_prefix_avx2(a: &[u8], b: &[u8]) -> usize {
        let len = a.len().min(b.len());
        let mut i = 0;

        unsafe {
            while i + 32 <= len {
                let va = _mm256_loadu_si256(a.as_ptr().add(i).cast());
                let vb = _mm256_loadu_si256(b.as_ptr().add(i).cast());
                let mask = _mm256_movemask_epi8(_mm256_cmpeq_epi8(va, vb)) as u32;
                if mask != u32::MAX {
                    return i + (!mask).trailing_zeros() as usize;
                }
                i += 32;
            }

            // 16-byte tail
            i + common_prefix_sse2(&a[i..len], &b[i..len])
        }
    }
}

/// aarch64 NEON comparator
#[cfg(target_arch = "aarch64")]
pub mod aarch64 {
    use crate::compare::scalar;
    use core::arch::aarch64::*;

    /// Check if NEON is available at runtime
    #[inline]
    pub fn has_neon() -> bool {
        std::arch::is_aarch64_feature_detected!("neon")
    }

    /// Common prefix length using 16-byte NEON compares
    ///
    /// The 16 lane results are narrowed to a 64-bit mask holding four bits
    /// per byte, so the first differing byte is `trailing_zeros / 4`.
    ///
    /// # Safety
    ///
    /// Requires NEON. Caller must verify `has_neon()` returns true.
    #[target_feature(enable = "neon")]
    pub unsafe fn common_prefix_neon(a: &[u8], b: &[u8]) -> usize {
        let len = a.len().min(b.len());
        let mut i = 0;

        unsafe {
            while i + 16 <= len {
                let va = vld1q_u8(a.as_ptr().add(i));
                let vb = vld1q_u8(b.as_ptr().add(i));
                let eq = vceqq_u8(va, vb);
                let narrowed = vshrn_n_u16::<4>(vreinterpretq_u16_u8(eq));
                let mask = vget_lane_u64::<0>(vreinterpret_u64_u8(narrowed));
                if mask != u64::MAX {
                    return i + ((!mask).trailing_zeros() / 4) as usize;
                }
                i += 16;
            }
        }

        i + scalar::wordwise(&a[i..len], &b[i..len])
    }
}
