//! Error types for OxiMatch operations.
//!
//! Errors only arise at construction and configuration boundaries (window
//! setup, chain setup, level presets, comparator selection). The match search
//! itself is a total function over well-formed input and never fails.

use thiserror::Error;

/// The main error type for OxiMatch operations.
#[derive(Debug, Error)]
pub enum OxiMatchError {
    /// Window size exponent outside the supported range.
    #[error("Invalid window bits: {bits} (supported range is {min}..={max})")]
    InvalidWindowBits {
        /// The rejected exponent.
        bits: u8,
        /// Smallest supported exponent.
        min: u8,
        /// Largest supported exponent.
        max: u8,
    },

    /// Hash table size exponent outside the supported range.
    #[error("Invalid hash bits: {bits} (supported range is {min}..={max})")]
    InvalidHashBits {
        /// The rejected exponent.
        bits: u8,
        /// Smallest supported exponent.
        min: u8,
        /// Largest supported exponent.
        max: u8,
    },

    /// Buffer too small for operation.
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// A tuning parameter is out of range.
    #[error("Invalid parameter `{name}`: {message}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// The requested comparator cannot run on this CPU or build.
    #[error("Unsupported comparator: {kind}")]
    UnsupportedComparator {
        /// Name of the comparator kind.
        kind: String,
    },

    /// Invalid distance in an LZ77 back-reference.
    #[error("Invalid back-reference distance: {distance} exceeds history size {history_size}")]
    InvalidDistance {
        /// The invalid distance value.
        distance: usize,
        /// Current history size.
        history_size: usize,
    },
}

/// Result type alias for OxiMatch operations.
pub type Result<T> = std::result::Result<T, OxiMatchError>;

impl OxiMatchError {
    /// Create an invalid window bits error.
    pub fn invalid_window_bits(bits: u8, min: u8, max: u8) -> Self {
        Self::InvalidWindowBits { bits, min, max }
    }

    /// Create an invalid hash bits error.
    pub fn invalid_hash_bits(bits: u8, min: u8, max: u8) -> Self {
        Self::InvalidHashBits { bits, min, max }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(needed: usize, available: usize) -> Self {
        Self::BufferTooSmall { needed, available }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Create an unsupported comparator error.
    pub fn unsupported_comparator(kind: impl Into<String>) -> Self {
        Self::UnsupportedComparator { kind: kind.into() }
    }

    /// Create an invalid distance error.
    pub fn invalid_distance(distance: usize, history_size: usize) -> Self {
        Self::InvalidDistance {
            distance,
            history_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OxiMatchError::invalid_window_bits(20, 9, 15);
        assert!(err.to_string().contains("Invalid window bits: 20"));

        let err = OxiMatchError::buffer_too_small(300, 10);
        assert!(err.to_string().contains("need 300 bytes"));

        let err = OxiMatchError::invalid_parameter("nice_length", "exceeds 258");
        assert!(err.to_string().contains("`nice_length`"));

        let err = OxiMatchError::unsupported_comparator("avx2");
        assert!(err.to_string().contains("avx2"));
    }

    #[test]
    fn test_invalid_distance() {
        let err = OxiMatchError::invalid_distance(40000, 32768);
        assert!(matches!(
            err,
            OxiMatchError::InvalidDistance {
                distance: 40000,
                history_size: 32768
            }
        ));
    }
}
