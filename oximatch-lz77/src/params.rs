//! Search parameters and per-level tuning presets.
//!
//! The match search reads a [`SearchParams`] on every call. The parse driver
//! builds it from a [`LevelConfig`], which bundles the knobs a compression
//! level controls: how hard to walk hash chains, when a match is good enough
//! to stop, and whether to try lazy evaluation.

use oximatch_core::{CompressionLevel, MAX_MATCH, MIN_MATCH, OxiMatchError, Result};

/// Levels below this give up the chain walk after the first candidate that
/// passes the cheap rejection test but does not improve the best match.
///
/// This trades compression ratio for speed and changes the output, not just
/// the timing.
pub const TRIGGER_LEVEL: u8 = 5;

/// Length-3 matches farther than this are not worth a back-reference under
/// lazy evaluation.
pub const TOO_FAR: usize = 4096;

/// How the parse driver turns matches into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ParseStrategy {
    /// Literals only.
    Stored,
    /// Take the match found at each position.
    Greedy,
    /// Defer each match by one byte to see if a longer one follows.
    Lazy,
}

/// Tuning knobs for one compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelConfig {
    /// Quarter the chain budget once the known match is at least this long.
    pub good_length: u16,
    /// Lazy: skip the search once the previous match is this long.
    /// Greedy: longest match whose positions are all inserted into the chain.
    pub max_lazy: u16,
    /// Stop the chain walk as soon as a match reaches this length.
    pub nice_length: u16,
    /// Maximum number of chain candidates examined per search.
    pub max_chain: u16,
    /// Parsing strategy.
    pub strategy: ParseStrategy,
}

const fn preset(
    good_length: u16,
    max_lazy: u16,
    nice_length: u16,
    max_chain: u16,
    strategy: ParseStrategy,
) -> LevelConfig {
    LevelConfig {
        good_length,
        max_lazy,
        nice_length,
        max_chain,
        strategy,
    }
}

/// Presets for levels 0-9.
pub const CONFIGURATION_TABLE: [LevelConfig; 10] = [
    preset(0, 0, 0, 0, ParseStrategy::Stored),
    preset(4, 4, 8, 4, ParseStrategy::Greedy),
    preset(4, 5, 16, 8, ParseStrategy::Greedy),
    preset(4, 6, 32, 32, ParseStrategy::Greedy),
    preset(4, 4, 16, 16, ParseStrategy::Lazy),
    preset(8, 16, 32, 32, ParseStrategy::Lazy),
    preset(8, 16, 128, 128, ParseStrategy::Lazy),
    preset(8, 32, 128, 256, ParseStrategy::Lazy),
    preset(32, 128, 258, 1024, ParseStrategy::Lazy),
    preset(32, 258, 258, 4096, ParseStrategy::Lazy),
];

impl LevelConfig {
    /// Preset for a compression level.
    pub fn for_level(level: impl Into<CompressionLevel>) -> Self {
        CONFIGURATION_TABLE[level.into().level() as usize]
    }

    /// Check that the knobs are usable by the match search.
    ///
    /// # Errors
    ///
    /// Returns [`OxiMatchError::InvalidParameter`] naming the first
    /// offending field.
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("good_length", self.good_length),
            ("max_lazy", self.max_lazy),
            ("nice_length", self.nice_length),
        ];
        for (name, value) in limits {
            if value as usize > MAX_MATCH {
                return Err(OxiMatchError::invalid_parameter(
                    name,
                    format!("{} exceeds the maximum match length {}", value, MAX_MATCH),
                ));
            }
        }

        if self.strategy != ParseStrategy::Stored {
            if self.max_chain == 0 {
                return Err(OxiMatchError::invalid_parameter(
                    "max_chain",
                    "searching strategies need at least one chain step",
                ));
            }
            if (self.nice_length as usize) < MIN_MATCH {
                return Err(OxiMatchError::invalid_parameter(
                    "nice_length",
                    format!("{} is below the minimum match length {}", self.nice_length, MIN_MATCH),
                ));
            }
        }

        Ok(())
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::for_level(CompressionLevel::DEFAULT)
    }
}

/// Inputs to one longest-match search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchParams {
    /// Window position of the string being matched.
    pub strstart: usize,
    /// Length of the best match already known for this position.
    pub prev_length: usize,
    /// Number of valid input bytes starting at `strstart`.
    pub lookahead: usize,
    /// Maximum number of chain candidates to examine.
    pub max_chain_length: usize,
    /// Quarter the chain budget once `prev_length` reaches this.
    pub good_match: usize,
    /// Stop as soon as a match reaches this length.
    pub nice_match: usize,
    /// Compression effort level (0-9).
    pub level: u8,
    /// Largest allowed match distance.
    pub max_dist: usize,
}

impl SearchParams {
    /// Build parameters from a level preset. Position fields start at zero
    /// and are filled in per call with [`SearchParams::at`].
    pub fn new(config: &LevelConfig, level: CompressionLevel, max_dist: usize) -> Self {
        Self {
            strstart: 0,
            prev_length: 0,
            lookahead: 0,
            max_chain_length: config.max_chain as usize,
            good_match: config.good_length as usize,
            nice_match: config.nice_length as usize,
            level: level.level(),
            max_dist,
        }
    }

    /// Copy with the per-position fields replaced.
    #[inline]
    pub fn at(self, strstart: usize, prev_length: usize, lookahead: usize) -> Self {
        Self {
            strstart,
            prev_length,
            lookahead,
            ..self
        }
    }

    /// Whether the walk stops on the first non-improving candidate.
    #[inline]
    pub fn early_exit(&self) -> bool {
        self.level < TRIGGER_LEVEL
    }

    /// Candidates at or below this position are out of reach.
    ///
    /// A candidate at distance exactly `max_dist` is still eligible. Window
    /// position 0 is never eligible.
    #[inline]
    pub fn limit(&self) -> usize {
        self.strstart.saturating_sub(self.max_dist + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for level in 0..=9u8 {
            let config = LevelConfig::for_level(level);
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_preset_strategies() {
        assert_eq!(LevelConfig::for_level(0).strategy, ParseStrategy::Stored);
        assert_eq!(LevelConfig::for_level(3).strategy, ParseStrategy::Greedy);
        assert_eq!(LevelConfig::for_level(4).strategy, ParseStrategy::Lazy);
        assert_eq!(LevelConfig::for_level(9).max_chain, 4096);
        assert_eq!(LevelConfig::default(), LevelConfig::for_level(6));
    }

    #[test]
    fn test_validate_rejects_oversized_nice_length() {
        let config = LevelConfig {
            nice_length: 300,
            ..LevelConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            OxiMatchError::InvalidParameter {
                name: "nice_length",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_empty_chain() {
        let config = LevelConfig {
            max_chain: 0,
            ..LevelConfig::default()
        };
        assert!(config.validate().is_err());

        let stored = LevelConfig::for_level(0);
        assert!(stored.validate().is_ok());
    }

    #[test]
    fn test_search_params_from_preset() {
        let config = LevelConfig::for_level(8);
        let params = SearchParams::new(&config, CompressionLevel::new(8), 32506).at(100, 3, 50);
        assert_eq!(params.max_chain_length, 1024);
        assert_eq!(params.good_match, 32);
        assert_eq!(params.nice_match, 258);
        assert_eq!(params.strstart, 100);
        assert_eq!(params.prev_length, 3);
        assert_eq!(params.lookahead, 50);
        assert!(!params.early_exit());
    }

    #[test]
    fn test_early_exit_threshold() {
        let config = LevelConfig::for_level(4);
        let low = SearchParams::new(&config, CompressionLevel::new(4), 250);
        let high = SearchParams::new(&config, CompressionLevel::new(TRIGGER_LEVEL), 250);
        assert!(low.early_exit());
        assert!(!high.early_exit());
    }

    #[test]
    fn test_limit() {
        let config = LevelConfig::default();
        let params = SearchParams::new(&config, CompressionLevel::DEFAULT, 250);
        assert_eq!(params.at(100, 2, 10).limit(), 0);
        assert_eq!(params.at(251, 2, 10).limit(), 0);
        assert_eq!(params.at(1000, 2, 10).limit(), 749);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serde_roundtrip() {
        let config = LevelConfig::for_level(7);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"lazy\""));
        let back: LevelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
