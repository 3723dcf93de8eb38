//! Longest-match search over a hash chain.
//!
//! Given the head of the chain for the current string, [`MatchFinder`] walks
//! backwards through earlier positions with the same hash and returns the
//! longest match it can find within the distance limit and the chain
//! budget.
//!
//! # Algorithm
//!
//! - Start from the length the caller already knows (`prev_length`); only a
//!   strictly longer match replaces it, so among equal lengths the nearest
//!   candidate wins.
//! - Quarter the chain budget when the known match is already "good".
//! - Reject most candidates by probing two bytes at the current best length
//!   and the first two bytes before running the comparator.
//! - Stop as soon as a match reaches `nice_match` (itself capped at the
//!   lookahead), and at low levels stop on the first candidate that fails to
//!   improve.
//! - Clamp the result to the lookahead. Extension may read stale bytes past
//!   the valid input, which is harmless because of this clamp.
//!
//! The comparator realization is a property of the [`MatchFinder`]; the walk
//! itself exists only here, so every realization makes identical decisions.

use oximatch_core::{Comparator, MAX_MATCH, Window};

use crate::chain::ChainIndex;
use crate::params::SearchParams;

/// Outcome of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    /// Best length found, clamped to the lookahead. Equals the initial best
    /// length when nothing improved on it.
    pub length: usize,
    /// Window position of the best match, if any candidate improved on the
    /// initial best length.
    pub start: Option<usize>,
}

impl Match {
    /// Distance from `strstart` back to the match, if one was found.
    pub fn distance(&self, strstart: usize) -> Option<usize> {
        self.start.map(|start| strstart - start)
    }
}

/// Hash-chain longest-match search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchFinder {
    comparator: Comparator,
}

impl MatchFinder {
    /// Create a match finder using the fastest comparator on this machine.
    pub fn new() -> Self {
        Self::with_comparator(Comparator::detect())
    }

    /// Create a match finder using a specific comparator.
    pub fn with_comparator(comparator: Comparator) -> Self {
        Self { comparator }
    }

    /// The comparator in use.
    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// Find the longest match for the string at `params.strstart`.
    ///
    /// `cur_match` is the head of the chain for the current string. Neither
    /// the window nor the chain is modified.
    ///
    /// Chain links are not trusted. A head at or past `strstart` yields no
    /// candidate, and a link that does not point strictly below the current
    /// candidate ends the walk, in release and debug builds alike, so a
    /// malformed provider costs matches but never loops or panics.
    pub fn longest_match<C: ChainIndex + ?Sized>(
        &self,
        window: &Window,
        chain: &C,
        params: &SearchParams,
        cur_match: usize,
    ) -> Match {
        let buf = window.as_slice();
        let strstart = params.strstart;
        let lookahead = params.lookahead;

        debug_assert!(lookahead >= 1, "need lookahead");

        let mut best_len = params.prev_length.max(1);
        let mut best_start = None;

        // Do not waste too much time if we already have a good match
        let mut chain_budget = params.max_chain_length;
        if best_len >= params.good_match {
            chain_budget >>= 2;
        }
        let mut chain_budget = chain_budget.max(1);

        // Do not look for matches beyond the end of the input
        let nice_match = params.nice_match.min(lookahead);

        let limit = params.limit();

        let done = |length: usize, start: Option<usize>| Match {
            length: length.min(lookahead),
            start,
        };

        if cur_match <= limit || best_len >= MAX_MATCH {
            return done(best_len, best_start);
        }

        debug_assert!(
            strstart + MAX_MATCH <= buf.len(),
            "scan range runs past the window slack"
        );
        let Some(scan) = buf.get(strstart..strstart + MAX_MATCH) else {
            return done(best_len, best_start);
        };

        let mut scan_end1 = scan[best_len - 1];
        let mut scan_end = scan[best_len];
        let mut cur_match = cur_match;

        while cur_match < strstart {
            let candidate = &buf[cur_match..cur_match + MAX_MATCH];

            // Skip to the next candidate unless this one can beat best_len
            if candidate[best_len] == scan_end
                && candidate[best_len - 1] == scan_end1
                && candidate[0] == scan[0]
                && candidate[1] == scan[1]
            {
                let len = 2 + self.comparator.common_prefix(&scan[2..], &candidate[2..]);

                if len > best_len {
                    best_start = Some(cur_match);
                    best_len = len;
                    if len >= nice_match || len >= MAX_MATCH {
                        break;
                    }
                    scan_end1 = scan[best_len - 1];
                    scan_end = scan[best_len];
                } else if params.early_exit() {
                    // A non-improving hit rarely precedes a better one
                    break;
                }
            }

            chain_budget -= 1;
            let next = chain.prev_link(cur_match);
            if chain_budget == 0 || next <= limit || next >= cur_match {
                break;
            }
            cur_match = next;
        }

        done(best_len, best_start)
    }
}

impl Default for MatchFinder {
    fn default() -> Self {
        Self::new()
    }
}
