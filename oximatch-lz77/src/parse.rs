//! Reference LZ77 parse driver.
//!
//! [`Lz77Parser`] owns a window and a hash chain, feeds input through them,
//! and turns the results of the match search into [`Lz77Token`]s. It exists
//! so the match finder can be driven end to end; entropy coding of the
//! tokens is left to the caller.
//!
//! # Strategies
//!
//! - **Stored** (level 0): every byte becomes a literal.
//! - **Greedy** (levels 1-3): take whatever match is found at each position.
//! - **Lazy** (levels 4-9): hold each match for one byte and keep it only if
//!   the next position does not yield a longer one.
//!
//! # Window management
//!
//! The window holds `2 * w_size` bytes. Input is copied in behind the
//! current position; once the current position moves past
//! `w_size + max_dist`, the upper half slides down and every stored
//! position is rebased. The extra byte keeps a deferred lazy match inside
//! the retained half.

use oximatch_core::{
    Comparator, CompressionLevel, MAX_MATCH, MIN_LOOKAHEAD, MIN_MATCH, OxiMatchError, Result,
    Window,
};

use crate::chain::{HashChain, NIL};
use crate::matcher::{Match, MatchFinder};
use crate::params::{LevelConfig, ParseStrategy, SearchParams, TOO_FAR};

/// A token produced by LZ77 parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lz77Token {
    /// A literal byte.
    Literal(u8),
    /// A back-reference to previously seen data.
    Match {
        /// Number of bytes to copy (3-258).
        length: u16,
        /// Distance back into the window.
        distance: u16,
    },
}

/// LZ77 parser driving the hash-chain match finder.
#[derive(Debug, Clone)]
pub struct Lz77Parser {
    /// Sliding window buffer.
    window: Window,
    /// Hash chains over the window.
    chain: HashChain,
    /// Longest-match search.
    finder: MatchFinder,
    /// Tuning knobs for the selected level.
    config: LevelConfig,
    /// Selected level.
    level: CompressionLevel,
    /// Per-call search parameters with the position fields left blank.
    search: SearchParams,
    /// Current position in the window.
    strstart: usize,
    /// Valid bytes at and after `strstart`.
    lookahead: usize,
    /// Start of the most recent match.
    match_start: usize,
    /// Positions just before `strstart` not yet in the hash chain because
    /// too few bytes followed them.
    pending: usize,
}

impl Lz77Parser {
    /// Create a new parser with default settings (level 6, 32 KB window).
    pub fn new() -> Self {
        Self::with_level(CompressionLevel::DEFAULT.level())
    }

    /// Create a new parser with the specified compression level (0-9) and
    /// a 32 KB window.
    pub fn with_level(level: u8) -> Self {
        let level = CompressionLevel::new(level);
        Self::build(
            Window::deflate(),
            HashChain::deflate(),
            LevelConfig::for_level(level),
            level,
        )
    }

    /// Create a parser with a `1 << w_bits` byte window.
    ///
    /// # Errors
    ///
    /// Returns [`OxiMatchError::InvalidWindowBits`] for unsupported sizes.
    pub fn with_window_bits(level: u8, w_bits: u8) -> Result<Self> {
        let level = CompressionLevel::new(level);
        Self::with_config(LevelConfig::for_level(level), level, w_bits)
    }

    /// Create a parser with custom tuning.
    ///
    /// `level` still decides whether the search exits early on a
    /// non-improving candidate.
    ///
    /// # Errors
    ///
    /// Returns [`OxiMatchError::InvalidParameter`] if `config` fails
    /// validation, or [`OxiMatchError::InvalidWindowBits`] for unsupported
    /// window sizes.
    pub fn with_config(config: LevelConfig, level: CompressionLevel, w_bits: u8) -> Result<Self> {
        config.validate()?;
        let window = Window::new(w_bits)?;
        let chain = HashChain::new(w_bits, w_bits)?;
        Ok(Self::build(window, chain, config, level))
    }

    fn build(window: Window, chain: HashChain, config: LevelConfig, level: CompressionLevel) -> Self {
        let search = SearchParams::new(&config, level, window.max_dist());
        let finder = MatchFinder::new();
        log::debug!(
            "lz77 parser: level {}, {:?} strategy, {} byte window, {} comparator",
            level.level(),
            config.strategy,
            window.w_size(),
            finder.comparator().kind()
        );

        Self {
            window,
            chain,
            finder,
            config,
            level,
            search,
            strstart: 0,
            lookahead: 0,
            match_start: 0,
            pending: 0,
        }
    }

    /// Use a specific comparator for match extension.
    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.finder = MatchFinder::with_comparator(comparator);
        self
    }

    /// Selected compression level.
    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    /// Tuning knobs in use.
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Comparator in use.
    pub fn comparator(&self) -> Comparator {
        self.finder.comparator()
    }

    /// Largest distance a produced match can have.
    pub fn max_dist(&self) -> usize {
        self.window.max_dist()
    }

    /// Reset the parser state, forgetting all history.
    pub fn reset(&mut self) {
        self.window.clear();
        self.chain.reset();
        self.strstart = 0;
        self.lookahead = 0;
        self.match_start = 0;
        self.pending = 0;
    }

    /// Set a preset dictionary.
    ///
    /// The dictionary is preloaded into the window so that matches can
    /// reference it from the first input byte. Only the last `w_size` bytes
    /// are kept. Resets any previous state.
    ///
    /// # Returns
    ///
    /// The number of dictionary bytes loaded.
    pub fn set_dictionary(&mut self, dictionary: &[u8]) -> usize {
        self.reset();

        let w_size = self.window.w_size();
        let dict_to_use = if dictionary.len() > w_size {
            &dictionary[dictionary.len() - w_size..]
        } else {
            dictionary
        };

        let loaded = self.window.fill_from(0, dict_to_use);
        if loaded >= MIN_MATCH {
            for pos in 0..=loaded - MIN_MATCH {
                self.chain.insert(self.window.as_slice(), pos);
            }
        }
        self.strstart = loaded;
        // The tail is indexed once input follows it
        self.pending = loaded.min(MIN_MATCH - 1);

        log::debug!("loaded {} byte preset dictionary", loaded);
        loaded
    }

    /// Parse `input` into tokens.
    ///
    /// History carries over between calls, so a later call may reference
    /// bytes passed to an earlier one.
    pub fn parse(&mut self, input: &[u8]) -> Vec<Lz77Token> {
        let mut tokens = Vec::with_capacity(input.len() / 2 + 16);
        let mut input = input;

        match self.config.strategy {
            ParseStrategy::Stored => self.parse_stored(&mut input, &mut tokens),
            ParseStrategy::Greedy => self.parse_greedy(&mut input, &mut tokens),
            ParseStrategy::Lazy => self.parse_lazy(&mut input, &mut tokens),
        }

        // The last positions had too few bytes to hash
        if self.config.strategy != ParseStrategy::Stored {
            self.pending = self.strstart.min(MIN_MATCH - 1);
        }

        tokens
    }

    /// Parse all data at once (convenience method).
    pub fn parse_all(input: &[u8], level: u8) -> Vec<Lz77Token> {
        let mut parser = Self::with_level(level);
        parser.parse(input)
    }

    fn parse_stored(&mut self, input: &mut &[u8], tokens: &mut Vec<Lz77Token>) {
        loop {
            self.fill_window(input);
            if self.lookahead == 0 {
                break;
            }
            let end = self.strstart + self.lookahead;
            tokens.extend(
                self.window.as_slice()[self.strstart..end]
                    .iter()
                    .map(|&b| Lz77Token::Literal(b)),
            );
            self.strstart = end;
            self.lookahead = 0;
        }
    }

    fn parse_greedy(&mut self, input: &mut &[u8], tokens: &mut Vec<Lz77Token>) {
        let max_insert = self.config.max_lazy as usize;

        loop {
            if self.lookahead < MIN_LOOKAHEAD {
                self.fill_window(input);
                if self.lookahead == 0 {
                    break;
                }
            }

            let hash_head = self.insert_current();

            let mut match_length = 0;
            if self.reachable(hash_head) {
                let found = self.search(hash_head, MIN_MATCH - 1);
                if let Some(start) = found.start {
                    self.match_start = start;
                    match_length = found.length;
                }
            }

            if match_length >= MIN_MATCH {
                self.emit_match(tokens, match_length, self.strstart - self.match_start);
                self.lookahead -= match_length;

                // Index every position of short matches; skip long ones
                if match_length <= max_insert && self.lookahead >= MIN_MATCH {
                    for _ in 1..match_length {
                        self.strstart += 1;
                        self.chain.insert(self.window.as_slice(), self.strstart);
                    }
                    self.strstart += 1;
                } else {
                    self.strstart += match_length;
                }
            } else {
                tokens.push(Lz77Token::Literal(self.window.byte(self.strstart)));
                self.lookahead -= 1;
                self.strstart += 1;
            }
        }
    }

    fn parse_lazy(&mut self, input: &mut &[u8], tokens: &mut Vec<Lz77Token>) {
        let max_lazy = self.config.max_lazy as usize;
        let mut match_length = MIN_MATCH - 1;
        let mut match_available = false;

        loop {
            if self.lookahead < MIN_LOOKAHEAD {
                self.fill_window(input);
                if self.lookahead == 0 {
                    break;
                }
            }

            let hash_head = self.insert_current();

            let prev_length = match_length;
            let prev_match = self.match_start;
            match_length = MIN_MATCH - 1;

            if prev_length < max_lazy && self.reachable(hash_head) {
                let found = self.search(hash_head, prev_length);
                match_length = found.length;
                if let Some(start) = found.start {
                    self.match_start = start;
                    if match_length == MIN_MATCH && self.strstart - start > TOO_FAR {
                        match_length = MIN_MATCH - 1;
                    }
                }
            }

            if prev_length >= MIN_MATCH && match_length <= prev_length {
                // The previous match is at least as good: emit it
                let max_insert = (self.strstart + self.lookahead).saturating_sub(MIN_MATCH);
                self.emit_match(tokens, prev_length, self.strstart - 1 - prev_match);

                self.lookahead -= prev_length - 1;
                for _ in 0..prev_length - 2 {
                    self.strstart += 1;
                    if self.strstart <= max_insert {
                        self.chain.insert(self.window.as_slice(), self.strstart);
                    }
                }
                self.strstart += 1;
                match_available = false;
                match_length = MIN_MATCH - 1;
            } else if match_available {
                tokens.push(Lz77Token::Literal(self.window.byte(self.strstart - 1)));
                self.strstart += 1;
                self.lookahead -= 1;
            } else {
                match_available = true;
                self.strstart += 1;
                self.lookahead -= 1;
            }
        }

        if match_available {
            tokens.push(Lz77Token::Literal(self.window.byte(self.strstart - 1)));
        }
    }

    /// Insert the string at `strstart` when enough bytes are valid, and
    /// return the previous head of its chain.
    #[inline]
    fn insert_current(&mut self) -> usize {
        if self.lookahead >= MIN_MATCH {
            self.chain.insert(self.window.as_slice(), self.strstart)
        } else {
            NIL
        }
    }

    #[inline]
    fn reachable(&self, hash_head: usize) -> bool {
        hash_head != NIL
            && hash_head < self.strstart
            && self.strstart - hash_head <= self.window.max_dist()
    }

    #[inline]
    fn search(&self, cur_match: usize, prev_length: usize) -> Match {
        let params = self.search.at(self.strstart, prev_length, self.lookahead);
        self.finder
            .longest_match(&self.window, &self.chain, &params, cur_match)
    }

    #[inline]
    fn emit_match(&self, tokens: &mut Vec<Lz77Token>, length: usize, distance: usize) {
        debug_assert!((MIN_MATCH..=MAX_MATCH).contains(&length), "bad match length");
        debug_assert!(
            (1..=self.window.max_dist()).contains(&distance),
            "bad match distance"
        );
        tokens.push(Lz77Token::Match {
            length: length as u16,
            distance: distance as u16,
        });
    }

    /// Refill the window from `input` until the lookahead is at least
    /// `MIN_LOOKAHEAD` or the input runs out, sliding first if needed.
    fn fill_window(&mut self, input: &mut &[u8]) {
        let w_size = self.window.w_size();
        let slide_at = w_size + self.window.max_dist();

        loop {
            if self.strstart > slide_at {
                self.slide_window();
            }
            if input.is_empty() {
                break;
            }

            let copied = self
                .window
                .fill_from(self.strstart + self.lookahead, input);
            *input = &input[copied..];
            self.lookahead += copied;
            self.insert_pending();

            if self.lookahead >= MIN_LOOKAHEAD || input.is_empty() || copied == 0 {
                break;
            }
        }
    }

    /// Index held-back positions now that enough bytes follow them.
    fn insert_pending(&mut self) {
        let end = self.strstart + self.lookahead;
        while self.pending > 0 {
            let pos = self.strstart - self.pending;
            if pos + MIN_MATCH > end {
                break;
            }
            self.chain.insert(self.window.as_slice(), pos);
            self.pending -= 1;
        }
    }

    /// Slide the window to make room for more data.
    fn slide_window(&mut self) {
        let w_size = self.window.w_size();

        self.window.slide();
        self.chain.slide(w_size);
        self.match_start = self.match_start.saturating_sub(w_size);
        self.strstart -= w_size;

        log::trace!("slid window by {} bytes, strstart now {}", w_size, self.strstart);
    }
}

impl Default for Lz77Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuild the bytes a token stream describes.
///
/// `dictionary` must be the preset dictionary the tokens were produced with
/// (empty if none).
///
/// # Errors
///
/// Returns [`OxiMatchError::InvalidDistance`] if a back-reference reaches
/// before the start of the available history.
pub fn expand(tokens: &[Lz77Token], dictionary: &[u8]) -> Result<Vec<u8>> {
    let mut output = dictionary.to_vec();

    for token in tokens {
        match *token {
            Lz77Token::Literal(b) => output.push(b),
            Lz77Token::Match { length, distance } => {
                let distance = distance as usize;
                if distance == 0 || distance > output.len() {
                    return Err(OxiMatchError::invalid_distance(distance, output.len()));
                }
                let start = output.len() - distance;
                for i in 0..length as usize {
                    let byte = output[start + i];
                    output.push(byte);
                }
            }
        }
    }

    Ok(output.split_off(dictionary.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covered(tokens: &[Lz77Token]) -> usize {
        tokens
            .iter()
            .map(|t| match t {
                Lz77Token::Literal(_) => 1,
                Lz77Token::Match { length, .. } => *length as usize,
            })
            .sum()
    }

    #[test]
    fn test_literals_only() {
        let input = b"abcdefgh";
        let tokens = Lz77Parser::parse_all(input, 6);

        // All should be literals (no repeats)
        assert!(tokens.iter().all(|t| matches!(t, Lz77Token::Literal(_))));
        assert_eq!(tokens.len(), 8);
    }

    #[test]
    fn test_simple_match() {
        let input = b"xabcabcabc";
        let tokens = Lz77Parser::parse_all(input, 6);

        let has_match = tokens.iter().any(|t| matches!(t, Lz77Token::Match { .. }));
        assert!(has_match, "Should find at least one match");
        assert_eq!(expand(&tokens, &[]).unwrap(), input);
    }

    #[test]
    fn test_repeated_char() {
        let input = b"aaaaaaaaaa";
        let tokens = Lz77Parser::parse_all(input, 6);

        assert_eq!(covered(&tokens), 10);
        assert!(tokens.len() < 10, "Should compress repeated chars");
        assert_eq!(expand(&tokens, &[]).unwrap(), input);
    }

    #[test]
    fn test_decode_matches() {
        let input = b"Hello, Hello, Hello!";
        for level in 0..=9 {
            let tokens = Lz77Parser::parse_all(input, level);
            assert_eq!(expand(&tokens, &[]).unwrap(), input, "level {}", level);
        }
    }

    #[test]
    fn test_level_0_store() {
        let input = b"test data test data";
        let tokens = Lz77Parser::parse_all(input, 0);

        // Level 0 should be all literals
        assert!(tokens.iter().all(|t| matches!(t, Lz77Token::Literal(_))));
        assert_eq!(tokens.len(), input.len());
    }

    #[test]
    fn test_greedy_takes_first_match() {
        // Window position 0 is never a candidate, so the "_ab" at 5 stays
        // a literal
        let input = b"_abcd_abcd";
        let tokens = Lz77Parser::parse_all(input, 1);
        assert_eq!(tokens[6], Lz77Token::Match { length: 4, distance: 5 });
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn test_lazy_defers_for_longer_match() {
        // "abc" at 14 matches 3 bytes; "bcdefgh" one byte later matches 7
        let input = b"_abcX_bcdefgh_abcdefgh";
        let greedy = Lz77Parser::parse_all(input, 3);
        let lazy = Lz77Parser::parse_all(input, 9);

        assert_eq!(expand(&greedy, &[]).unwrap(), input);
        assert_eq!(expand(&lazy, &[]).unwrap(), input);

        assert!(greedy.contains(&Lz77Token::Match { length: 3, distance: 13 }));
        assert_eq!(lazy[14], Lz77Token::Literal(b'a'));
        assert_eq!(lazy[15], Lz77Token::Match { length: 7, distance: 9 });
        assert_eq!(lazy.len(), 16);
    }

    #[test]
    fn test_dictionary() {
        let dictionary = b"the quick brown fox jumps over the lazy dog";
        let input = b"the lazy dog jumps over the quick brown fox";

        let mut parser = Lz77Parser::with_level(6);
        assert_eq!(parser.set_dictionary(dictionary), dictionary.len());
        let tokens = parser.parse(input);

        assert!(matches!(tokens[0], Lz77Token::Match { .. }));
        assert_eq!(expand(&tokens, dictionary).unwrap(), input);

        let plain = Lz77Parser::parse_all(input, 6);
        assert!(tokens.len() < plain.len());
    }

    #[test]
    fn test_dictionary_tail_starts_match() {
        // "ab" closes the dictionary and "cd" opens the input
        let dictionary = b"_xyzwvuab";
        let input = b"cdXabcd";

        for level in [1, 6] {
            let mut parser = Lz77Parser::with_level(level);
            parser.set_dictionary(dictionary);
            let tokens = parser.parse(input);

            assert_eq!(
                tokens.last(),
                Some(&Lz77Token::Match { length: 4, distance: 5 }),
                "level {}",
                level
            );
            assert_eq!(expand(&tokens, dictionary).unwrap(), input);
        }
    }

    #[test]
    fn test_dictionary_keeps_tail() {
        let mut parser = Lz77Parser::with_window_bits(6, 9).unwrap();
        let dictionary: Vec<u8> = (0..2000u32).map(|i| (i % 251) as u8).collect();
        assert_eq!(parser.set_dictionary(&dictionary), 512);
    }

    #[test]
    fn test_history_carries_between_calls() {
        let mut parser = Lz77Parser::with_level(6);
        let first = parser.parse(b"_some shared phrase");
        let second = parser.parse(b"some shared phrase");

        assert_eq!(covered(&first), 19);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0], Lz77Token::Match { length: 18, distance: 18 });

        let mut all = first.clone();
        all.extend_from_slice(&second);
        assert_eq!(
            expand(&all, &[]).unwrap(),
            b"_some shared phrasesome shared phrase"
        );
    }

    #[test]
    fn test_split_input_matches_single_call() {
        // The repeated "abcdefgh" starts in the last two bytes of the first
        // chunk
        let first: &[u8] = b"_0123456789ab";
        let second: &[u8] = b"cdefgh!abcdefgh";
        let whole = [first, second].concat();

        for level in [1, 6, 9] {
            let single = Lz77Parser::parse_all(&whole, level);
            assert_eq!(
                single.last(),
                Some(&Lz77Token::Match { length: 8, distance: 9 })
            );

            let mut parser = Lz77Parser::with_level(level);
            let mut split = parser.parse(first);
            split.extend(parser.parse(second));
            assert_eq!(split, single, "level {}", level);
        }
    }

    #[test]
    fn test_small_chunks_roundtrip() {
        let input = b"_one two three one two three one two three";

        let mut parser = Lz77Parser::with_level(1);
        let mut tokens = Vec::new();
        for chunk in input.chunks(5) {
            tokens.extend(parser.parse(chunk));
        }
        assert_eq!(expand(&tokens, &[]).unwrap(), input);
        assert!(tokens.iter().any(|t| matches!(t, Lz77Token::Match { .. })));
    }

    #[test]
    fn test_small_window_slides() {
        let mut input = Vec::new();
        let mut seed = 7u32;
        while input.len() < 10_000 {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            input.push(b"abcdefgh"[(seed >> 16) as usize % 8]);
        }

        for level in [1, 4, 6, 9] {
            let mut parser = Lz77Parser::with_window_bits(level, 9).unwrap();
            let max_dist = parser.max_dist();
            let tokens = parser.parse(&input);

            for token in &tokens {
                if let Lz77Token::Match { length, distance } = *token {
                    assert!((MIN_MATCH..=MAX_MATCH).contains(&(length as usize)));
                    assert!((1..=max_dist).contains(&(distance as usize)));
                }
            }
            assert_eq!(expand(&tokens, &[]).unwrap(), input, "level {}", level);
        }
    }

    #[test]
    fn test_with_config_validates() {
        let config = LevelConfig {
            nice_length: 1000,
            ..LevelConfig::default()
        };
        assert!(matches!(
            Lz77Parser::with_config(config, CompressionLevel::DEFAULT, 15),
            Err(OxiMatchError::InvalidParameter { .. })
        ));
        assert!(matches!(
            Lz77Parser::with_window_bits(6, 20),
            Err(OxiMatchError::InvalidWindowBits { .. })
        ));
    }

    #[test]
    fn test_expand_rejects_bad_distance() {
        let tokens = [
            Lz77Token::Literal(b'a'),
            Lz77Token::Match {
                length: 3,
                distance: 2,
            },
        ];
        assert!(matches!(
            expand(&tokens, &[]),
            Err(OxiMatchError::InvalidDistance {
                distance: 2,
                history_size: 1
            })
        ));
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut parser = Lz77Parser::with_level(6);
        parser.parse(b"_repeat me please");
        parser.reset();
        let tokens = parser.parse(b"repeat me please");
        assert!(tokens.iter().all(|t| matches!(t, Lz77Token::Literal(_))));
    }
}
