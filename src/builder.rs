// Pattern set - trie construction
//
// Mutable, append-only phase of the matcher: patterns are inserted one byte
// at a time, creating at most one new state per distinct prefix. Inserting
// the same pattern twice never changes the structure; only the attached
// callback/payload are overwritten (last writer wins). Compilation hands
// the finished trie to the link builder and freezes it.

use crate::compiler;
use crate::matcher::AcAutomaton;
use crate::state::{AcState, MatchCallback, StateId};
use crate::{AcConfig, AcError, AcResult};
use std::fmt;
use std::sync::Arc;

/// A set of literal patterns held as a trie, prior to compilation
pub struct AcPatternSet<T> {
    states: Vec<AcState<T>>,
    pattern_count: usize,
    config: AcConfig,
}

impl<T> AcPatternSet<T> {
    /// Create an empty pattern set with default configuration
    pub fn new() -> Self {
        Self::with_config(AcConfig::default())
    }

    /// Create an empty pattern set with custom configuration
    pub fn with_config(config: AcConfig) -> Self {
        Self {
            states: vec![AcState::root()],
            pattern_count: 0,
            config,
        }
    }

    /// Add a literal pattern, optionally attaching a callback and payload
    /// that will be delivered with every match of this pattern.
    ///
    /// Re-adding an existing pattern leaves the trie and the pattern count
    /// unchanged but replaces the callback and payload.
    pub fn add_pattern(
        &mut self,
        pattern: &[u8],
        callback: Option<MatchCallback<T>>,
        payload: Option<T>,
    ) -> AcResult<()> {
        if pattern.is_empty() {
            return Err(AcError::InvalidPattern("empty pattern".to_string()));
        }

        if self.config.max_pattern_length > 0 && pattern.len() > self.config.max_pattern_length {
            return Err(AcError::PatternTooLong {
                length: pattern.len(),
                max: self.config.max_pattern_length,
            });
        }

        // Enforce the pattern limit before mutating the trie, so a failed
        // insertion leaves the set exactly as it was.
        if self.config.max_patterns > 0
            && self.pattern_count >= self.config.max_patterns
            && !self.contains(pattern)
        {
            return Err(AcError::TooManyPatterns {
                count: self.pattern_count + 1,
                max: self.config.max_patterns,
            });
        }

        let mut current = StateId::ROOT;
        for &byte in pattern {
            let symbol = self.normalize(byte);
            current = match self.states[current.index()].child_for_symbol(symbol) {
                Some(child) => child,
                None => self.new_state(current, symbol),
            };
        }

        let state = &mut self.states[current.index()];
        if !state.is_output {
            state.is_output = true;
            self.pattern_count += 1;
        }
        state.callback = callback;
        state.payload = payload;

        Ok(())
    }

    /// Add a batch of patterns with no callback or payload.
    /// Returns the number of patterns that were new to the set.
    pub fn add_patterns<'a, I>(&mut self, patterns: I) -> AcResult<usize>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let before = self.pattern_count;
        for pattern in patterns {
            self.add_pattern(pattern, None, None)?;
        }
        Ok(self.pattern_count - before)
    }

    /// Number of distinct patterns in the set
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Number of trie states, including the root
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// True when the given pattern ends at an output state
    pub fn contains(&self, pattern: &[u8]) -> bool {
        let mut current = StateId::ROOT;
        for &byte in pattern {
            let symbol = self.normalize(byte);
            match self.states[current.index()].child_for_symbol(symbol) {
                Some(child) => current = child,
                None => return false,
            }
        }
        self.states[current.index()].is_output
    }

    /// Compile into an immutable automaton, consuming the set
    pub fn compile(self) -> AcAutomaton<T> {
        compiler::compile(self)
    }

    #[inline]
    fn normalize(&self, byte: u8) -> u8 {
        if self.config.case_insensitive {
            byte.to_ascii_lowercase()
        } else {
            byte
        }
    }

    fn new_state(&mut self, parent: StateId, symbol: u8) -> StateId {
        let id = StateId::new(self.states.len());
        let prefix = Arc::clone(&self.states[parent.index()].prefix);
        self.states.push(AcState::child_of(parent, &prefix, symbol));
        self.states[parent.index()].children.push((symbol, id));
        id
    }

    pub(crate) fn into_parts(self) -> (Vec<AcState<T>>, usize, AcConfig) {
        (self.states, self.pattern_count, self.config)
    }

    #[cfg(test)]
    pub(crate) fn states(&self) -> &[AcState<T>] {
        &self.states
    }
}

impl<T> Default for AcPatternSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AcPatternSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcPatternSet")
            .field("patterns", &self.pattern_count)
            .field("states", &self.states.len())
            .field("config", &self.config)
            .finish()
    }
}
