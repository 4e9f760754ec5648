// Engine - the Building -> Compiled state machine
//
// Wraps the pattern set and the compiled automaton behind one handle with
// exactly one allowed transition: `Building -> Compiled`, taken by an
// explicit `compile()` call or by the first `consume()`. Insertions are
// only valid while building; a late `add_pattern` is a recoverable
// `Frozen` error that leaves the automaton untouched.

use crate::builder::AcPatternSet;
use crate::matcher::{AcAutomaton, ConsumeOptions, ConsumeOutcome, MatchContext};
use crate::state::MatchCallback;
use crate::{AcConfig, AcError, AcResult};
use std::fmt;

enum EngineState<T> {
    Building(AcPatternSet<T>),
    Compiled(AcAutomaton<T>),
}

/// Append-then-freeze handle over the matcher lifecycle
pub struct AcEngine<T> {
    inner: EngineState<T>,
}

impl<T> AcEngine<T> {
    /// Create an empty engine with default configuration
    pub fn new() -> Self {
        Self::with_config(AcConfig::default())
    }

    /// Create an empty engine with custom configuration
    pub fn with_config(config: AcConfig) -> Self {
        Self {
            inner: EngineState::Building(AcPatternSet::with_config(config)),
        }
    }

    /// Add a pattern. Fails with [`AcError::Frozen`] once the engine has
    /// compiled; the automaton is not modified by the attempt.
    pub fn add_pattern(
        &mut self,
        pattern: &[u8],
        callback: Option<MatchCallback<T>>,
        payload: Option<T>,
    ) -> AcResult<()> {
        match &mut self.inner {
            EngineState::Building(set) => set.add_pattern(pattern, callback, payload),
            EngineState::Compiled(_) => Err(AcError::Frozen),
        }
    }

    /// Number of distinct patterns added so far
    pub fn pattern_count(&self) -> usize {
        match &self.inner {
            EngineState::Building(set) => set.pattern_count(),
            EngineState::Compiled(automaton) => automaton.pattern_count(),
        }
    }

    /// True once the engine has transitioned to the compiled state
    pub fn is_compiled(&self) -> bool {
        matches!(self.inner, EngineState::Compiled(_))
    }

    /// Compile the pattern set. A no-op on an already-compiled engine.
    pub fn compile(&mut self) {
        if let EngineState::Building(set) = &mut self.inner {
            let set = std::mem::take(set);
            self.inner = EngineState::Compiled(set.compile());
        }
    }

    /// The compiled automaton, for sharing read-only across contexts.
    /// `None` while still building.
    pub fn automaton(&self) -> Option<&AcAutomaton<T>> {
        match &self.inner {
            EngineState::Building(_) => None,
            EngineState::Compiled(automaton) => Some(automaton),
        }
    }

    /// Compile if needed and unwrap the automaton
    pub fn into_automaton(mut self) -> AcAutomaton<T> {
        self.compile();
        match self.inner {
            EngineState::Compiled(automaton) => automaton,
            // compile() always leaves the engine compiled
            EngineState::Building(_) => unreachable!(),
        }
    }

    /// Consume a byte range against this engine, compiling first if no
    /// explicit `compile()` call has happened yet.
    pub fn consume(
        &mut self,
        ctx: &mut MatchContext<T>,
        data: &[u8],
        options: &ConsumeOptions,
    ) -> ConsumeOutcome
    where
        T: Clone,
    {
        self.compile();
        match &self.inner {
            EngineState::Compiled(automaton) => automaton.consume(ctx, data, options),
            // compile() always leaves the engine compiled
            EngineState::Building(_) => unreachable!(),
        }
    }
}

impl<T> Default for AcEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AcEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            EngineState::Building(set) => f.debug_tuple("AcEngine::Building").field(set).finish(),
            EngineState::Compiled(automaton) => {
                f.debug_tuple("AcEngine::Compiled").field(automaton).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_compile_on_first_consume() {
        let mut engine = AcEngine::<()>::new();
        engine.add_pattern(b"he", None, None).unwrap();
        assert!(!engine.is_compiled());

        let mut ctx = MatchContext::new();
        let outcome = engine.consume(&mut ctx, b"she", &ConsumeOptions::all_matches());
        assert!(engine.is_compiled());
        assert!(outcome.is_match());
    }

    #[test]
    fn test_frozen_after_compile() {
        let mut engine = AcEngine::<()>::new();
        engine.add_pattern(b"he", None, None).unwrap();
        engine.compile();

        let result = engine.add_pattern(b"she", None, None);
        assert!(matches!(result, Err(AcError::Frozen)));

        // The attempt changed nothing: "he" still matches, and "she" only
        // matches through its "he" suffix, never as a pattern of its own
        assert_eq!(engine.pattern_count(), 1);
        let automaton = engine.automaton().unwrap();
        let matches = automaton.scan(b"she");
        assert_eq!(matches.len(), 1);
        assert_eq!(&matches[0].pattern[..], b"he");
    }

    #[test]
    fn test_explicit_compile_is_idempotent() {
        let mut engine = AcEngine::<()>::new();
        engine.add_pattern(b"he", None, None).unwrap();
        engine.compile();
        engine.compile();
        assert!(engine.is_compiled());
        assert_eq!(engine.pattern_count(), 1);
    }

    #[test]
    fn test_into_automaton_compiles() {
        let mut engine = AcEngine::<()>::new();
        engine.add_pattern(b"he", None, None).unwrap();
        let automaton = engine.into_automaton();
        assert_eq!(automaton.pattern_count(), 1);
        assert_eq!(automaton.scan(b"ushers").len(), 1);
    }

    #[test]
    fn test_shared_automaton_accessor() {
        let mut engine = AcEngine::<()>::new();
        engine.add_pattern(b"he", None, None).unwrap();
        assert!(engine.automaton().is_none());

        engine.compile();
        let automaton = engine.automaton().unwrap();
        assert_eq!(automaton.pattern_count(), 1);
    }
}
