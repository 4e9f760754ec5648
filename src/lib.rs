// ac-stream - Streaming Aho-Corasick Multi-Pattern Matcher
//
// This crate provides multi-pattern literal matching over byte streams
// using the Aho-Corasick algorithm, built for traffic-inspection rules
// that must evaluate many patterns against one pass over the data.
//
// ## Overview
//
// Patterns are inserted into a trie (`AcPatternSet`), the trie is compiled
// once into an immutable automaton (`AcAutomaton`: failure links, output
// chains, per-state transition indexes), and any number of independent
// `MatchContext`s then consume byte ranges against it. A context carries
// its cursor across calls, so a pattern split over multiple data chunks of
// the same logical stream is still detected.
//
// ## Architecture
//
// ```text
// ┌─────────────────────────────────────────────────┐
// │              AcPatternSet                       │
// │  (mutable trie, one state per distinct prefix)  │
// └──────────────┬──────────────────────────────────┘
//                │ compile (once)
//                v
// ┌─────────────────────────────────────────────────┐
// │              AcAutomaton                        │
// │  (failure links + output chains + per-state     │
// │   sorted transition indexes; immutable, Sync)   │
// └──────────────┬──────────────────────────────────┘
//                │ consume (per chunk)
//                v
// ┌─────────────────────────────────────────────────┐
// │              MatchContext                       │
// │  (current state, offsets, match list; one per   │
// │   streaming session, resumable across calls)    │
// └─────────────────────────────────────────────────┘
// ```
//
// `AcEngine` wraps the Building -> Compiled transition for callers that
// want lazy compilation on first consume and a runtime "frozen" error when
// patterns are added too late.

mod builder;
mod compiler;
mod engine;
mod matcher;
mod state;
mod transitions;

#[cfg(test)]
mod perf;

pub use builder::AcPatternSet;
pub use engine::AcEngine;
pub use matcher::{AcAutomaton, AcMatch, ConsumeOptions, ConsumeOutcome, MatchContext};
pub use state::MatchCallback;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building or driving the matcher
#[derive(Debug, Error)]
pub enum AcError {
    /// The automaton has been compiled; the trie is frozen
    #[error("automaton is compiled; patterns can no longer be added")]
    Frozen,

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("pattern too long: {length} bytes (max: {max})")]
    PatternTooLong { length: usize, max: usize },

    #[error("too many patterns: {count} (max: {max})")]
    TooManyPatterns { count: usize, max: usize },
}

/// Result type for matcher operations
pub type AcResult<T> = Result<T, AcError>;

/// Configuration for pattern insertion and compilation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcConfig {
    /// Normalize pattern and input bytes to ASCII lowercase
    pub case_insensitive: bool,

    /// Maximum number of distinct patterns (0 = unlimited)
    pub max_patterns: usize,

    /// Maximum pattern length in bytes (0 = unlimited)
    pub max_pattern_length: usize,

    /// Reset fail links that provably cannot yield a transition
    pub prune_dead_links: bool,
}

impl Default for AcConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            max_patterns: 10_000,
            max_pattern_length: 4096,
            prune_dead_links: true,
        }
    }
}

impl AcConfig {
    /// Default configuration with case-insensitive matching enabled
    pub fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
            ..Self::default()
        }
    }
}
