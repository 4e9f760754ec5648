// Compiled automaton and streaming consume
//
// `AcAutomaton` is the frozen result of compilation: trie, failure links,
// output chains, and transition indexes, all immutable and safe to share
// across threads. `MatchContext` is the per-session cursor that makes
// consumption resumable: the same context fed successive chunks of one
// logical stream detects patterns spanning chunk boundaries.

use crate::state::{AcState, StateId};
use crate::AcConfig;
use std::fmt;
use std::sync::Arc;

/// A single reported match
#[derive(Clone)]
pub struct AcMatch<T> {
    /// The pattern bytes (case-normalized if the automaton is)
    pub pattern: Arc<[u8]>,

    /// Pattern length in bytes
    pub pattern_len: usize,

    /// Offset of the match start over all bytes this context has processed
    pub offset: u64,

    /// Offset of the match start relative to the current consume call.
    /// Negative when the match began in a previously consumed chunk.
    pub relative_offset: i64,

    /// Payload registered with the pattern, if any
    pub payload: Option<T>,
}

impl<T> fmt::Debug for AcMatch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcMatch")
            .field("pattern", &String::from_utf8_lossy(&self.pattern))
            .field("offset", &self.offset)
            .field("relative_offset", &self.relative_offset)
            .finish()
    }
}

/// Options for a single consume call
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsumeOptions {
    /// Report every match instead of returning at the first one
    pub match_all: bool,

    /// Append match records to the context's match list
    pub record_matches: bool,

    /// Invoke callbacks registered with matched patterns
    pub invoke_callbacks: bool,
}

impl ConsumeOptions {
    /// Return at the first match, recording nothing (the default)
    pub fn first_match() -> Self {
        Self::default()
    }

    /// Scan the whole input and record every match
    pub fn all_matches() -> Self {
        Self {
            match_all: true,
            record_matches: true,
            invoke_callbacks: false,
        }
    }

    /// Enable callback invocation on top of the current options
    pub fn with_callbacks(mut self) -> Self {
        self.invoke_callbacks = true;
        self
    }
}

/// Outcome of a consume call. Finding nothing is a normal result, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// At least one match occurred during this call
    MatchFound,
    /// No pattern matched during this call
    NoMatch,
}

impl ConsumeOutcome {
    pub fn is_match(self) -> bool {
        matches!(self, ConsumeOutcome::MatchFound)
    }
}

/// Per-session matching cursor
///
/// Holds the minimal mutable state needed to resume matching across
/// multiple consume calls: the current automaton state, byte counters, the
/// match counter, and the optional match list. A context belongs to
/// exactly one logical thread of control; the automaton it is driven
/// against must be the same for its whole lifetime.
#[derive(Debug)]
pub struct MatchContext<T> {
    pub(crate) current: StateId,
    pub(crate) processed: u64,
    pub(crate) call_offset: u64,
    pub(crate) match_count: u64,
    pub(crate) matches: Vec<AcMatch<T>>,
}

impl<T> MatchContext<T> {
    /// Create a fresh context positioned at the automaton root
    pub fn new() -> Self {
        Self {
            current: StateId::ROOT,
            processed: 0,
            call_offset: 0,
            match_count: 0,
            matches: Vec::new(),
        }
    }

    /// Restore the context to its freshly-created state
    pub fn reset(&mut self) {
        self.current = StateId::ROOT;
        self.processed = 0;
        self.call_offset = 0;
        self.match_count = 0;
        self.matches.clear();
    }

    /// Total bytes consumed over the lifetime of this context
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Total matches observed by this context
    pub fn match_count(&self) -> u64 {
        self.match_count
    }

    /// Matches recorded so far, in end-position order
    pub fn matches(&self) -> &[AcMatch<T>] {
        &self.matches
    }

    /// Drain the recorded matches, leaving the cursor intact
    pub fn take_matches(&mut self) -> Vec<AcMatch<T>> {
        std::mem::take(&mut self.matches)
    }
}

impl<T> Default for MatchContext<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A compiled, immutable Aho-Corasick automaton
///
/// Safe to share read-only across any number of concurrently running
/// contexts.
pub struct AcAutomaton<T> {
    states: Vec<AcState<T>>,
    pattern_count: usize,
    config: AcConfig,
}

impl<T> AcAutomaton<T> {
    pub(crate) fn from_compiled(
        states: Vec<AcState<T>>,
        pattern_count: usize,
        config: AcConfig,
    ) -> Self {
        Self {
            states,
            pattern_count,
            config,
        }
    }

    /// Number of distinct patterns compiled in
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Number of trie states, including the root
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Whether input bytes are normalized to ASCII lowercase
    pub fn is_case_insensitive(&self) -> bool {
        self.config.case_insensitive
    }

    /// Consume a byte range, advancing the context.
    ///
    /// Without `match_all`, returns at the first match without scanning the
    /// rest of the input; the context keeps its position either way, so the
    /// next call picks up exactly where this one stopped. Matches ending at
    /// the same position are reported longest first, followed by its suffix
    /// patterns via the output chain.
    pub fn consume(
        &self,
        ctx: &mut MatchContext<T>,
        data: &[u8],
        options: &ConsumeOptions,
    ) -> ConsumeOutcome
    where
        T: Clone,
    {
        ctx.call_offset = 0;
        let mut current = ctx.current;
        let mut matched = false;

        for &byte in data {
            let symbol = if self.config.case_insensitive {
                byte.to_ascii_lowercase()
            } else {
                byte
            };
            ctx.processed += 1;
            ctx.call_offset += 1;

            // Follow failure links until a transition exists or we sit at
            // the root with nowhere to go.
            let next = loop {
                if let Some(next) = self.states[current.index()].transitions.find(symbol) {
                    break Some(next);
                }
                if current == StateId::ROOT {
                    break None;
                }
                current = self.states[current.index()].fail;
            };

            let Some(next) = next else {
                ctx.current = current;
                continue;
            };

            current = next;
            ctx.current = current;

            if self.states[current.index()].is_output {
                matched = true;
                ctx.match_count += 1;
                self.report(ctx, current, options);

                if !options.match_all {
                    return ConsumeOutcome::MatchFound;
                }

                // Shorter suffix patterns ending at this same position
                let mut outputs = self.states[current.index()].outputs;
                while let Some(id) = outputs {
                    ctx.match_count += 1;
                    self.report(ctx, id, options);
                    outputs = self.states[id.index()].outputs;
                }
            }
        }

        ctx.current = current;
        if matched {
            ConsumeOutcome::MatchFound
        } else {
            ConsumeOutcome::NoMatch
        }
    }

    /// One-shot scan: consume the whole input against a fresh context and
    /// return every match.
    pub fn scan(&self, data: &[u8]) -> Vec<AcMatch<T>>
    where
        T: Clone,
    {
        let mut ctx = MatchContext::new();
        self.consume(&mut ctx, data, &ConsumeOptions::all_matches());
        ctx.matches
    }

    fn report(&self, ctx: &mut MatchContext<T>, id: StateId, options: &ConsumeOptions)
    where
        T: Clone,
    {
        if !options.record_matches && !options.invoke_callbacks {
            return;
        }

        let state = &self.states[id.index()];
        let record = AcMatch {
            pattern: Arc::clone(&state.prefix),
            pattern_len: state.depth,
            offset: ctx.processed - state.depth as u64,
            relative_offset: ctx.call_offset as i64 - state.depth as i64,
            payload: state.payload.clone(),
        };

        if options.invoke_callbacks {
            if let Some(callback) = &state.callback {
                callback(&record);
            }
        }
        if options.record_matches {
            ctx.matches.push(record);
        }
    }

    #[cfg(test)]
    pub(crate) fn states(&self) -> &[AcState<T>] {
        &self.states
    }
}

impl<T> fmt::Debug for AcAutomaton<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcAutomaton")
            .field("patterns", &self.pattern_count)
            .field("states", &self.states.len())
            .field("case_insensitive", &self.config.case_insensitive)
            .finish()
    }
}
