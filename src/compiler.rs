// Link builder - the one-time compilation pass
//
// Turns a pure trie into a complete Aho-Corasick automaton:
//   1. build the per-state transition indexes,
//   2. compute failure links breadth-first,
//   3. link each state to the first output on its fail chain,
//   4. prune fail links that can never yield a transition,
// and hand the frozen arena to `AcAutomaton`.
//
// The pass runs exactly once per automaton; there is no incremental
// recompilation after further insertions.

use crate::builder::AcPatternSet;
use crate::matcher::AcAutomaton;
use crate::state::{AcState, StateId};
use crate::transitions::{symbols_subset, TransitionIndex};
use std::collections::VecDeque;
use tracing::debug;

pub(crate) fn compile<T>(set: AcPatternSet<T>) -> AcAutomaton<T> {
    let (mut states, pattern_count, config) = set.into_parts();

    build_transition_indexes(&mut states);
    link_fail_states(&mut states);
    link_outputs(&mut states);
    if config.prune_dead_links {
        prune_dead_links(&mut states);
    }

    debug!(
        states = states.len(),
        patterns = pattern_count,
        case_insensitive = config.case_insensitive,
        "compiled automaton"
    );

    AcAutomaton::from_compiled(states, pattern_count, config)
}

/// Build the sorted transition index of every state with children,
/// including the root. Lookups from here on are O(log fan-out).
fn build_transition_indexes<T>(states: &mut [AcState<T>]) {
    for state in states.iter_mut() {
        if !state.children.is_empty() {
            state.transitions = TransitionIndex::from_children(&state.children);
        }
    }
}

/// Compute failure links in breadth-first order.
///
/// The fail target of a state is the trie state reached by the longest
/// proper suffix of its prefix that is itself a path from root. Direct
/// children of the root fail to the root; deeper states follow the parent's
/// fail chain until a state with a transition on their symbol is found.
/// BFS order guarantees every shallower fail link is final when consulted.
fn link_fail_states<T>(states: &mut [AcState<T>]) {
    let mut queue: VecDeque<StateId> = VecDeque::new();

    for i in 0..states[StateId::ROOT.index()].children.len() {
        queue.push_back(states[StateId::ROOT.index()].children[i].1);
    }

    while let Some(id) = queue.pop_front() {
        let parent = states[id.index()].parent;
        let symbol = states[id.index()].symbol;

        let fail = if parent == StateId::ROOT {
            StateId::ROOT
        } else {
            let mut candidate = states[parent.index()].fail;
            loop {
                if let Some(target) = states[candidate.index()].transitions.find(symbol) {
                    break target;
                }
                if candidate == StateId::ROOT {
                    break StateId::ROOT;
                }
                candidate = states[candidate.index()].fail;
            }
        };
        states[id.index()].fail = fail;

        for i in 0..states[id.index()].children.len() {
            queue.push_back(states[id.index()].children[i].1);
        }
    }
}

/// Link every state to the nearest output on its fail chain. Matching
/// reconstructs the full set of suffix patterns at a position by following
/// `outputs` repeatedly, so only the head of the chain is stored.
fn link_outputs<T>(states: &mut [AcState<T>]) {
    for id in 1..states.len() {
        let mut candidate = states[id].fail;
        let mut output = None;
        while candidate != StateId::ROOT {
            if states[candidate.index()].is_output {
                output = Some(candidate);
                break;
            }
            candidate = states[candidate.index()].fail;
        }
        states[id].outputs = output;
    }
}

/// Reset fail links that can never produce a transition.
///
/// A fail chain is only ever followed after a transition attempt on the
/// state itself has failed. If no state on the chain offers a symbol the
/// state lacks, walking it is wasted work and the link can point straight
/// at the root. The check covers the entire chain: a single-level check
/// would skip transitions reachable two or more fail hops away and change
/// match results. Output links are unaffected; they are resolved before
/// this pass runs.
fn prune_dead_links<T>(states: &mut [AcState<T>]) {
    let mut pruned = 0usize;

    for id in 1..states.len() {
        if states[id].transitions.is_empty() || states[id].fail == StateId::ROOT {
            continue;
        }

        let mut covered = true;
        let mut candidate = states[id].fail;
        while candidate != StateId::ROOT {
            let chain_symbols = states[candidate.index()].transitions.symbols();
            if !symbols_subset(chain_symbols, states[id].transitions.symbols()) {
                covered = false;
                break;
            }
            candidate = states[candidate.index()].fail;
        }

        if covered {
            states[id].fail = StateId::ROOT;
            pruned += 1;
        }
    }

    if pruned > 0 {
        debug!(pruned, "reset dead fail links");
    }
}
