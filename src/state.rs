// Trie state structures
//
// One `AcState` exists per distinct pattern prefix. States live in a single
// arena (`Vec<AcState>`) and reference each other through stable `StateId`
// indices: `parent` and `children` form the trie proper, `fail` and
// `outputs` are the cross-edge layer added at compile time, and
// `transitions` is the derived per-state lookup index.

use crate::matcher::AcMatch;
use crate::transitions::TransitionIndex;
use smallvec::SmallVec;
use std::sync::Arc;

/// Stable arena index of a trie state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct StateId(u32);

impl StateId {
    /// The root state is always the first arena entry
    pub(crate) const ROOT: StateId = StateId(0);

    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        StateId(index as u32)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Callback invoked for each reported match when requested via
/// [`ConsumeOptions`](crate::ConsumeOptions)
pub type MatchCallback<T> = Arc<dyn Fn(&AcMatch<T>) + Send + Sync>;

/// A single trie state
pub(crate) struct AcState<T> {
    /// Byte consumed to reach this state from its parent (root: unused)
    pub(crate) symbol: u8,

    /// Length of the prefix this state represents (root = 0)
    pub(crate) depth: usize,

    /// Bytes of the path from root to this state, kept for reporting
    pub(crate) prefix: Arc<[u8]>,

    /// At least one inserted pattern ends exactly here
    pub(crate) is_output: bool,

    /// Opaque data attached to the pattern ending here (last writer wins)
    pub(crate) payload: Option<T>,

    /// Callback attached to the pattern ending here (last writer wins)
    pub(crate) callback: Option<MatchCallback<T>>,

    /// Non-owning back-reference to the parent state
    pub(crate) parent: StateId,

    /// Child states in insertion order; no duplicate symbols
    pub(crate) children: SmallVec<[(u8, StateId); 4]>,

    /// Failure link: longest proper suffix of this prefix that is itself a
    /// path from root. Root fails to itself.
    pub(crate) fail: StateId,

    /// First output state on the fail chain, if any
    pub(crate) outputs: Option<StateId>,

    /// Sorted transition index over `children`, built at compile time
    pub(crate) transitions: TransitionIndex,
}

impl<T> AcState<T> {
    /// Create the root state
    pub(crate) fn root() -> Self {
        Self {
            symbol: 0,
            depth: 0,
            prefix: Arc::from(&[][..]),
            is_output: false,
            payload: None,
            callback: None,
            parent: StateId::ROOT,
            children: SmallVec::new(),
            fail: StateId::ROOT,
            outputs: None,
            transitions: TransitionIndex::default(),
        }
    }

    /// Create a child of `parent` reached by `symbol`
    pub(crate) fn child_of(parent: StateId, parent_prefix: &[u8], symbol: u8) -> Self {
        let mut prefix = Vec::with_capacity(parent_prefix.len() + 1);
        prefix.extend_from_slice(parent_prefix);
        prefix.push(symbol);

        Self {
            symbol,
            depth: prefix.len(),
            prefix: prefix.into(),
            is_output: false,
            payload: None,
            callback: None,
            parent,
            children: SmallVec::new(),
            fail: StateId::ROOT,
            outputs: None,
            transitions: TransitionIndex::default(),
        }
    }

    /// Look up a child by symbol with a linear scan over the sibling list.
    /// Used during construction only; compiled lookups go through
    /// `transitions`.
    pub(crate) fn child_for_symbol(&self, symbol: u8) -> Option<StateId> {
        self.children
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|&(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_state() {
        let root = AcState::<()>::root();
        assert_eq!(root.depth, 0);
        assert!(root.prefix.is_empty());
        assert_eq!(root.fail, StateId::ROOT);
        assert!(!root.is_output);
    }

    #[test]
    fn test_child_prefix() {
        let child = AcState::<()>::child_of(StateId::ROOT, b"ab", b'c');
        assert_eq!(child.depth, 3);
        assert_eq!(&child.prefix[..], b"abc");
        assert_eq!(child.symbol, b'c');
    }

    #[test]
    fn test_child_for_symbol() {
        let mut state = AcState::<()>::root();
        state.children.push((b'a', StateId::new(1)));
        state.children.push((b'z', StateId::new(2)));

        assert_eq!(state.child_for_symbol(b'a'), Some(StateId::new(1)));
        assert_eq!(state.child_for_symbol(b'z'), Some(StateId::new(2)));
        assert_eq!(state.child_for_symbol(b'q'), None);
    }
}
