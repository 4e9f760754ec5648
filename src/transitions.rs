// Per-state transition index
//
// Maps "which child do I reach on symbol X" in O(log k) for a state with k
// children, instead of scanning the sibling list. Children are collected
// and sorted by symbol once at compile time; lookup is a binary search, so
// the midpoint probe sequence is exactly a balanced binary search tree
// rooted at the median symbol.

use crate::state::StateId;
use smallvec::SmallVec;

/// Read-only symbol -> child index derived from a state's children
#[derive(Debug, Clone, Default)]
pub(crate) struct TransitionIndex {
    symbols: Box<[u8]>,
    targets: Box<[StateId]>,
}

impl TransitionIndex {
    /// Build the index from a child list in any order
    pub(crate) fn from_children(children: &[(u8, StateId)]) -> Self {
        let mut sorted: SmallVec<[(u8, StateId); 8]> = SmallVec::from_slice(children);
        sorted.sort_unstable_by_key(|&(symbol, _)| symbol);

        Self {
            symbols: sorted.iter().map(|&(symbol, _)| symbol).collect(),
            targets: sorted.iter().map(|&(_, id)| id).collect(),
        }
    }

    /// The goto() function: child reached on `symbol`, if any.
    /// Never mutates; safe for concurrent callers once built.
    #[inline]
    pub(crate) fn find(&self, symbol: u8) -> Option<StateId> {
        self.symbols
            .binary_search(&symbol)
            .ok()
            .map(|pos| self.targets[pos])
    }

    /// Sorted symbols with an outgoing transition
    pub(crate) fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// True when every symbol of `a` also appears in `b`. Both slices sorted.
pub(crate) fn symbols_subset(a: &[u8], b: &[u8]) -> bool {
    let mut b_iter = b.iter();
    'outer: for symbol in a {
        for candidate in b_iter.by_ref() {
            match candidate.cmp(symbol) {
                std::cmp::Ordering::Less => continue,
                std::cmp::Ordering::Equal => continue 'outer,
                std::cmp::Ordering::Greater => return false,
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(symbols: &[u8]) -> TransitionIndex {
        let children: Vec<(u8, StateId)> = symbols
            .iter()
            .enumerate()
            .map(|(i, &s)| (s, StateId::new(i + 1)))
            .collect();
        TransitionIndex::from_children(&children)
    }

    #[test]
    fn test_empty_index() {
        let index = TransitionIndex::default();
        assert!(index.is_empty());
        assert_eq!(index.find(b'a'), None);
    }

    #[test]
    fn test_find_sorts_unordered_children() {
        let index = index_of(b"zqam");
        assert_eq!(index.symbols(), b"amqz");

        assert_eq!(index.find(b'z'), Some(StateId::new(1)));
        assert_eq!(index.find(b'q'), Some(StateId::new(2)));
        assert_eq!(index.find(b'a'), Some(StateId::new(3)));
        assert_eq!(index.find(b'm'), Some(StateId::new(4)));
        assert_eq!(index.find(b'b'), None);
    }

    #[test]
    fn test_find_wide_fanout() {
        // ASCII-range fan-out like a near-root state in a large rule set
        let symbols: Vec<u8> = (b' '..=b'~').collect();
        let children: Vec<(u8, StateId)> = symbols
            .iter()
            .enumerate()
            .map(|(i, &s)| (s, StateId::new(i + 1)))
            .collect();
        let index = TransitionIndex::from_children(&children);

        for (i, &s) in symbols.iter().enumerate() {
            assert_eq!(index.find(s), Some(StateId::new(i + 1)));
        }
        assert_eq!(index.find(0x00), None);
        assert_eq!(index.find(0xff), None);
    }

    #[test]
    fn test_symbols_subset() {
        assert!(symbols_subset(b"", b""));
        assert!(symbols_subset(b"", b"abc"));
        assert!(symbols_subset(b"b", b"abc"));
        assert!(symbols_subset(b"ac", b"abc"));
        assert!(symbols_subset(b"abc", b"abc"));
        assert!(!symbols_subset(b"abd", b"abc"));
        assert!(!symbols_subset(b"a", b""));
        assert!(!symbols_subset(b"z", b"abc"));
    }
}
