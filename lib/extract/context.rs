use rustc_hash::FxHashMap;
use crate::algebra::Var;

/// A bijection between dense wire indices and opaque wire identifiers.
///
/// Built once per extraction call from the caller-supplied identifier list
/// and never resized; the wire count is fixed for the duration of one
/// extraction.
#[derive(Clone, Debug)]
pub struct WireMap {
    pub(crate) ids: Vec<String>,
    pub(crate) index: FxHashMap<String, usize>,
}

impl WireMap {
    /// Build the bijection from an identifier list. The identifiers must be
    /// distinct; the caller checks.
    pub(crate) fn new(ids: Vec<String>) -> Self {
        let index =
            ids.iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self { ids, index }
    }

    /// The number of wires.
    pub fn len(&self) -> usize { self.ids.len() }

    /// Return `true` if there are no wires.
    pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    /// The identifier of wire `i`.
    ///
    /// *Panics if `i` is out of range.*
    pub fn id(&self, i: usize) -> &str { &self.ids[i] }

    /// The index of identifier `id`, if present.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }
}

/// A pass-scoped allocator for fresh [`Var::Free`] names.
///
/// Threaded explicitly through the synthesis passes instead of living in
/// global state; a fresh allocator per extraction call keeps parallel
/// extractions independent.
#[derive(Clone, Debug, Default)]
pub struct FreshAlloc {
    next: usize,
}

impl FreshAlloc {
    /// Create a new allocator starting at 0.
    pub fn new() -> Self { Self::default() }

    /// Allocate the next free variable.
    pub fn fresh(&mut self) -> Var {
        let v = Var::free(format!("t{}", self.next));
        self.next += 1;
        v
    }
}
