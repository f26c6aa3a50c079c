//! Generation-ordered working set for the backward traversal.

use std::collections::{BinaryHeap, HashSet};
use std::rc::Rc;

use crate::autograd::OpNode;

/// Max-priority set of operations pending backward processing.
///
/// Keyed by `(generation, seq)`, deduplicated by node identity. Popping in
/// strictly decreasing generation order guarantees that by the time a
/// variable's producer is processed, every consumer of that variable has
/// already contributed its gradient share: any not-yet-processed consumer
/// sits at a generation >= the producer's. The `seq` tie-break makes
/// traversal order deterministic among equal generations (most recently
/// recorded first); correctness does not depend on it.
pub(crate) struct PendingOps {
    heap: BinaryHeap<Entry>,
    seen: HashSet<*const OpNode>,
}

struct Entry {
    generation: u32,
    seq: u64,
    node: Rc<OpNode>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        (self.generation, self.seq) == (other.generation, other.seq)
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.generation, self.seq).cmp(&(other.generation, other.seq))
    }
}

impl PendingOps {
    pub(crate) fn new() -> Self {
        PendingOps {
            heap: BinaryHeap::new(),
            seen: HashSet::new(),
        }
    }

    /// Inserts a node unless it is already pending.
    pub(crate) fn push(&mut self, node: Rc<OpNode>) {
        if self.seen.insert(Rc::as_ptr(&node)) {
            self.heap.push(Entry {
                generation: node.generation,
                seq: node.seq,
                node,
            });
        }
    }

    /// Removes and returns the highest-generation pending node.
    pub(crate) fn pop(&mut self) -> Option<Rc<OpNode>> {
        let entry = self.heap.pop()?;
        self.seen.remove(&Rc::as_ptr(&entry.node));
        Some(entry.node)
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::Op;
    use crate::error::GradixError;
    use crate::tensor::Tensor;
    use crate::variable::Variable;

    #[derive(Debug)]
    struct Stub;

    impl Op for Stub {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn forward(&mut self, _xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
            Ok(vec![])
        }

        fn backward(
            &self,
            _inputs: &[Variable],
            _gys: &[Variable],
        ) -> Result<Vec<Variable>, GradixError> {
            Ok(vec![])
        }
    }

    fn node(generation: u32, seq: u64) -> Rc<OpNode> {
        Rc::new(OpNode {
            op: Box::new(Stub),
            inputs: vec![],
            outputs: vec![],
            generation,
            seq,
        })
    }

    #[test]
    fn pops_in_decreasing_generation_order() {
        let mut pending = PendingOps::new();
        pending.push(node(0, 0));
        pending.push(node(2, 1));
        pending.push(node(1, 2));

        let order: Vec<u32> = std::iter::from_fn(|| pending.pop())
            .map(|n| n.generation)
            .collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn equal_generations_pop_most_recent_first() {
        let mut pending = PendingOps::new();
        pending.push(node(1, 10));
        pending.push(node(1, 11));
        pending.push(node(1, 9));

        let order: Vec<u64> = std::iter::from_fn(|| pending.pop()).map(|n| n.seq).collect();
        assert_eq!(order, vec![11, 10, 9]);
    }

    #[test]
    fn duplicate_insertion_is_ignored() {
        let mut pending = PendingOps::new();
        let n = node(3, 0);
        pending.push(Rc::clone(&n));
        pending.push(Rc::clone(&n));
        assert_eq!(pending.len(), 1);
        assert!(pending.pop().is_some());
        assert!(pending.pop().is_none());
    }

    #[test]
    fn reinsertion_after_pop_is_allowed() {
        let mut pending = PendingOps::new();
        let n = node(3, 0);
        pending.push(Rc::clone(&n));
        let popped = pending.pop().unwrap();
        pending.push(popped);
        assert_eq!(pending.len(), 1);
    }
}
