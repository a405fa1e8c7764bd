use std::cmp::Ordering;

use super::{Queue, QueueContext, QueueError, QueueResult};
use crate::collections::ring::RingNodePtr;

/// Which monotonic run a filter keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Remove every element with a strictly smaller value to its right.
    Ascend,
    /// Remove every element with a strictly greater value to its right.
    Descend,
}

impl Direction {
    /// Whether an element comparing as `ord` against the bound of everything
    /// to its right must be removed.
    fn violates(self, ord: Ordering) -> bool {
        match self {
            Direction::Ascend => ord == Ordering::Greater,
            Direction::Descend => ord == Ordering::Less,
        }
    }
}

impl Queue {
    /// Remove the element at index `n / 2` (0-based, from the front).
    pub fn delete_mid(self, ctx: &mut QueueContext) -> QueueResult<()> {
        self.check(ctx)?;
        let middle = self.middle(ctx).ok_or(QueueError::Empty)?;
        middle.release(ctx);
        Ok(())
    }

    /// Remove every element that has an equal neighbour.
    ///
    /// Only adjacency counts, the queue is not sorted first. A maximal run of
    /// equal values is removed as a whole, no copy of it survives.
    pub fn delete_dup(self, ctx: &mut QueueContext) -> QueueResult<()> {
        let sentinel = self.check(ctx)?;
        let mut curr = sentinel.next(ctx);
        while curr != sentinel {
            let mut run_end = curr;
            loop {
                let next = run_end.next(ctx);
                if next == sentinel || next.value(ctx) != curr.value(ctx) {
                    break;
                }
                run_end = next;
            }
            let after = run_end.next(ctx);
            if run_end != curr {
                let mut node = curr;
                while node != after {
                    let next = node.next(ctx);
                    node.release(ctx);
                    node = next;
                }
            }
            curr = after;
        }
        Ok(())
    }

    /// Remove every element that breaks the run selected by `direction`
    /// against some element to its right.
    ///
    /// Scans from the back. Kept elements always include the running
    /// minimum (or maximum) of the suffix, so comparing against the last kept
    /// element is enough.
    ///
    /// Returns the number of elements left, 0 for an empty or absent queue.
    pub fn filter_monotonic(self, ctx: &mut QueueContext, direction: Direction) -> usize {
        let Ok(sentinel) = self.check(ctx) else {
            return 0;
        };
        if sentinel.is_lonely(ctx) {
            return 0;
        }
        let mut bound = sentinel.prev(ctx);
        let mut kept = 1;
        let mut curr = bound.prev(ctx);
        while curr != sentinel {
            let prev = curr.prev(ctx);
            if direction.violates(curr.value(ctx).cmp(bound.value(ctx))) {
                curr.release(ctx);
            } else {
                bound = curr;
                kept += 1;
            }
            curr = prev;
        }
        kept
    }

    /// Remove every element with a strictly smaller value to its right.
    pub fn ascend(self, ctx: &mut QueueContext) -> usize { self.filter_monotonic(ctx, Direction::Ascend) }

    /// Remove every element with a strictly greater value to its right.
    pub fn descend(self, ctx: &mut QueueContext) -> usize { self.filter_monotonic(ctx, Direction::Descend) }
}
