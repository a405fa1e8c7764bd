use std::cmp::Ordering;

use super::{Queue, QueueContext, QueueError, QueueResult};
use crate::collections::{ring::RingNodePtr, storage::ArenaFree};

/// The order of a sorted queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Whether `a` must be placed strictly before `b`.
    ///
    /// Equal values never precede each other, which keeps merges stable.
    pub fn precedes(self, a: &str, b: &str) -> bool {
        match self {
            SortOrder::Ascending => a.cmp(b) == Ordering::Less,
            SortOrder::Descending => a.cmp(b) == Ordering::Greater,
        }
    }

    /// Whether a sequence of values is sorted in this order.
    pub fn is_sorted<'a>(self, values: impl IntoIterator<Item = &'a str>) -> bool {
        let mut values = values.into_iter();
        let Some(mut prev) = values.next() else {
            return true;
        };
        for value in values {
            if self.precedes(value, prev) {
                return false;
            }
            prev = value;
        }
        true
    }
}

impl Queue {
    /// Merge the elements of `other` into this queue.
    ///
    /// Both queues must already be sorted in `order`. Equal elements of this
    /// queue stay in front of equal elements of `other`. Afterwards `other`
    /// is empty, every element it held belongs to this queue.
    pub fn merge(self, ctx: &mut QueueContext, other: Queue, order: SortOrder) -> QueueResult<()> {
        self.check(ctx)?;
        other.check(ctx)?;
        if self == other {
            return Err(QueueError::SelfMerge);
        }
        self.merge_unchecked(ctx, other, order);
        Ok(())
    }

    fn merge_unchecked(self, ctx: &mut QueueContext, other: Queue, order: SortOrder) {
        let sentinel = self.0;
        let other_sentinel = other.0;

        let mut pos = sentinel.next(ctx);
        while !other_sentinel.is_lonely(ctx) {
            let node = other_sentinel.next(ctx);
            while pos != sentinel && !order.precedes(node.value(ctx), pos.value(ctx)) {
                pos = pos.next(ctx);
            }
            if pos == sentinel {
                // everything left in `other` goes behind the last element
                let last = other_sentinel.prev(ctx);
                sentinel.splice_before(ctx, node, last);
                break;
            }
            node.unlink(ctx);
            pos.insert_before(ctx, node);
        }
    }

    /// Stable merge sort.
    ///
    /// The queue is split at its middle into two queues, each half is sorted
    /// recursively and the halves are merged back. The temporary sentinels
    /// are reserved up front, so either the whole sort runs or nothing is
    /// touched.
    pub fn sort(self, ctx: &mut QueueContext, order: SortOrder) -> QueueResult<()> {
        self.check(ctx)?;
        let size = self.size(ctx);
        if size < 2 {
            return Ok(());
        }
        // one live sentinel per recursion level
        let depth = (usize::BITS - (size - 1).leading_zeros()) as usize;
        ctx.nodes.try_reserve(depth)?;
        tracing::trace!(size, depth, ?order, "sorting queue");
        self.sort_unchecked(ctx, order)
    }

    fn sort_unchecked(self, ctx: &mut QueueContext, order: SortOrder) -> QueueResult<()> {
        let sentinel = self.0;
        if sentinel.next(ctx) == sentinel.prev(ctx) {
            return Ok(());
        }
        let Some(middle) = self.middle(ctx) else {
            return Ok(());
        };

        let right = Queue::try_new(ctx)?;
        let last = sentinel.prev(ctx);
        right.0.splice_before(ctx, middle, last);

        let sorted = self
            .sort_unchecked(ctx, order)
            .and_then(|_| right.sort_unchecked(ctx, order));
        // merge back even on failure, the elements must not be lost
        self.merge_unchecked(ctx, right, order);
        ctx.free(right.0);
        sorted
    }
}
