use super::{Queue, QueueContext, QueueError, QueueResult};
use crate::collections::ring::RingNodePtr;

impl Queue {
    /// Reverse the order of the elements.
    ///
    /// Every node, the sentinel included, gets its links swapped.
    pub fn reverse(self, ctx: &mut QueueContext) -> QueueResult<()> {
        let sentinel = self.check(ctx)?;
        let mut node = sentinel;
        loop {
            let next = node.next(ctx);
            node.swap_links(ctx);
            node = next;
            if node == sentinel {
                break;
            }
        }
        Ok(())
    }

    /// Reverse each full group of `k` consecutive elements, counted from the
    /// front. A trailing group shorter than `k` keeps its order.
    ///
    /// `k == 0` is rejected without touching the queue, `k == 1` changes
    /// nothing.
    pub fn reverse_k(self, ctx: &mut QueueContext, k: usize) -> QueueResult<()> {
        let sentinel = self.check(ctx)?;
        if k == 0 {
            tracing::warn!("ignoring k-group reversal with group size 0");
            return Err(QueueError::InvalidGroupSize(k));
        }

        // `before` is the node right in front of the current group
        let mut before = sentinel;
        loop {
            let first = before.next(ctx);
            let mut after = first;
            for _ in 0..k {
                if after == sentinel {
                    return Ok(());
                }
                after = after.next(ctx);
            }

            // move every node behind `first` to the front of the group, the
            // links to `before` and `after` stay where they are
            let mut curr = first.next(ctx);
            while curr != after {
                let next = curr.next(ctx);
                curr.unlink(ctx);
                before.insert_after(ctx, curr);
                curr = next;
            }
            before = first;
        }
    }

    /// Swap every two adjacent elements.
    pub fn swap(self, ctx: &mut QueueContext) -> QueueResult<()> { self.reverse_k(ctx, 2) }
}
