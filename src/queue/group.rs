use super::{EntryData, GroupEntry, Queue, QueueContext, QueueError, QueueResult, SortOrder};
use crate::collections::{
    ring::RingNodePtr,
    storage::{ArenaAlloc, ArenaFree, ArenaPtr},
};

/// A ring of queues, used by the k-way merge.
///
/// A group is identified by its sentinel entry. Every other entry wraps one
/// queue, a cached size and a numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Group(pub(super) GroupEntry);

impl Group {
    /// Create an empty group.
    ///
    /// Returns `None` if the sentinel cannot be allocated.
    pub fn new(ctx: &mut QueueContext) -> Option<Self> {
        let sentinel = ctx
            .try_alloc_with(|this| EntryData {
                prev: this,
                next: this,
                queue: None,
                size: 0,
                id: 0,
            })
            .ok()?;
        Some(Group(sentinel))
    }

    pub fn is_valid(self, ctx: &QueueContext) -> bool {
        self.0
            .try_deref(ctx)
            .is_some_and(|data| data.queue.is_none())
    }

    fn check(self, ctx: &QueueContext) -> Option<GroupEntry> { self.is_valid(ctx).then_some(self.0) }

    /// Append a queue to the group, returning its entry.
    ///
    /// The entry gets the next free id of the context. A queue can appear at
    /// most once in a group.
    pub fn push(self, ctx: &mut QueueContext, queue: Queue) -> QueueResult<GroupEntry> {
        let sentinel = self.check(ctx).ok_or(QueueError::Absent)?;
        queue.check(ctx)?;
        if self.entries(ctx).any(|entry| entry.queue(ctx) == Some(queue)) {
            return Err(QueueError::AlreadyGrouped);
        }
        let size = queue.size(ctx);
        let id = ctx.next_entry_id;
        let entry = ctx.try_alloc_with(|this| EntryData {
            prev: this,
            next: this,
            queue: Some(queue),
            size,
            id,
        })?;
        ctx.next_entry_id += 1;
        sentinel.insert_before(ctx, entry);
        Ok(entry)
    }

    /// Iterate the entries in ring order. An absent group has none.
    pub fn entries(self, ctx: &QueueContext) -> impl DoubleEndedIterator<Item = GroupEntry> + '_ {
        self.check(ctx)
            .map(|sentinel| sentinel.iter(ctx))
            .into_iter()
            .flatten()
    }

    /// The number of queues in the group.
    pub fn len(self, ctx: &QueueContext) -> usize { self.entries(ctx).count() }

    pub fn is_empty(self, ctx: &QueueContext) -> bool { self.len(ctx) == 0 }

    /// Find the entry with the given id.
    pub fn find(self, ctx: &QueueContext, id: usize) -> Option<GroupEntry> {
        self.entries(ctx)
            .find(|entry| entry.id(ctx) == Some(id))
    }

    /// Free every queue in the group, then the group itself.
    ///
    /// Queues that have already been freed elsewhere are skipped.
    pub fn free(self, ctx: &mut QueueContext) -> QueueResult<()> {
        let sentinel = self.check(ctx).ok_or(QueueError::Absent)?;
        let entries: Vec<GroupEntry> = sentinel.iter(ctx).collect();
        for entry in entries {
            if let Some(queue) = entry.queue(ctx) {
                if queue.is_valid(ctx) {
                    queue.free(ctx)?;
                }
            }
            ctx.free(entry);
        }
        ctx.free(sentinel);
        Ok(())
    }

    /// The first entry after `from` whose queue holds elements, refreshing
    /// the cached size of every entry it looks at.
    fn next_non_empty(self, ctx: &mut QueueContext, from: GroupEntry) -> Option<GroupEntry> {
        let mut curr = from.next(ctx);
        while curr != self.0 {
            if curr.refresh(ctx) > 0 {
                return Some(curr);
            }
            curr = curr.next(ctx);
        }
        None
    }

    /// Merge every queue of the group into one sorted queue.
    ///
    /// Each queue must already be sorted in `order`. Non-empty queues are
    /// paired in ring order and merged round after round, so the number of
    /// rounds is logarithmic in the number of queues. The survivor is the
    /// first entry with a live queue; every other queue ends up empty with a
    /// cached size of 0.
    ///
    /// Returns the number of elements of the survivor, which is also stored
    /// as its cached size. An absent group yields 0.
    pub fn merge_all(self, ctx: &mut QueueContext, order: SortOrder) -> usize {
        if !self.is_valid(ctx) {
            return 0;
        }
        let Some(survivor) = self
            .entries(ctx)
            .find(|entry| entry.queue(ctx).is_some_and(|q| q.is_valid(ctx)))
        else {
            self.refresh_all(ctx);
            return 0;
        };

        let mut round = 0;
        loop {
            let Some(mut next) = self.next_non_empty(ctx, survivor) else {
                break;
            };
            round += 1;
            let mut cur = survivor;
            loop {
                let (Some(into), Some(from)) = (cur.queue(ctx), next.queue(ctx)) else {
                    unreachable!("only entries with live queues are merged");
                };
                if let Err(err) = into.merge(ctx, from, order) {
                    tracing::warn!("aborting group merge: {}", err);
                    self.refresh_all(ctx);
                    return survivor.size(ctx);
                }
                next.deref_mut(ctx).size = 0;

                let Some(after) = self.next_non_empty(ctx, next) else {
                    break;
                };
                cur = after;
                let Some(after) = self.next_non_empty(ctx, cur) else {
                    break;
                };
                next = after;
            }
            tracing::debug!(round, "group merge round done");
        }

        // entries in front of the survivor are never visited by the rounds
        self.refresh_all(ctx);
        let size = survivor.size(ctx);
        tracing::debug!(size, rounds = round, "group merged");
        size
    }

    /// Recount every entry of the group.
    fn refresh_all(self, ctx: &mut QueueContext) {
        let entries: Vec<GroupEntry> = self.entries(ctx).collect();
        for entry in entries {
            entry.refresh(ctx);
        }
    }
}
