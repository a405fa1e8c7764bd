//! # Queue
//!
//! A queue of owned strings on top of the sentinel ring in
//! [ring](crate::collections::ring). A [Queue] is nothing but the handle of
//! its sentinel; the size is always recounted by walking the ring.
//!
//! Every operation takes the [QueueContext] that owns the nodes. A queue
//! handle that has been freed, or a handle that does not point at a sentinel,
//! is *absent*: operations on it change nothing and report a neutral value
//! (`Err(QueueError::Absent)`, `None` or `0`).
//!
//! The algorithm families live in submodules:
//!
//! - `element`: insertion and removal at both ends.
//! - `delete`: middle deletion, duplicate deletion, monotonic filters.
//! - `reverse`: full reversal, k-group reversal, pairwise swap.
//! - `sort`: two-queue merge and merge sort.
//! - `group`: groups of queues and the k-way merge.
//! - `verify`: ring invariant checker.

mod context;
mod delete;
mod element;
mod group;
mod reverse;
mod sort;
mod verify;

use std::collections::TryReserveError;

pub use context::{EntryData, GroupEntry, Node, NodeData, NodeKind, QueueContext, QueueDisplay};
pub use delete::Direction;
pub use element::Element;
pub use group::Group;
pub use sort::SortOrder;
use thiserror::Error;
pub use verify::VerifyError;

use crate::collections::{
    ring::RingNodePtr,
    storage::{ArenaAlloc, ArenaFree},
};

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue handle is absent")]
    Absent,

    #[error("queue is empty")]
    Empty,

    #[error("cannot merge a queue into itself")]
    SelfMerge,

    #[error("queue is already in the group")]
    AlreadyGrouped,

    #[error("invalid group size {0}")]
    InvalidGroupSize(usize),

    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
}

pub type QueueResult<T> = Result<T, QueueError>;

/// A queue, identified by its sentinel node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Queue(Node);

impl Queue {
    /// Create an empty queue.
    ///
    /// Returns `None` if the sentinel cannot be allocated.
    pub fn new(ctx: &mut QueueContext) -> Option<Self> { Self::try_new(ctx).ok() }

    pub(crate) fn try_new(ctx: &mut QueueContext) -> QueueResult<Self> {
        let sentinel = ctx.try_alloc_with(NodeData::sentinel)?;
        Ok(Queue(sentinel))
    }

    /// Release every element and the sentinel.
    ///
    /// The handle is absent afterwards.
    pub fn free(self, ctx: &mut QueueContext) -> QueueResult<()> {
        let sentinel = self.check(ctx)?;
        let mut curr = sentinel.next(ctx);
        while curr != sentinel {
            let next = curr.next(ctx);
            ctx.free(curr);
            curr = next;
        }
        ctx.free(sentinel);
        Ok(())
    }

    /// The sentinel node of the queue.
    pub fn sentinel(self) -> Node { self.0 }

    /// Check if the handle refers to a live queue.
    pub fn is_valid(self, ctx: &QueueContext) -> bool { self.0.is_sentinel(ctx) }

    pub(crate) fn check(self, ctx: &QueueContext) -> QueueResult<Node> {
        if self.is_valid(ctx) {
            Ok(self.0)
        } else {
            Err(QueueError::Absent)
        }
    }

    /// Check if the queue holds no element. An absent queue is empty.
    pub fn is_empty(self, ctx: &QueueContext) -> bool {
        self.check(ctx)
            .map_or(true, |sentinel| sentinel.is_lonely(ctx))
    }

    /// Count the elements by walking the ring.
    pub fn size(self, ctx: &QueueContext) -> usize {
        self.check(ctx)
            .map_or(0, |sentinel| sentinel.iter(ctx).count())
    }

    /// Iterate the element strings from front to back.
    ///
    /// The iterator is double-ended, `.rev()` walks the `prev` links.
    pub fn iter<'a>(self, ctx: &'a QueueContext) -> impl DoubleEndedIterator<Item = &'a str> + 'a {
        self.check(ctx)
            .ok()
            .map(|sentinel| sentinel.iter(ctx))
            .into_iter()
            .flatten()
            .map(move |node| node.value(ctx))
    }

    /// Collect the element strings from front to back.
    pub fn values(self, ctx: &QueueContext) -> Vec<&str> { self.iter(ctx).collect() }

    /// Peek the front element.
    pub fn first(self, ctx: &QueueContext) -> Option<&str> { self.iter(ctx).next() }

    /// Peek the back element.
    pub fn last(self, ctx: &QueueContext) -> Option<&str> { self.iter(ctx).next_back() }

    /// Locate the structural middle, index `n / 2` counted from the front.
    ///
    /// One cursor walks from the front and one from the back until they meet
    /// (odd length) or become adjacent (even length, the back cursor is the
    /// middle then). Returns `None` on an empty queue.
    pub(crate) fn middle(self, ctx: &QueueContext) -> Option<Node> {
        let sentinel = self.0;
        if sentinel.is_lonely(ctx) {
            return None;
        }
        let mut front = sentinel.next(ctx);
        let mut back = sentinel.prev(ctx);
        while front != back {
            if front.next(ctx) == back {
                return Some(back);
            }
            front = front.next(ctx);
            back = back.prev(ctx);
        }
        Some(front)
    }
}
