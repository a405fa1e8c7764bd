//! Invariant checks for queues and groups.
//!
//! After every public operation a ring must be closed, must reach its
//! sentinel again by following `next`, must not contain another sentinel, and
//! no element may be reachable from two queues.

use std::hash::Hash;

use rustc_hash::FxHashSet;
use thiserror::Error;

use super::{Group, GroupEntry, Node, Queue, QueueContext};
use crate::collections::ring::RingNodePtr;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("handle is absent")]
    Absent,

    #[error("{node:?} links to a freed node")]
    Dangling { node: Node },

    #[error("{node:?} is not linked back by its neighbours")]
    BrokenLink { node: Node },

    #[error("{node:?} is reached twice before the sentinel")]
    Revisited { node: Node },

    #[error("{node:?} is a sentinel inside another ring")]
    SentinelInside { node: Node },

    #[error("{node:?} is owned by more than one queue")]
    Shared { node: Node },

    #[error("group ring is broken at {entry:?}")]
    BrokenGroup { entry: GroupEntry },
}

enum Fault {
    Dangling,
    BrokenLink,
    Revisited,
}

/// Walk a ring from its sentinel, checking every link on the way.
///
/// Returns the nodes after the sentinel in ring order.
fn walk<T>(arena: &T::A, sentinel: T) -> Result<Vec<T>, (T, Fault)>
where
    T: RingNodePtr + Hash,
{
    let mut visited = FxHashSet::default();
    let mut nodes = Vec::new();
    let mut curr = sentinel;
    loop {
        if curr.try_deref(arena).is_none() {
            return Err((curr, Fault::Dangling));
        }
        let next = curr.next(arena);
        let prev = curr.prev(arena);
        if next.try_deref(arena).is_none() || prev.try_deref(arena).is_none() {
            return Err((curr, Fault::Dangling));
        }
        if next.prev(arena) != curr || prev.next(arena) != curr {
            return Err((curr, Fault::BrokenLink));
        }
        if !visited.insert(curr) {
            return Err((curr, Fault::Revisited));
        }
        if curr != sentinel {
            nodes.push(curr);
        }
        curr = next;
        if curr == sentinel {
            return Ok(nodes);
        }
    }
}

impl Queue {
    /// Check the ring invariants of this queue.
    pub fn verify(self, ctx: &QueueContext) -> Result<(), VerifyError> {
        self.verified_nodes(ctx).map(|_| ())
    }

    fn verified_nodes(self, ctx: &QueueContext) -> Result<Vec<Node>, VerifyError> {
        let sentinel = self.check(ctx).map_err(|_| VerifyError::Absent)?;
        let nodes = walk(ctx, sentinel).map_err(|(node, fault)| match fault {
            Fault::Dangling => VerifyError::Dangling { node },
            Fault::BrokenLink => VerifyError::BrokenLink { node },
            Fault::Revisited => VerifyError::Revisited { node },
        })?;
        if let Some(&node) = nodes.iter().find(|node| node.is_sentinel(ctx)) {
            return Err(VerifyError::SentinelInside { node });
        }
        Ok(nodes)
    }
}

impl Group {
    /// Check the group ring, every live queue in it, and that no element is
    /// shared between two of those queues.
    pub fn verify(self, ctx: &QueueContext) -> Result<(), VerifyError> {
        if !self.is_valid(ctx) {
            return Err(VerifyError::Absent);
        }
        let entries = walk(ctx, self.0).map_err(|(entry, _)| VerifyError::BrokenGroup { entry })?;

        let mut owned = FxHashSet::default();
        for entry in entries {
            let Some(queue) = entry.queue(ctx) else {
                return Err(VerifyError::BrokenGroup { entry });
            };
            if !queue.is_valid(ctx) {
                continue;
            }
            for node in queue.verified_nodes(ctx)? {
                if !owned.insert(node) {
                    return Err(VerifyError::Shared { node });
                }
            }
        }
        Ok(())
    }
}
