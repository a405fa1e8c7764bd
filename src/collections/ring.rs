//! # Arena-based Circular Ring
//!
//! A doubly-linked circular list with a sentinel. Every ring has exactly one
//! sentinel node that carries no data; an empty ring is a sentinel whose
//! `prev` and `next` both point to itself.
//!
//! Nodes live in an arena, so the links are handles and every relink is a
//! couple of slot writes. The ring is always closed: for every node `n`,
//! `n.next.prev == n` and `n.prev.next == n`.

use super::storage::ArenaPtr;

/// Interfaces for a node in a circular ring.
///
/// The same trait is used for the sentinel and for data nodes, the ring
/// itself does not distinguish them. Whoever owns the sentinel decides where
/// the ring starts and ends.
///
/// # Notes
///
/// The setters in this trait are low-level operations, and it is not
/// recommended to call them directly. Instead, use `insert-`, `splice-` and
/// [unlink](RingNodePtr::unlink) to manipulate the ring.
pub trait RingNodePtr: ArenaPtr {
    /// Get the next node.
    fn next(self, arena: &Self::A) -> Self;

    /// Get the previous node.
    fn prev(self, arena: &Self::A) -> Self;

    /// Set the next node.
    fn set_next(self, arena: &mut Self::A, next: Self);

    /// Set the previous node.
    fn set_prev(self, arena: &mut Self::A, prev: Self);

    /// Link the node to itself, making it a one-node ring.
    fn init(self, arena: &mut Self::A) {
        self.set_next(arena, self);
        self.set_prev(arena, self);
    }

    /// Check if the node is alone in its ring.
    ///
    /// For a sentinel this means the ring holds no data.
    fn is_lonely(self, arena: &Self::A) -> bool { self.next(arena) == self }

    /// Insert a node after the current node.
    ///
    /// # Parameters
    ///
    /// - `arena`: The arena of the nodes.
    /// - `node`: The node to insert, which must not be linked into any other
    ///   ring (a lonely node, or one that has just been unlinked).
    fn insert_after(self, arena: &mut Self::A, node: Self) {
        // Before:
        //  [ self ] <--> [ next ]
        // After:
        //  [ self ] <--> [ node ] <--> [ next ]
        let next = self.next(arena);
        node.set_prev(arena, self);
        node.set_next(arena, next);
        next.set_prev(arena, node);
        self.set_next(arena, node);
    }

    /// Insert a node before the current node.
    ///
    /// # See Also
    ///
    /// [insert_after](RingNodePtr::insert_after)
    fn insert_before(self, arena: &mut Self::A, node: Self) {
        let prev = self.prev(arena);
        prev.insert_after(arena, node);
    }

    /// Unlink the current node.
    ///
    /// The node is not deallocated, the caller is responsible for freeing or
    /// reusing it. The unlinked node is left as a one-node ring, so
    /// unlinking it again does nothing.
    fn unlink(self, arena: &mut Self::A) {
        let prev = self.prev(arena);
        let next = self.next(arena);
        prev.set_next(arena, next);
        next.set_prev(arena, prev);
        self.init(arena);
    }

    /// Move the run `first ..= last` in front of the current node.
    ///
    /// The run is detached from whatever ring it is in, and the ring it
    /// leaves is closed over the gap. Splicing the entire content of a ring
    /// (`first = s.next`, `last = s.prev`) leaves its sentinel `s` lonely.
    ///
    /// # Parameters
    ///
    /// - `arena`: The arena of the nodes.
    /// - `first`: The first node of the run.
    /// - `last`: The last node of the run, reachable from `first` by
    ///   following `next` without passing the current node.
    fn splice_before(self, arena: &mut Self::A, first: Self, last: Self) {
        let before = first.prev(arena);
        let after = last.next(arena);
        before.set_next(arena, after);
        after.set_prev(arena, before);

        let prev = self.prev(arena);
        prev.set_next(arena, first);
        first.set_prev(arena, prev);
        last.set_next(arena, self);
        self.set_prev(arena, last);
    }

    /// Exchange `prev` and `next` of the current node.
    ///
    /// Applying this to every node of a ring, sentinel included, reverses
    /// the traversal order while keeping the ring closed.
    fn swap_links(self, arena: &mut Self::A) {
        let prev = self.prev(arena);
        let next = self.next(arena);
        self.set_prev(arena, next);
        self.set_next(arena, prev);
    }

    /// Iterate the ring starting after the current node.
    ///
    /// The current node, usually the sentinel, is not yielded.
    fn iter(self, arena: &Self::A) -> RingIter<'_, Self> {
        RingIter {
            arena,
            curr_front: self.next(arena),
            curr_back: self.prev(arena),
            finished: self.is_lonely(arena),
        }
    }
}

/// The iterator of a ring.
///
/// This iterator is a double-ended iterator, both directions visit the same
/// nodes in reverse order of each other.
///
/// # Lifetime
///
/// - `a`: The lifetime of the arena.
pub struct RingIter<'a, T: RingNodePtr> {
    arena: &'a T::A,
    /// The next node to be yielded from the front.
    curr_front: T,
    /// The next node to be yielded from the back.
    curr_back: T,
    /// Set once the front and back cursors have met.
    finished: bool,
}

impl<'a, T: RingNodePtr> Iterator for RingIter<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let curr = self.curr_front;
        if curr == self.curr_back {
            self.finished = true;
        } else {
            self.curr_front = curr.next(self.arena);
        }
        Some(curr)
    }
}

impl<'a, T: RingNodePtr> DoubleEndedIterator for RingIter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let curr = self.curr_back;
        if curr == self.curr_front {
            self.finished = true;
        } else {
            self.curr_back = curr.prev(self.arena);
        }
        Some(curr)
    }
}
