use std::fmt;

use super::Queue;
use crate::{
    collections::{
        ring::RingNodePtr,
        storage::{ArenaPtr, BaseArena, BaseArenaPtr},
    },
    impl_arena,
};

/// The context of the queues.
///
/// A context can be understood as the memory of every queue, element and
/// group created through it. Handles ([Queue], [Node], [GroupEntry]) are only
/// meaningful together with the context that produced them.
#[derive(Default)]
pub struct QueueContext {
    /// The storage of sentinels and elements.
    pub(super) nodes: BaseArena<NodeData>,
    /// The storage of group entries and group sentinels.
    pub(super) entries: BaseArena<EntryData>,
    /// The id handed to the next group entry.
    pub(super) next_entry_id: usize,
}

impl_arena!(QueueContext, NodeData, Node, nodes);
impl_arena!(QueueContext, EntryData, GroupEntry, entries);

impl QueueContext {
    pub fn new() -> Self { Self::default() }

    /// The number of live nodes, sentinels included.
    pub fn node_count(&self) -> usize { self.nodes.len() }

    /// Render the content of a queue as `[a, b, c]`.
    pub fn display(&self, queue: Queue) -> QueueDisplay<'_> { QueueDisplay { ctx: self, queue } }
}

/// What a node in the element arena holds.
pub enum NodeKind {
    /// The boundary marker of a queue.
    Sentinel,
    /// A queue element owning its string.
    Element(String),
}

pub struct NodeData {
    pub(super) prev: Node,
    pub(super) next: Node,
    pub(super) kind: NodeKind,
}

impl NodeData {
    pub(super) fn sentinel(this: Node) -> Self {
        Self {
            prev: this,
            next: this,
            kind: NodeKind::Sentinel,
        }
    }

    pub(super) fn element(this: Node, value: String) -> Self {
        Self {
            prev: this,
            next: this,
            kind: NodeKind::Element(value),
        }
    }

    pub fn kind(&self) -> &NodeKind { &self.kind }
}

/// A handle to a sentinel or an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node(BaseArenaPtr<NodeData>);

impl RingNodePtr for Node {
    fn next(self, ctx: &Self::A) -> Self { self.deref(ctx).next }

    fn prev(self, ctx: &Self::A) -> Self { self.deref(ctx).prev }

    fn set_next(self, ctx: &mut Self::A, next: Self) { self.deref_mut(ctx).next = next; }

    fn set_prev(self, ctx: &mut Self::A, prev: Self) { self.deref_mut(ctx).prev = prev; }
}

impl Node {
    pub fn is_sentinel(self, ctx: &QueueContext) -> bool {
        matches!(
            self.try_deref(ctx).map(NodeData::kind),
            Some(NodeKind::Sentinel)
        )
    }

    /// Get the string of an element node, `None` for sentinels and freed
    /// nodes.
    pub fn try_value(self, ctx: &QueueContext) -> Option<&str> {
        match self.try_deref(ctx)?.kind() {
            NodeKind::Element(value) => Some(value),
            NodeKind::Sentinel => None,
        }
    }

    /// Get the string of an element node.
    ///
    /// # Panics
    ///
    /// Panics if the node is a sentinel or has been freed.
    pub fn value(self, ctx: &QueueContext) -> &str {
        self.try_value(ctx)
            .expect("only element nodes carry a value")
    }
}

/// A member of a [Group](super::Group) ring.
///
/// The group sentinel is an entry with `queue == None`.
pub struct EntryData {
    pub(super) prev: GroupEntry,
    pub(super) next: GroupEntry,
    pub(super) queue: Option<Queue>,
    /// Cached element count, only trusted right after a refresh.
    pub(super) size: usize,
    pub(super) id: usize,
}

/// A handle to a group entry.
///
/// This is the per-queue context of the k-way merge, not to be confused with
/// [QueueContext], which owns the storage of everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupEntry(BaseArenaPtr<EntryData>);

impl RingNodePtr for GroupEntry {
    fn next(self, ctx: &Self::A) -> Self { self.deref(ctx).next }

    fn prev(self, ctx: &Self::A) -> Self { self.deref(ctx).prev }

    fn set_next(self, ctx: &mut Self::A, next: Self) { self.deref_mut(ctx).next = next; }

    fn set_prev(self, ctx: &mut Self::A, prev: Self) { self.deref_mut(ctx).prev = prev; }
}

impl GroupEntry {
    /// The queue wrapped by this entry.
    pub fn queue(self, ctx: &QueueContext) -> Option<Queue> { self.try_deref(ctx)?.queue }

    /// The cached size, as of the last merge or refresh.
    pub fn size(self, ctx: &QueueContext) -> usize { self.try_deref(ctx).map_or(0, |e| e.size) }

    pub fn id(self, ctx: &QueueContext) -> Option<usize> {
        let data = self.try_deref(ctx)?;
        data.queue.map(|_| data.id)
    }

    /// Recount the wrapped queue and store it as the cached size.
    pub fn refresh(self, ctx: &mut QueueContext) -> usize {
        let size = self.queue(ctx).map_or(0, |q| q.size(ctx));
        if let Some(data) = self.try_deref_mut(ctx) {
            data.size = size;
        }
        size
    }
}

pub struct QueueDisplay<'a> {
    ctx: &'a QueueContext,
    queue: Queue,
}

impl fmt::Display for QueueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.queue.is_valid(self.ctx) {
            return write!(f, "NULL");
        }
        write!(f, "[")?;
        for (i, value) in self.queue.iter(self.ctx).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}
