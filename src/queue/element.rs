use super::{Node, NodeData, NodeKind, Queue, QueueContext, QueueResult};
use crate::collections::{
    ring::RingNodePtr,
    storage::{ArenaAlloc, ArenaFree},
};

/// An element removed from a queue.
///
/// The caller owns it; dropping it (or calling [Element::release]) frees the
/// string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    value: String,
}

impl Element {
    pub fn value(&self) -> &str { &self.value }

    pub fn into_value(self) -> String { self.value }

    /// Release the element and its string.
    pub fn release(self) { drop(self) }
}

/// Duplicate a string without aborting on allocation failure.
fn duplicate(value: &str) -> QueueResult<String> {
    let mut copy = String::new();
    copy.try_reserve_exact(value.len())?;
    copy.push_str(value);
    Ok(copy)
}

/// Copy `value` into a C-style buffer.
///
/// At most `buf.len() - 1` bytes are copied and a NUL byte always follows
/// them. Nothing is written into an empty buffer.
fn copy_to_buffer(value: &str, buf: &mut [u8]) {
    let Some(capacity) = buf.len().checked_sub(1) else {
        return;
    };
    let len = value.len().min(capacity);
    buf[..len].copy_from_slice(&value.as_bytes()[..len]);
    buf[len] = 0;
}

impl Node {
    /// Unlink an element node and hand its string over as an [Element].
    pub(super) fn take(self, ctx: &mut QueueContext) -> Option<Element> {
        self.unlink(ctx);
        match ctx.free(self)?.kind {
            NodeKind::Element(value) => Some(Element { value }),
            NodeKind::Sentinel => unreachable!("a sentinel is never taken as an element"),
        }
    }

    /// Unlink and free an element node.
    pub(super) fn release(self, ctx: &mut QueueContext) {
        if let Some(element) = self.take(ctx) {
            element.release();
        }
    }
}

impl Queue {
    /// Insert a copy of `value` at the front.
    ///
    /// Nothing is linked if the copy or the node cannot be allocated.
    pub fn insert_head(self, ctx: &mut QueueContext, value: &str) -> QueueResult<()> {
        let sentinel = self.check(ctx)?;
        let node = Self::alloc_element(ctx, value)?;
        sentinel.insert_after(ctx, node);
        Ok(())
    }

    /// Insert a copy of `value` at the back.
    ///
    /// # See Also
    ///
    /// [insert_head](Queue::insert_head)
    pub fn insert_tail(self, ctx: &mut QueueContext, value: &str) -> QueueResult<()> {
        let sentinel = self.check(ctx)?;
        let node = Self::alloc_element(ctx, value)?;
        sentinel.insert_before(ctx, node);
        Ok(())
    }

    fn alloc_element(ctx: &mut QueueContext, value: &str) -> QueueResult<Node> {
        let value = duplicate(value)?;
        Ok(ctx.try_alloc_with(|this| NodeData::element(this, value))?)
    }

    /// Remove the front element.
    ///
    /// If `buf` is given, the element's string is copied into it as a
    /// NUL-terminated byte string, truncated to `buf.len() - 1` bytes.
    ///
    /// Returns `None` on an empty or absent queue.
    pub fn remove_head(self, ctx: &mut QueueContext, buf: Option<&mut [u8]>) -> Option<Element> {
        let sentinel = self.check(ctx).ok()?;
        if sentinel.is_lonely(ctx) {
            return None;
        }
        Self::remove(ctx, sentinel.next(ctx), buf)
    }

    /// Remove the back element.
    ///
    /// # See Also
    ///
    /// [remove_head](Queue::remove_head)
    pub fn remove_tail(self, ctx: &mut QueueContext, buf: Option<&mut [u8]>) -> Option<Element> {
        let sentinel = self.check(ctx).ok()?;
        if sentinel.is_lonely(ctx) {
            return None;
        }
        Self::remove(ctx, sentinel.prev(ctx), buf)
    }

    fn remove(ctx: &mut QueueContext, node: Node, buf: Option<&mut [u8]>) -> Option<Element> {
        let element = node.take(ctx)?;
        if let Some(buf) = buf {
            copy_to_buffer(element.value(), buf);
        }
        Some(element)
    }
}
