//! Storage utilities.
//!
//! This module provides [BaseArena] for managing the nodes of the circular
//! lists. Every node lives in an arena slot, and links between nodes are
//! plain handles ([BaseArenaPtr]) instead of raw pointers.
//!
//! A freed handle never dereferences to a stale value. Every slot carries a
//! generation that is bumped when the slot is freed, and a handle remembers
//! the generation it was allocated with. [ArenaDeref::try_deref] returns
//! `None` once the two differ, even after the slot has been reused. This is
//! how the queue layer recognizes an absent container handle.
//!
//! - [ArenaPtr]: The trait for the pointer in the arena.
//! - [ArenaDeref]: The trait for dereferencing the arena pointer.
//! - [ArenaAlloc]: The trait for (fallibly) allocating values in the arena.
//! - [ArenaFree]: The trait for freeing values in the arena.
//!
//! The traits above can be used to wrap several arenas in one high-level
//! container, e.g., the [QueueContext](crate::queue::QueueContext).
//!
//! # Examples
//!
//! ```rust
//! use ringq::collections::storage::*;
//!
//! #[derive(Debug, PartialEq, Eq)]
//! struct Link {
//!     value: i32,
//!     // Self-referential struct
//!     this: BaseArenaPtr<Link>,
//! }
//!
//! let mut arena = BaseArena::default();
//!
//! let ptr1 = arena.try_alloc_with(|this| Link { value: 1, this }).unwrap();
//! let ptr2 = arena.try_alloc_with(|this| Link { value: 2, this }).unwrap();
//! assert_ne!(ptr1, ptr2);
//! assert_eq!(arena.try_deref(ptr1).unwrap().this, ptr1);
//!
//! // Freeing hands the value back, and the handle becomes absent.
//! assert_eq!(arena.free(ptr1).map(|link| link.value), Some(1));
//! assert!(arena.try_deref(ptr1).is_none());
//! assert!(arena.free(ptr1).is_none());
//!
//! // The vacant slot is reused, but the old handle stays dead.
//! let ptr3 = arena.try_alloc(Link { value: 3, this: ptr1 }).unwrap();
//! assert_eq!(ptr1.id(), ptr3.id());
//! assert_ne!(ptr1, ptr3);
//! assert!(arena.try_deref(ptr1).is_none());
//! ```

use std::{
    collections::{TryReserveError, VecDeque},
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

/// Indicates that the type can be used to dereference an arena pointer.
pub trait ArenaDeref<T, Ptr>
where
    Ptr: ArenaPtr<T = T, A = Self>,
{
    /// Try to dereference a pointer and get a value in the arena.
    ///
    /// # Returns
    ///
    /// - `Some(&T)` if the pointer is in bounds and the slot is occupied.
    /// - `None` if the pointer is out of bounds or the slot is vacant.
    fn try_deref(&self, ptr: Ptr) -> Option<&T>;

    /// Try to dereference a pointer and get a mutable value in the arena.
    ///
    /// # See Also
    ///
    /// - [ArenaDeref::try_deref]
    fn try_deref_mut(&mut self, ptr: Ptr) -> Option<&mut T>;
}

/// Indicates that the type can be used to allocate values in the arena.
///
/// Allocation is fallible: the arena reports a [TryReserveError] instead of
/// aborting, so callers can give up before touching any link.
pub trait ArenaAlloc<T, Ptr>: ArenaDeref<T, Ptr>
where
    Ptr: ArenaPtr<T = T, A = Self>,
{
    /// Allocate a value with a closure accepting the index.
    ///
    /// This will first reserve the pointer, pass it to the closure, and then
    /// store the closure's return value in the arena. The closure is not
    /// called if the reservation fails.
    ///
    /// This allocation is useful when the value needs to reference itself,
    /// e.g., a fresh ring node linked to itself.
    ///
    /// # Parameters
    ///
    /// - `f`: The closure that accepts the pointer and returns the value.
    ///
    /// # Returns
    ///
    /// The arena pointer to the value, or the reservation error.
    fn try_alloc_with<F>(&mut self, f: F) -> Result<Ptr, TryReserveError>
    where
        F: FnOnce(Ptr) -> T;

    /// Allocate a value in the arena.
    ///
    /// # See Also
    ///
    /// - [ArenaAlloc::try_alloc_with]
    fn try_alloc(&mut self, val: T) -> Result<Ptr, TryReserveError> { self.try_alloc_with(|_| val) }
}

/// Indicates that the type can be used to free values in the arena.
pub trait ArenaFree<T, Ptr>: ArenaAlloc<T, Ptr>
where
    Ptr: ArenaPtr<T = T, A = Self>,
{
    /// Free a value in the arena, handing it back to the caller.
    ///
    /// # Returns
    ///
    /// The value that was stored, or `None` if the slot was already vacant
    /// or out of bounds. Freeing twice is therefore harmless.
    fn free(&mut self, ptr: Ptr) -> Option<T>;
}

/// The pointer-like trait that can be used to deref and get the value from the
/// corresponding [ArenaDeref] type.
pub trait ArenaPtr: Copy + Sized + Eq {
    /// The type of dereferenced value.
    type T;

    /// The type of the corresponding arena.
    type A: ArenaDeref<Self::T, Self>;

    /// Try to dereference the pointer.
    fn try_deref(self, arena: &Self::A) -> Option<&Self::T>;

    /// Try to dereference the pointer mutably.
    fn try_deref_mut(self, arena: &mut Self::A) -> Option<&mut Self::T>;

    /// Dereference the pointer.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is vacant or out of bounds.
    fn deref(self, arena: &Self::A) -> &Self::T {
        self.try_deref(arena).expect("the arena pointer is invalid")
    }

    /// Dereference the pointer mutably.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is vacant or out of bounds.
    fn deref_mut(self, arena: &mut Self::A) -> &mut Self::T {
        self.try_deref_mut(arena)
            .expect("the arena pointer is invalid")
    }
}

/// [BaseArenaPtr] is a pointer to an object in the [BaseArena].
///
/// This can be understood as a handle, one can dereference it to get the
/// reference (in the form of `&T`) to the object in the arena.
///
/// Two handles are equal only if they point at the same slot in the same
/// generation.
pub struct BaseArenaPtr<T> {
    id: usize,
    generation: u64,
    _marker: PhantomData<T>,
}

impl<T> fmt::Debug for BaseArenaPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BaseArenaPtr({}v{})", self.id, self.generation)
    }
}

impl<T> PartialEq for BaseArenaPtr<T> {
    fn eq(&self, other: &Self) -> bool { self.id == other.id && self.generation == other.generation }
}

impl<T> Eq for BaseArenaPtr<T> {}

impl<T> Hash for BaseArenaPtr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.generation.hash(state);
    }
}

#[allow(clippy::non_canonical_clone_impl)]
impl<T> Clone for BaseArenaPtr<T> {
    fn clone(&self) -> Self {
        // `Clone` will not be implemented for `T` when `T` is not `Clone`-able.
        BaseArenaPtr {
            id: self.id,
            generation: self.generation,
            _marker: PhantomData,
        }
    }
}

impl<T> Copy for BaseArenaPtr<T> {}

impl<T> BaseArenaPtr<T> {
    fn new(id: usize, generation: u64) -> Self {
        BaseArenaPtr {
            id,
            generation,
            _marker: PhantomData,
        }
    }

    /// Get the inner index.
    pub fn id(self) -> usize { self.id }

    /// Get the generation of the slot this handle was allocated in.
    pub fn generation(self) -> u64 { self.generation }
}

impl<T> ArenaPtr for BaseArenaPtr<T> {
    type A = BaseArena<T>;
    type T = T;

    fn try_deref(self, arena: &BaseArena<T>) -> Option<&T> { arena.try_deref(self) }

    fn try_deref_mut(self, arena: &mut BaseArena<T>) -> Option<&mut T> { arena.try_deref_mut(self) }
}

/// The entry kind in [BaseArena].
pub enum BaseArenaEntry<T> {
    /// The slot is vacant.
    ///
    /// The vacant slot will occur when an entry is freed.
    Vacant,
    /// The slot is occupied.
    Occupied(T),
}

/// A slot of [BaseArena].
struct Slot<T> {
    /// Bumped every time the slot is freed.
    generation: u64,
    entry: BaseArenaEntry<T>,
}

/// A simple arena implemented with a vector and a free list.
pub struct BaseArena<T> {
    /// The pool of slots.
    pool: Vec<Slot<T>>,

    /// The free list.
    ///
    /// Freed indices are pushed to the back and popped from the front when
    /// allocating new entries.
    free: VecDeque<usize>,
}

impl<T> Default for BaseArena<T> {
    fn default() -> Self {
        BaseArena {
            pool: Vec::new(),
            free: VecDeque::new(),
        }
    }
}

impl<T> ArenaAlloc<T, BaseArenaPtr<T>> for BaseArena<T> {
    fn try_alloc_with<F>(&mut self, f: F) -> Result<BaseArenaPtr<T>, TryReserveError>
    where
        F: FnOnce(BaseArenaPtr<T>) -> T,
    {
        let index = if let Some(index) = self.free.pop_front() {
            index
        } else {
            self.pool.try_reserve(1)?;
            let index = self.pool.len();
            self.pool.push(Slot {
                generation: 0,
                entry: BaseArenaEntry::Vacant,
            });
            index
        };
        let slot = &mut self.pool[index];
        let ptr = BaseArenaPtr::new(index, slot.generation);
        slot.entry = BaseArenaEntry::Occupied(f(ptr));
        Ok(ptr)
    }
}

impl<T> ArenaFree<T, BaseArenaPtr<T>> for BaseArena<T> {
    fn free(&mut self, ptr: BaseArenaPtr<T>) -> Option<T> {
        let slot = self
            .pool
            .get_mut(ptr.id())
            .filter(|slot| slot.generation == ptr.generation)?;
        match std::mem::replace(&mut slot.entry, BaseArenaEntry::Vacant) {
            BaseArenaEntry::Vacant => None,
            BaseArenaEntry::Occupied(val) => {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push_back(ptr.id());
                Some(val)
            }
        }
    }
}

impl<T> ArenaDeref<T, BaseArenaPtr<T>> for BaseArena<T> {
    fn try_deref(&self, ptr: BaseArenaPtr<T>) -> Option<&T> {
        let slot = self.pool.get(ptr.id())?;
        match &slot.entry {
            BaseArenaEntry::Occupied(val) if slot.generation == ptr.generation => Some(val),
            BaseArenaEntry::Occupied(_) | BaseArenaEntry::Vacant => None,
        }
    }

    fn try_deref_mut(&mut self, ptr: BaseArenaPtr<T>) -> Option<&mut T> {
        let slot = self.pool.get_mut(ptr.id())?;
        match &mut slot.entry {
            BaseArenaEntry::Occupied(val) if slot.generation == ptr.generation => Some(val),
            BaseArenaEntry::Occupied(_) | BaseArenaEntry::Vacant => None,
        }
    }
}

impl<T> BaseArena<T> {
    /// Make sure the next `additional` allocations cannot fail.
    ///
    /// Vacant slots count towards `additional`, so only the remainder is
    /// reserved in the pool.
    ///
    /// # See Also
    ///
    /// - [Vec::try_reserve]
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let vacant = self.free.len();
        if additional > vacant {
            self.pool.try_reserve(additional - vacant)?;
        }
        Ok(())
    }

    /// The number of occupied slots.
    pub fn len(&self) -> usize { self.pool.len() - self.free.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Iterate over the occupied slots.
    ///
    /// # Returns
    ///
    /// An iterator that yields the arena pointer and the value.
    pub fn iter(&self) -> impl Iterator<Item = (BaseArenaPtr<T>, &T)> {
        self.pool
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match &slot.entry {
                BaseArenaEntry::Vacant => None,
                BaseArenaEntry::Occupied(val) => Some((BaseArenaPtr::new(index, slot.generation), val)),
            })
    }
}

/// Implement the arena trait for a given type.
///
/// The pointer type must be a single-field tuple struct wrapping a
/// [BaseArenaPtr], and `$field` names the [BaseArena] inside `$arena`.
#[macro_export]
macro_rules! impl_arena {
    ($arena:ty, $value:ty, $ptr:path, $field:ident) => {
        impl $crate::collections::storage::ArenaPtr for $ptr {
            type A = $arena;
            type T = $value;

            fn try_deref(self, arena: &Self::A) -> Option<&Self::T> {
                $crate::collections::storage::ArenaDeref::try_deref(arena, self)
            }

            fn try_deref_mut(self, arena: &mut Self::A) -> Option<&mut Self::T> {
                $crate::collections::storage::ArenaDeref::try_deref_mut(arena, self)
            }
        }

        impl $crate::collections::storage::ArenaAlloc<$value, $ptr> for $arena {
            fn try_alloc_with<F>(&mut self, f: F) -> Result<$ptr, ::std::collections::TryReserveError>
            where
                F: FnOnce($ptr) -> $value,
            {
                $crate::collections::storage::ArenaAlloc::try_alloc_with(&mut self.$field, |ptr| {
                    f($ptr(ptr))
                })
                .map($ptr)
            }
        }

        impl $crate::collections::storage::ArenaDeref<$value, $ptr> for $arena {
            fn try_deref(&self, ptr: $ptr) -> Option<&$value> {
                $crate::collections::storage::ArenaDeref::try_deref(&self.$field, ptr.0)
            }

            fn try_deref_mut(&mut self, ptr: $ptr) -> Option<&mut $value> {
                $crate::collections::storage::ArenaDeref::try_deref_mut(&mut self.$field, ptr.0)
            }
        }

        impl $crate::collections::storage::ArenaFree<$value, $ptr> for $arena {
            fn free(&mut self, ptr: $ptr) -> Option<$value> {
                $crate::collections::storage::ArenaFree::free(&mut self.$field, ptr.0)
            }
        }
    };
}
