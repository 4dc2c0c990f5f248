//! Slot arena with free-list reuse

use alloc::vec::Vec;
use core::alloc::Layout;
use core::mem;
use core::ops::{Index, IndexMut};

/// Handle to an occupied arena slot.
///
/// A plain index: copying it grants no ownership, and it dangles (returns
/// `None` from [`Arena::get`]) once the slot is freed.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u32);

static_assertions::assert_eq_size!(SlotId, u32);

impl SlotId {
    /// Highest number of slots an arena may hold.
    pub const LIMIT: u32 = u32::MAX - 1;

    /// Position of the slot in the backing storage.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena allocation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    #[error("failed to reserve {requested_slots} arena slots")]
    Exhausted {
        requested_slots: usize,
        layout: Layout,
    },

    #[error("arena slot limit of {} reached", SlotId::LIMIT)]
    SlotLimit { layout: Layout },
}

impl AllocError {
    fn exhausted<T>(requested_slots: usize) -> Self {
        Self::Exhausted {
            requested_slots,
            layout: Layout::array::<Slot<T>>(requested_slots)
                .unwrap_or_else(|_| Layout::new::<Slot<T>>()),
        }
    }

    /// Layout of the request that could not be satisfied.
    pub fn layout(&self) -> Layout {
        match self {
            Self::Exhausted { layout, .. } | Self::SlotLimit { layout } => *layout,
        }
    }
}

/// Abort the process after an arena allocation failure.
///
/// Node allocation happens in the middle of a structural change, so there is
/// no state to roll back to. Delegates to the global allocation error handler,
/// which prints a diagnostic and aborts.
pub fn handle_exhaustion(err: &AllocError) -> ! {
    alloc::alloc::handle_alloc_error(err.layout())
}

enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<SlotId> },
}

/// Growable slot arena.
///
/// Freed slots are threaded onto an intrusive free list and handed out again
/// before the backing storage grows.
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<SlotId>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Create an empty arena without allocating.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    /// Create an arena with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
        let mut arena = Self::new();
        arena.reserve(capacity)?;
        Ok(arena)
    }

    /// Reserve room for at least `additional` more slots.
    pub fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.slots
            .try_reserve(additional)
            .map_err(|_| AllocError::exhausted::<T>(additional))
    }

    /// Move `value` into a slot and return its handle.
    pub fn alloc(&mut self, value: T) -> Result<SlotId, AllocError> {
        let id = match self.free_head {
            Some(id) => {
                match mem::replace(&mut self.slots[id.index()], Slot::Occupied(value)) {
                    Slot::Vacant { next_free } => self.free_head = next_free,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                }
                id
            }
            None => {
                if self.slots.len() >= SlotId::LIMIT as usize {
                    return Err(AllocError::SlotLimit {
                        layout: Layout::new::<Slot<T>>(),
                    });
                }
                if self.slots.len() == self.slots.capacity() {
                    self.reserve(1)?;
                }
                let id = SlotId(self.slots.len() as u32);
                self.slots.push(Slot::Occupied(value));
                id
            }
        };

        self.live += 1;
        Ok(id)
    }

    /// Release a slot, returning its value. `None` if the slot is not occupied.
    pub fn free(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.index())?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }

        match mem::replace(
            slot,
            Slot::Vacant {
                next_free: self.free_head,
            },
        ) {
            Slot::Occupied(value) => {
                self.free_head = Some(id);
                self.live -= 1;
                Some(value)
            }
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots the arena can hold without growing.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Drop every value and forget all slots, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.live = 0;
    }
}

impl<T> Index<SlotId> for Arena<T> {
    type Output = T;

    fn index(&self, id: SlotId) -> &T {
        match self.get(id) {
            Some(value) => value,
            None => panic!("use of vacant arena slot {}", id.0),
        }
    }
}

impl<T> IndexMut<SlotId> for Arena<T> {
    fn index_mut(&mut self, id: SlotId) -> &mut T {
        match self.get_mut(id) {
            Some(value) => value,
            None => panic!("use of vacant arena slot {}", id.0),
        }
    }
}
