use crate::structure::cache_change::CacheChange;

/// A handle into a `CachePool`'s arena: an index plus a generation counter.
/// Stable across insertions, invalidated by `release` (the generation bumps
/// so a stale handle cannot alias a later occupant of the same slot).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ChangeHandle {
  index: usize,
  generation: u32,
}

enum Slot {
  Occupied(CacheChange),
  Free,
}

/// Preallocated pool of `CacheChange` records; `reserve`/`release` avoid a
/// per-change heap allocation on the hot path. Grows up to `max_size`.
pub struct CachePool {
  slots: Vec<Slot>,
  generations: Vec<u32>,
  free_list: Vec<usize>,
  max_size: usize,
}

impl CachePool {
  pub fn new(max_size: usize) -> CachePool {
    CachePool {
      slots: Vec::new(),
      generations: Vec::new(),
      free_list: Vec::new(),
      max_size,
    }
  }

  /// Hands out a slot for `change`, growing the pool if it has not yet hit
  /// `max_size`. Returns `None` when the pool is exhausted.
  pub fn reserve(&mut self, change: CacheChange) -> Option<ChangeHandle> {
    if let Some(index) = self.free_list.pop() {
      self.slots[index] = Slot::Occupied(change);
      return Some(ChangeHandle {
        index,
        generation: self.generations[index],
      });
    }
    if self.slots.len() >= self.max_size {
      return None;
    }
    let index = self.slots.len();
    self.slots.push(Slot::Occupied(change));
    self.generations.push(0);
    Some(ChangeHandle { index, generation: 0 })
  }

  pub fn get(&self, handle: ChangeHandle) -> Option<&CacheChange> {
    if self.generations.get(handle.index).copied() != Some(handle.generation) {
      return None;
    }
    match self.slots.get(handle.index) {
      Some(Slot::Occupied(change)) => Some(change),
      _ => None,
    }
  }

  /// Returns the record to the free list. `handle` is invalid afterwards;
  /// using it again is a programmer error and simply returns `None`.
  pub fn release(&mut self, handle: ChangeHandle) {
    if self.generations.get(handle.index).copied() != Some(handle.generation) {
      return;
    }
    self.slots[handle.index] = Slot::Free;
    self.generations[handle.index] = self.generations[handle.index].wrapping_add(1);
    self.free_list.push(handle.index);
  }

  pub fn len(&self) -> usize {
    self.slots.len() - self.free_list.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
