use std::ptr::{self, NonNull};

use libc::{MAP_ANONYMOUS, MAP_FAILED, MAP_PRIVATE, PROT_READ, PROT_WRITE, c_void};

use crate::die;

/// Fixed-capacity byte buffer backing a pool.
///
/// Mapped zero-initialized from the OS and unmapped on drop. Every
/// header the allocator places lives inside `[base, base + capacity)`;
/// the bounds queries here are what the chain-corruption check relies
/// on.
pub struct Arena {
  base: NonNull<u8>,
  capacity: usize,
}

impl Arena {
  /// Maps a zeroed anonymous region of `capacity` bytes. Terminates
  /// the process if the mapping fails; there is no fallback path for
  /// an allocator that cannot obtain its own backing memory.
  pub fn new(capacity: usize) -> Self {
    let addr = unsafe {
      libc::mmap(
        ptr::null_mut(),
        capacity,
        PROT_READ | PROT_WRITE,
        MAP_PRIVATE | MAP_ANONYMOUS,
        -1,
        0,
      )
    };

    if addr == MAP_FAILED {
      die!("Failed to map {capacity} byte arena");
    }

    Self {
      // MAP_FAILED is the only non-address mmap return, checked above.
      base: unsafe { NonNull::new_unchecked(addr.cast::<u8>()) },
      capacity,
    }
  }

  pub fn base(&self) -> NonNull<u8> {
    self.base
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Byte position of `addr` relative to the arena base. Negative or
  /// past-the-end values identify foreign addresses.
  pub fn position(&self, addr: *const u8) -> isize {
    addr as isize - self.base.as_ptr() as isize
  }

  /// Whether `addr` points at a byte inside the arena.
  pub fn contains(&self, addr: *const u8) -> bool {
    let pos = self.position(addr);
    pos >= 0 && (pos as usize) < self.capacity
  }
}

impl Drop for Arena {
  fn drop(&mut self) {
    unsafe {
      libc::munmap(self.base.as_ptr().cast::<c_void>(), self.capacity);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fresh_arena_is_zeroed() {
    let arena = Arena::new(4096);

    for i in (0..4096).step_by(512) {
      let byte = unsafe { arena.base().as_ptr().add(i).read() };
      assert_eq!(byte, 0);
    }
  }

  #[test]
  fn bounds_queries() {
    let arena = Arena::new(4096);
    let base = arena.base().as_ptr();

    unsafe {
      assert!(arena.contains(base));
      assert!(arena.contains(base.add(4095)));
      assert!(!arena.contains(base.add(4096)));
      assert!(!arena.contains(base.sub(1)));

      assert_eq!(arena.position(base), 0);
      assert_eq!(arena.position(base.add(128)), 128);
      assert_eq!(arena.position(base.sub(8)), -8);
    }
  }
}
