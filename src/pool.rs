use std::ptr::NonNull;

use crate::arena::Arena;
use crate::block::{Block, HEADER_SIZE};
use crate::die;
use crate::error::AllocError;

/// Default pool capacity: 64 MiB.
pub const POOL_SIZE: usize = 64 * 1024 * 1024;

/// Bytes permanently reserved at the head of the pool for the genesis
/// block. Offset 0 is therefore never a valid allocation.
const GENESIS_RESERVATION: usize = 128;

/// First-fit pool allocator over a single owned arena.
///
/// The only bookkeeping is the intrusive header chain threaded through
/// the arena itself: `alloc` walks it front to back looking for a gap
/// between consecutive blocks, `free` splices a header out. Both are
/// O(n) over live blocks.
///
/// Not thread safe. Both entry points take `&mut self`, so a pool can
/// only be driven from one place at a time; share one across threads
/// only behind an external lock.
pub struct MemPool {
  arena: Arena,
}

impl MemPool {
  /// Creates a pool with the default 64 MiB capacity.
  pub fn new() -> Self {
    Self::with_capacity(POOL_SIZE)
  }

  /// Creates a pool backed by a fresh `capacity`-byte arena and writes
  /// the genesis block at its base. The first 128 bytes belong to the
  /// genesis block and are never handed out.
  ///
  /// # Panics
  /// If `capacity` cannot hold the genesis reservation.
  pub fn with_capacity(capacity: usize) -> Self {
    assert!(
      capacity >= GENESIS_RESERVATION,
      "pool capacity must cover the {GENESIS_RESERVATION} byte genesis reservation"
    );

    let arena = Arena::new(capacity);
    let genesis = Block {
      prev: None,
      next: None,
      data_size: GENESIS_RESERVATION - HEADER_SIZE,
    };

    unsafe { Block::write(arena.base().cast(), genesis) };

    Self { arena }
  }

  /// Allocates `size` bytes and returns a pointer to the payload, one
  /// header past the block's start. A zero `size` is allowed and
  /// places an empty block whose payload must not be written through.
  ///
  /// Returns [`AllocError::OutOfMemory`] when no gap fits the request
  /// and appending after the last block would run past the arena; a
  /// `size` too large to even account for lands there as well.
  pub fn alloc(
    &mut self,
    size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    let before = self.block_before_space(size)?;

    unsafe {
      let new = Block::end(before);
      Block::write(new, Block { prev: None, next: None, data_size: size });
      Self::insert_block(new, before, Block::read(before).next);

      log::debug!(
        "[mempool] allocated {} bytes at {}",
        size,
        self.position(new) + HEADER_SIZE
      );

      Ok(Block::payload(new))
    }
  }

  /// Splices the block behind `payload` out of the chain. The freed
  /// byte range becomes implicit free space for later allocations;
  /// nothing is zeroed.
  ///
  /// # Safety
  /// `payload` must have been returned by [`MemPool::alloc`] on this
  /// pool and not freed since. Passing any other pointer, freeing
  /// twice, or touching the payload afterwards is undefined behavior;
  /// no validation is performed.
  pub unsafe fn free(
    &mut self,
    payload: NonNull<u8>,
  ) {
    unsafe {
      let block = Block::from_payload(payload);
      let Block { prev, next, data_size } = Block::read(block);

      if let Some(p) = prev {
        Block::set_next(p, next);
      }
      if let Some(n) = next {
        Block::set_prev(n, prev);
      }

      log::debug!(
        "[mempool] freed {} bytes at {}",
        data_size,
        self.position(block) + HEADER_SIZE
      );
    }
  }

  fn genesis(&self) -> NonNull<Block> {
    self.arena.base().cast()
  }

  fn position(
    &self,
    block: NonNull<Block>,
  ) -> usize {
    self.arena.position(block.as_ptr().cast()) as usize
  }

  /// First-fit search: returns the block after which a new header plus
  /// `size` payload bytes fit, walking the chain from the genesis
  /// block in address order.
  ///
  /// All size arithmetic is overflow-checked; a request too large to
  /// account for can never fit and is reported as `OutOfMemory`, not
  /// wrapped around into a bogus placement.
  ///
  /// A successor pointing outside the arena means the chain has been
  /// stomped; that is reported fatally, not returned.
  fn block_before_space(
    &self,
    size: usize,
  ) -> Result<NonNull<Block>, AllocError> {
    let out_of_memory = Err(AllocError::OutOfMemory { requested: size });

    let Some(needed) = HEADER_SIZE.checked_add(size) else {
      return out_of_memory;
    };

    let mut b = self.genesis();

    unsafe {
      loop {
        let header = Block::read(b);
        let end = self.position(b) + header.total_size();

        let Some(s) = header.next else {
          // Tail placement is checked against capacity. An
          // unconditional append here would silently overrun the pool.
          return match end.checked_add(needed) {
            Some(tail_end) if tail_end <= self.arena.capacity() => Ok(b),
            _ => out_of_memory,
          };
        };

        if !self.arena.contains(s.as_ptr().cast()) {
          die!("Corrupted address {:p}", s.as_ptr());
        }

        match end.checked_add(needed) {
          Some(candidate_end) if candidate_end < self.position(s) => return Ok(b),
          _ => {}
        }

        b = s;
      }
    }
  }

  /// Splices `x` between the adjacent nodes `a` and `b`.
  ///
  /// `b`'s back link must be refreshed here as well: `free`
  /// dereferences both neighbor links, so a `prev` left pointing at a
  /// freed block would let a later unlink write through reclaimed
  /// memory.
  unsafe fn insert_block(
    x: NonNull<Block>,
    a: NonNull<Block>,
    b: Option<NonNull<Block>>,
  ) {
    unsafe {
      Block::set_next(x, b);
      Self::join_blocks(a, x);
      if let Some(b) = b {
        Self::join_blocks(x, b);
      }
    }
  }

  unsafe fn join_blocks(
    a: NonNull<Block>,
    b: NonNull<Block>,
  ) {
    unsafe {
      Block::set_next(a, Some(b));
      Block::set_prev(b, Some(a));
    }
  }
}
