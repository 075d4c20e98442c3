use std::mem;
use std::ptr::NonNull;

/// Intrusive block header, written directly into the arena in front of
/// every payload.
///
/// Headers form an address-ordered doubly linked chain anchored at the
/// genesis block. The bytes between one block's payload end and the
/// next header are implicit free space; nothing marks them.
///
/// Payloads have no alignment, so a header can start at any byte
/// offset. References to in-arena headers are never formed: every
/// field access goes through the unaligned raw accessors below, and a
/// `NonNull<Block>` is only ever an address.
///
/// `Option<NonNull<Block>>` uses the null niche, so the layout matches
/// a plain pointer field: two linkage words plus one size word.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct Block {
  pub prev: Option<NonNull<Block>>,
  pub next: Option<NonNull<Block>>,
  pub data_size: usize,
}

/// Bytes occupied by a header. All offset arithmetic goes through this.
pub const HEADER_SIZE: usize = mem::size_of::<Block>();

#[cfg(target_pointer_width = "64")]
const _: () = assert!(HEADER_SIZE == 24, "24 byte block header");

impl Block {
  /// Header plus the payload it owns.
  pub fn total_size(&self) -> usize {
    HEADER_SIZE + self.data_size
  }

  /// Copies the header out of the arena.
  ///
  /// # Safety
  /// `block` must point at a live header.
  pub unsafe fn read(block: NonNull<Block>) -> Block {
    unsafe { block.as_ptr().read_unaligned() }
  }

  /// Writes a whole header into the arena.
  ///
  /// # Safety
  /// `block` must point at `HEADER_SIZE` writable bytes.
  pub unsafe fn write(
    block: NonNull<Block>,
    header: Block,
  ) {
    unsafe { block.as_ptr().write_unaligned(header) }
  }

  /// Overwrites the forward link in place.
  ///
  /// # Safety
  /// `block` must point at a live header.
  pub unsafe fn set_next(
    block: NonNull<Block>,
    next: Option<NonNull<Block>>,
  ) {
    unsafe { (&raw mut (*block.as_ptr()).next).write_unaligned(next) }
  }

  /// Overwrites the back link in place.
  ///
  /// # Safety
  /// `block` must point at a live header.
  pub unsafe fn set_prev(
    block: NonNull<Block>,
    prev: Option<NonNull<Block>>,
  ) {
    unsafe { (&raw mut (*block.as_ptr()).prev).write_unaligned(prev) }
  }

  /// Address one past this block's extent: where the next header lands
  /// when a block is packed directly behind this one.
  ///
  /// # Safety
  /// `block` must point at a live header inside the arena.
  pub unsafe fn end(block: NonNull<Block>) -> NonNull<Block> {
    unsafe {
      let total = Self::read(block).total_size();
      NonNull::new_unchecked(block.cast::<u8>().as_ptr().add(total)).cast()
    }
  }

  /// Payload start: the byte immediately following the header.
  ///
  /// # Safety
  /// `block` must point at a live header inside the arena.
  pub unsafe fn payload(block: NonNull<Block>) -> NonNull<u8> {
    unsafe { NonNull::new_unchecked(block.cast::<u8>().as_ptr().add(HEADER_SIZE)) }
  }

  /// Steps back from a payload pointer to its header. Inverse of
  /// [`Block::payload`]; anything else is out of contract.
  ///
  /// # Safety
  /// `payload` must be a value produced by [`Block::payload`].
  pub unsafe fn from_payload(payload: NonNull<u8>) -> NonNull<Block> {
    unsafe { NonNull::new_unchecked(payload.as_ptr().sub(HEADER_SIZE)).cast() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn payload_addressing_round_trips() {
    let mut backing = [0u8; 64];
    // One past the array base, off the struct's natural alignment on
    // purpose: headers land wherever the previous payload ends.
    let start = unsafe { backing.as_mut_ptr().add(1) };
    let block = NonNull::new(start).unwrap().cast::<Block>();

    unsafe {
      Block::write(block, Block { prev: None, next: None, data_size: 16 });
      assert_eq!(Block::read(block).data_size, 16);

      let payload = Block::payload(block);
      assert_eq!(payload.as_ptr(), start.add(HEADER_SIZE));
      assert_eq!(Block::from_payload(payload), block);

      let end = Block::end(block).cast::<u8>();
      assert_eq!(end.as_ptr(), start.add(HEADER_SIZE + 16));
    }
  }

  #[test]
  fn link_updates_leave_the_rest_intact() {
    let mut backing = [0u8; 64];
    let start = unsafe { backing.as_mut_ptr().add(3) };
    let block = NonNull::new(start).unwrap().cast::<Block>();

    unsafe {
      Block::write(block, Block { prev: None, next: None, data_size: 8 });

      Block::set_next(block, Some(block));
      Block::set_prev(block, Some(block));

      let header = Block::read(block);
      assert_eq!(header.next, Some(block));
      assert_eq!(header.prev, Some(block));
      assert_eq!(header.data_size, 8);
    }
  }
}
