//! # mempool - A Fixed-Arena First-Fit Allocator
//!
//! This crate provides a **pool allocator**: a fixed-size arena of raw
//! bytes managed through an intrusive, address-ordered chain of block
//! headers threaded directly through the arena itself.
//!
//! ## Overview
//!
//! ```text
//!   Pool Layout:
//!
//!   ┌────────────────────────────────────────────────────────────────┐
//!   │                       ARENA (64 MiB)                           │
//!   │                                                                │
//!   │   ┌─────────┬────┬──────┬─────────┬────┬────────┬───────────┐  │
//!   │   │ genesis │hdr │ data │   gap   │hdr │  data  │   free    │  │
//!   │   └─────────┴────┴──────┴─────────┴────┴────────┴───────────┘  │
//!   │   0        128   ▲                      ▲                      │
//!   │                  │                      │                      │
//!   │              payload ptr            payload ptr                │
//!   │          (returned to caller)   (returned to caller)           │
//!   │                                                                │
//!   └────────────────────────────────────────────────────────────────┘
//!
//!   Headers link forward and backward in address order. The bytes
//!   between one block's payload end and the next header are free
//!   space; no structure marks them.
//! ```
//!
//! Allocation walks the chain front to back and claims the first gap
//! large enough for a header plus the requested payload (first fit),
//! falling back to appending after the last block. Freeing splices the
//! header back out; the range it covered becomes a gap again.
//!
//! ## Crate Structure
//!
//! ```text
//!   mempool
//!   ├── arena      - mmap-backed fixed-capacity buffer (internal)
//!   ├── block      - intrusive 24-byte header (internal)
//!   ├── pool       - MemPool: first-fit alloc/free over the chain
//!   ├── error      - AllocError
//!   └── util       - die!: fatal reporter
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use mempool::MemPool;
//!
//! let mut pool = MemPool::with_capacity(4096);
//!
//! let ptr = pool.alloc(8).unwrap();
//! unsafe {
//!   // Payloads are unaligned raw bytes; use unaligned accesses.
//!   ptr.cast::<u64>().as_ptr().write_unaligned(42);
//!   assert_eq!(ptr.cast::<u64>().as_ptr().read_unaligned(), 42);
//!
//!   pool.free(ptr);
//! }
//! ```
//!
//! ## Each Block
//!
//! ```text
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Block Header       │           Payload              │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ prev: ptr/none  │  │  ┌──────────────────────────┐  │
//!   │  │ next: ptr/none  │  │  │     data_size bytes      │  │
//!   │  │ data_size: N    │  │  │                          │  │
//!   │  └─────────────────┘  │  └──────────────────────────┘  │
//!   │      24 bytes         │                                │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Pointer returned to caller
//! ```
//!
//! ## Diagnostics
//!
//! Every allocation and free emits a `log::debug!` event with the size
//! and payload offset. With no logger installed these are no-ops; they
//! never affect allocator state. A detected chain corruption (a
//! successor pointer outside the arena) is fatal: it is reported to
//! stderr and the process exits with a failure status.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: both entry points take `&mut self`; no
//!   internal synchronization
//! - **No coalescing**: adjacent gaps merge only by virtue of address
//!   ordering, never explicitly
//! - **No misuse defense**: double frees, foreign pointers, and
//!   use-after-free are undefined behavior, not detected
//! - **Unix-only**: the arena is backed by anonymous `mmap` via `libc`
//!
//! ## Safety
//!
//! The payloads handed out are raw uninitialized memory; reading and
//! writing them, and every `free`, require `unsafe` blocks. Payloads
//! carry no alignment guarantee, and neither do the headers behind
//! them: all header access inside the crate goes through unaligned
//! reads and writes, and callers must do the same for any multi-byte
//! payload writes (`write_unaligned`, or byte-wise copies).

mod arena;
mod block;
mod error;
mod pool;
pub mod util;

pub use error::AllocError;
pub use pool::{MemPool, POOL_SIZE};
