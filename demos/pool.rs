use std::io::Read;
use std::ptr::NonNull;

use mempool::MemPool;

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap`,
/// `htop`, or `gdb` between allocator operations.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Minimal stderr logger so the pool's debug events are visible.
/// Any `log` implementation works; without one the events are no-ops.
struct StderrLogger;

impl log::Log for StderrLogger {
  fn enabled(
    &self,
    _metadata: &log::Metadata,
  ) -> bool {
    true
  }

  fn log(
    &self,
    record: &log::Record,
  ) {
    eprintln!("{:5} {}", record.level(), record.args());
  }

  fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() {
  log::set_logger(&LOGGER).expect("no other logger installed");
  log::set_max_level(log::LevelFilter::Debug);

  // A deliberately small pool so exhaustion is easy to reach. The
  // first 128 bytes hold the genesis block; everything after that is
  // free space until we allocate.
  let mut pool = MemPool::with_capacity(1024);
  println!("Created a 1024 byte pool (128 bytes reserved for genesis)");
  block_until_enter_pressed();

  unsafe {
    // --------------------------------------------------------------------
    // 1) Allocate 8 bytes and use them as a u64.
    // --------------------------------------------------------------------
    let first = pool.alloc(8).unwrap();
    println!("\n[1] alloc(8) -> {:?}", first);

    // Payloads carry no alignment guarantee, so multi-byte values go
    // through unaligned accesses.
    let first_ptr = first.cast::<u64>().as_ptr();
    first_ptr.write_unaligned(0xDEAD_BEEF);
    println!(
      "[1] Value written through first = 0x{:X}",
      first_ptr.read_unaligned()
    );

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 2) Allocate 32 bytes and fill them with a byte pattern.
    //    The new block lands directly behind the first one.
    // --------------------------------------------------------------------
    let second = pool.alloc(32).unwrap();
    println!("\n[2] alloc(32) -> {:?}", second);
    println!(
      "[2] Distance from first payload = {} bytes (24 byte header + 8 byte payload)",
      second.as_ptr() as usize - first.as_ptr() as usize
    );

    std::ptr::write_bytes(second.as_ptr(), 0xAB, 32);
    println!("[2] Filled second block with 0xAB");

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 3) Free the first block. Its range becomes an unmarked gap
    //    between the genesis block and the second allocation.
    // --------------------------------------------------------------------
    pool.free(first);
    println!("\n[3] Freed the first block");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 4) Allocate 4 bytes. First-fit finds the gap left behind in
    //    step 3 before reaching the end of the chain.
    // --------------------------------------------------------------------
    let third = pool.alloc(4).unwrap();
    println!("\n[4] alloc(4) -> {:?}", third);
    println!(
      "[4] third == first? {}",
      if third == first {
        "Yes, the freed gap was reused"
      } else {
        "No, it was placed elsewhere"
      }
    );

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 5) Exhaust the pool. Once no gap and no tail space fits, alloc
    //    reports OutOfMemory instead of handing out memory past the
    //    arena.
    // --------------------------------------------------------------------
    println!("\n[5] Allocating 128 byte blocks until the pool runs out...");
    let mut held: Vec<NonNull<u8>> = Vec::new();
    loop {
      match pool.alloc(128) {
        Ok(ptr) => {
          println!("[5] alloc(128) -> {:?}", ptr);
          held.push(ptr);
        }
        Err(err) => {
          println!("[5] alloc(128) failed: {err}");
          break;
        }
      }
    }

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 6) Free everything we still hold and allocate once more to show
    //    the space is reclaimed.
    // --------------------------------------------------------------------
    for ptr in held.drain(..) {
      pool.free(ptr);
    }
    pool.free(second);
    pool.free(third);

    let big = pool.alloc(512).unwrap();
    println!("\n[6] After freeing everything, alloc(512) -> {:?}", big);

    // --------------------------------------------------------------------
    // 7) End of demo. Dropping the pool unmaps its arena.
    // --------------------------------------------------------------------
    println!("\n[7] End of demo. The pool unmaps its arena on drop.");
  }
}
