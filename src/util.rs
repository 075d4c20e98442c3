use std::fmt;
use std::process;

/// Writes the formatted message to stderr and terminates the process
/// with a failure status. Never returns.
///
/// Prefer the [`die!`](crate::die) macro, which accepts format
/// arguments directly.
pub fn die(args: fmt::Arguments<'_>) -> ! {
  eprintln!("{args}");
  process::exit(1);
}

/// Reports a fatal condition and terminates the process.
///
/// Used for conditions the allocator cannot recover from, such as a
/// corrupted block chain.
///
/// ```rust,ignore
/// use mempool::die;
///
/// die!("Corrupted address {:p}", ptr);
/// ```
#[macro_export]
macro_rules! die {
  ($($arg:tt)*) => {
    $crate::util::die(core::format_args!($($arg)*))
  };
}
