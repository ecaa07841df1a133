//! Log setup. Lines go to stderr, except while the full-screen viewer owns
//! the terminal: then they are held back and replayed once it exits.

use std::io::{self, IsTerminal, Write};
use std::sync::{Mutex, PoisonError};
use tracing_subscriber::EnvFilter;

static BUFFER: Mutex<Option<Vec<u8>>> = Mutex::new(None);

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output and
/// the default only shows warnings.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "eval_ia=debug" } else { "eval_ia=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(|| BufferedStderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

/// Activate buffering. While active, log lines are stored instead of
/// being printed to stderr.
pub fn activate() {
    *BUFFER.lock().unwrap_or_else(PoisonError::into_inner) = Some(Vec::new());
}

/// Deactivate buffering and return all collected lines.
pub fn drain() -> Vec<String> {
    let bytes = BUFFER
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
        .unwrap_or_default();
    String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Deactivate buffering and print whatever was held back.
pub fn replay() {
    for line in drain() {
        eprintln!("{}", line);
    }
}

/// `io::Write` handle given to the subscriber for every event
pub struct BufferedStderr;

impl Write for BufferedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = BUFFER.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(held) = guard.as_mut() {
            held.extend_from_slice(buf);
            Ok(buf.len())
        } else {
            drop(guard);
            io::stderr().write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_holds_lines_until_drained() {
        activate();
        let mut writer = BufferedStderr;
        writer.write_all(b"first line\nsecond").unwrap();
        writer.write_all(b" line\n").unwrap();

        assert_eq!(drain(), vec!["first line", "second line"]);
        // Buffering is off again
        assert!(drain().is_empty());
    }
}
