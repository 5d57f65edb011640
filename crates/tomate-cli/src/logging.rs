//! Log routing. Output goes to stderr, except while the full-screen timer
//! owns the terminal: then it is appended to a file so it cannot scribble
//! over the countdown.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "tomate.log";

static SCREEN_ACTIVE: AtomicBool = AtomicBool::new(false);
static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

/// Install the global subscriber. `RUST_LOG` overrides the default `warn`.
pub fn init(log_file: PathBuf) {
    let _ = LOG_FILE.set(log_file);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(make_writer)
        .with_target(false)
        .init();
}

/// Called by the terminal when it enters or leaves the alternate screen.
pub fn set_screen_active(active: bool) {
    SCREEN_ACTIVE.store(active, Ordering::SeqCst);
}

#[derive(Debug, PartialEq, Eq)]
enum Target<'a> {
    Stderr,
    File(&'a Path),
    Discard,
}

fn target(screen_active: bool, log_file: Option<&Path>) -> Target<'_> {
    match (screen_active, log_file) {
        (false, _) => Target::Stderr,
        (true, Some(path)) => Target::File(path),
        (true, None) => Target::Discard,
    }
}

fn open_log(path: &Path) -> io::Result<std::fs::File> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn make_writer() -> Box<dyn Write> {
    let log_file = LOG_FILE.get().map(PathBuf::as_path);
    match target(SCREEN_ACTIVE.load(Ordering::SeqCst), log_file) {
        Target::Stderr => Box::new(io::stderr()),
        Target::File(path) => match open_log(path) {
            Ok(file) => Box::new(file),
            Err(_) => Box::new(io::sink()),
        },
        Target::Discard => Box::new(io::sink()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_leave_stderr_while_the_screen_is_active() {
        let path = Path::new("/tmp/tomate.log");
        assert_eq!(target(false, Some(path)), Target::Stderr);
        assert_eq!(target(true, Some(path)), Target::File(path));
        assert_eq!(target(true, None), Target::Discard);
    }

    #[test]
    fn log_file_is_appended_and_its_directory_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(LOG_FILE_NAME);
        writeln!(open_log(&path).unwrap(), "first").unwrap();
        writeln!(open_log(&path).unwrap(), "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
