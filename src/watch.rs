//! Live re-validation of a file, the terminal stand-in for typing into the
//! input box. Every change is fed through the session's quiet period.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::debounce::Clock;
use crate::session::Session;

pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct FileWatcher {
    path: PathBuf,
    last: Option<String>,
}

impl FileWatcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last: None,
        }
    }

    /// Returns the file's content if it differs from the last poll. A file
    /// that is briefly missing (editors replacing it on save) is no change.
    pub fn poll(&mut self) -> io::Result<Option<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "watched file missing");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        if self.last.as_deref() == Some(content.as_str()) {
            return Ok(None);
        }
        self.last = Some(content.clone());
        Ok(Some(content))
    }
}

/// One iteration of the watch loop: feed a change into the session, then
/// let the quiet period elapse. Returns whether a pass ran.
pub fn step<C: Clock>(watcher: &mut FileWatcher, session: &mut Session<C>) -> io::Result<bool> {
    if let Some(content) = watcher.poll()? {
        debug!(bytes = content.len(), "watched file changed");
        session.edit(content);
    }
    Ok(session.tick())
}

/// Polls forever, calling `on_pass` after each validate/format pass.
pub fn run<C, F>(mut watcher: FileWatcher, session: &mut Session<C>, mut on_pass: F) -> io::Result<()>
where
    C: Clock,
    F: FnMut(&mut Session<C>) -> io::Result<()>,
{
    loop {
        if step(&mut watcher, session)? {
            on_pass(session)?;
        }
        thread::sleep(POLL_INTERVAL);
    }
}
