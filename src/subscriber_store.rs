use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use tokio::sync::Mutex;

use crate::domain::SubscriberEmail;

/// Append-only, line-oriented registry of subscriber addresses.
///
/// One normalized address per newline-terminated line, in insertion
/// order. Lines are never rewritten or removed; deduplication is the
/// intake's responsibility, not the store's.
pub struct SubscriberStore {
    path: PathBuf,
    // Serializes appends so two concurrent subscribe requests cannot
    // interleave their writes. Reads stay lock-free.
    write_lock: Mutex<()>,
}

impl SubscriberStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[tracing::instrument(name = "Checking store membership", skip(self))]
    pub fn is_subscribed(&self, email: &SubscriberEmail) -> Result<bool, std::io::Error> {
        Ok(self.all()?.iter().any(|stored| stored == email.as_ref()))
    }

    /// Ordered scan of every stored address. A store file that does not
    /// exist yet reads as an empty store.
    pub fn all(&self) -> Result<Vec<String>, std::io::Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.lines().map(String::from).collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Appends one address, creating the store file on first write. The
    /// line is visible to subsequent reads as soon as this returns.
    #[tracing::instrument(name = "Appending subscriber to the store", skip(self))]
    pub async fn append(&self, email: &SubscriberEmail) -> Result<(), std::io::Error> {
        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", email.as_ref())?;
        Ok(())
    }
}
