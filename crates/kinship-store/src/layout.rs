//! Paths of every persisted artifact.

use std::path::{Path, PathBuf};

use kinship_types::IdentityKey;

use crate::adjacency::AdjacencyFile;
use crate::events::EventLogFile;
use crate::profiles::ProfileFile;

/// File holding registration records.
pub const USERS_FILE: &str = "users.txt";

/// File holding the friendship adjacency snapshot.
pub const FRIENDS_FILE: &str = "friends.txt";

/// Prefix of per-identity life-event files.
pub const EVENT_FILE_PREFIX: &str = "life_events_";

/// Extension of per-identity life-event files.
pub const EVENT_FILE_SUFFIX: &str = ".txt";

/// Resolves artifact paths under a single data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    /// Create a layout rooted at `root`. Nothing is touched on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Registration records.
    pub fn profiles(&self) -> ProfileFile {
        ProfileFile::new(self.root.join(USERS_FILE))
    }

    /// Friendship adjacency snapshot.
    pub fn adjacency(&self) -> AdjacencyFile {
        AdjacencyFile::new(self.root.join(FRIENDS_FILE))
    }

    /// Life-event log of `key`, named `life_events_<key>.txt`.
    pub fn event_log(&self, key: &IdentityKey) -> EventLogFile {
        EventLogFile::new(
            self.root
                .join(format!("{EVENT_FILE_PREFIX}{key}{EVENT_FILE_SUFFIX}")),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn event_log_name_is_derived_from_key() {
        let layout = DataLayout::new("/var/kinship");
        let key = IdentityKey::parse("alice@example.com").unwrap();
        assert_eq!(
            layout.event_log(&key).path(),
            Path::new("/var/kinship/life_events_alice@example.com.txt")
        );
        assert_eq!(layout.adjacency().path(), Path::new("/var/kinship/friends.txt"));
        assert_eq!(layout.profiles().path(), Path::new("/var/kinship/users.txt"));
    }
}
