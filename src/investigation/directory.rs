use tracing::warn;

use crate::sdk::api::{decode, encode, BytesVec, SessionId, SessionResult};

/// Fixed namespace under which the directory persists itself.
pub const DIRECTORY_KEY: &str = "identicall/my-sessions";

/// Minimal persisted key-value surface: browser local storage, a file, an
/// in-memory map for tests. Writes are best-effort.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Option<BytesVec>;
    fn write(&mut self, key: &str, bytes: &[u8]);
}

/// Ordered set of session ids this device originated, for UI affordances
/// such as revealing raw registry data only to the originator. Strictly
/// advisory: never a source of truth for registry content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionDirectory {
    ids: Vec<SessionId>,
}

impl SessionDirectory {
    /// Read the persisted set. Corrupt or missing data degrades to an
    /// empty set, never a failure.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let bytes = match store.read(DIRECTORY_KEY) {
            Some(bytes) => bytes,
            None => return Self::default(),
        };
        match decode::<Vec<SessionId>>(&bytes) {
            Some(ids) => Self { ids },
            None => {
                warn!("corrupt session directory, starting empty");
                Self::default()
            }
        }
    }

    /// Append `session` (if new) and persist.
    pub fn record(
        &mut self,
        store: &mut impl KeyValueStore,
        session: &SessionId,
    ) -> SessionResult<()> {
        if !self.ids.contains(session) {
            self.ids.push(session.clone());
        }
        let bytes = encode(&self.ids)?;
        store.write(DIRECTORY_KEY, &bytes);
        Ok(())
    }

    pub fn originated_here(&self, session: &SessionId) -> bool {
        self.ids.contains(session)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionId> {
        self.ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore(HashMap<String, BytesVec>);

    impl KeyValueStore for MemoryStore {
        fn read(&self, key: &str) -> Option<BytesVec> {
            self.0.get(key).cloned()
        }
        fn write(&mut self, key: &str, bytes: &[u8]) {
            self.0.insert(key.to_string(), bytes.to_vec());
        }
    }

    #[test]
    fn record_then_reload() {
        let mut store = MemoryStore::default();
        let mut directory = SessionDirectory::load(&store);
        assert!(!directory.originated_here(&SessionId::new("abc")));

        directory
            .record(&mut store, &SessionId::new("abc"))
            .unwrap();
        directory
            .record(&mut store, &SessionId::new("def"))
            .unwrap();
        // recording twice keeps a single entry
        directory
            .record(&mut store, &SessionId::new("abc"))
            .unwrap();

        let reloaded = SessionDirectory::load(&store);
        assert_eq!(reloaded, directory);
        assert!(reloaded.originated_here(&SessionId::new("abc")));
        assert!(!reloaded.originated_here(&SessionId::new("xyz")));
        assert_eq!(reloaded.iter().count(), 2);
    }

    #[test]
    fn corrupt_data_degrades_to_empty() {
        let mut store = MemoryStore::default();
        store.write(DIRECTORY_KEY, b"definitely not an envelope");
        let directory = SessionDirectory::load(&store);
        assert_eq!(directory.iter().count(), 0);
    }
}
