use crate::{StateError, WorkingArea};
use cliquenet_primitives::NetworkTopology;
use std::path::PathBuf;
use tracing::debug;

/// Persists the [`NetworkTopology`] of a network so it can be restarted later.
///
/// Only the node counts are stored; block time and password are part of the genesis and the
/// password file.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Creates the store of the given working area.
    pub fn new(area: &WorkingArea) -> Self {
        Self { path: area.state_path() }
    }

    /// Writes the topology, replacing any previous one.
    pub fn save(&self, topology: &NetworkTopology) -> Result<(), StateError> {
        cliquenet_fs_util::write_json_file(&self.path, topology)?;
        debug!(target: "cliquenet::orchestrator", path = ?self.path, ?topology, "Saved network state");
        Ok(())
    }

    /// Reads the topology.
    ///
    /// Fails with [`StateError::NotFound`] if the network was never created and with
    /// [`StateError::Malformed`] if the file does not describe a valid topology.
    pub fn load(&self) -> Result<NetworkTopology, StateError> {
        let contents = match cliquenet_fs_util::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.is_not_found() => return Err(StateError::NotFound(self.path.clone())),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&contents)
            .map_err(|source| StateError::Malformed { path: self.path.clone(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn area() -> (tempfile::TempDir, WorkingArea) {
        let dir = tempfile::tempdir().unwrap();
        let area = WorkingArea::new(dir.path());
        (dir, area)
    }

    #[test]
    fn save_then_load() {
        let (_dir, area) = area();
        let store = StateStore::new(&area);
        let topology = NetworkTopology::new(2, 1).unwrap();

        store.save(&topology).unwrap();
        assert_eq!(
            std::fs::read_to_string(area.state_path()).unwrap(),
            r#"{"authorities":2,"peers":1}"#
        );
        assert_eq!(store.load().unwrap(), topology);
    }

    #[test]
    fn save_overwrites() {
        let (_dir, area) = area();
        let store = StateStore::new(&area);
        store.save(&NetworkTopology::new(4, 4).unwrap()).unwrap();
        store.save(&NetworkTopology::new(1, 0).unwrap()).unwrap();
        assert_eq!(store.load().unwrap(), NetworkTopology::new(1, 0).unwrap());
    }

    #[test]
    fn load_without_save_fails() {
        let (_dir, area) = area();
        let err = StateStore::new(&area).load().unwrap_err();
        assert_matches!(err, StateError::NotFound(_));
        assert!(err.is_not_found());
    }

    #[test]
    fn load_rejects_malformed_state() {
        let (_dir, area) = area();
        let store = StateStore::new(&area);

        for contents in ["", "{\"authorities\":2}", "{\"authorities\":0,\"peers\":3}", "[]"] {
            std::fs::write(area.state_path(), contents).unwrap();
            let err = store.load().unwrap_err();
            assert_matches!(err, StateError::Malformed { .. });
            assert!(err.is_not_found());
        }
    }
}
