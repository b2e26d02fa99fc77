//! Sled-backed persistence for per-player quest snapshots.
//!
//! The engine treats this as an opaque durable key-value store: one record
//! per player, keyed by UUID, rewritten in full after every state-changing
//! operation and read back lazily on first access.

use std::path::{Path, PathBuf};

use sled::IVec;
use uuid::Uuid;

use super::errors::QuestError;
use super::types::{PlayerQuestRecord, PLAYER_QUEST_SCHEMA_VERSION};

const TREE_PLAYERS: &str = "questcycle_players";
const PLAYERS_PREFIX: &str = "players:";

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct QuestStoreBuilder {
    path: PathBuf,
}

impl QuestStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<QuestStore, QuestError> {
        QuestStore::open(self.path)
    }
}

/// Sled-backed store for player quest snapshots.
pub struct QuestStore {
    _db: sled::Db,
    players: sled::Tree,
}

impl QuestStore {
    /// Open (or create) the quest store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, QuestError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let players = db.open_tree(TREE_PLAYERS)?;
        Ok(Self { _db: db, players })
    }

    fn player_key(player: &Uuid) -> Vec<u8> {
        format!("{}{}", PLAYERS_PREFIX, player).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, QuestError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, QuestError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    /// Insert or replace a player's full snapshot.
    pub fn put_player_record(
        &self,
        player: &Uuid,
        record: &PlayerQuestRecord,
    ) -> Result<(), QuestError> {
        let mut record = record.clone();
        record.schema_version = PLAYER_QUEST_SCHEMA_VERSION;
        let key = Self::player_key(player);
        let bytes = Self::serialize(&record)?;
        self.players.insert(key, bytes)?;
        self.players.flush()?;
        Ok(())
    }

    /// Fetch a player's snapshot.
    pub fn get_player_record(&self, player: &Uuid) -> Result<PlayerQuestRecord, QuestError> {
        let key = Self::player_key(player);
        let Some(bytes) = self.players.get(&key)? else {
            return Err(QuestError::NotFound(format!("player: {}", player)));
        };
        let record: PlayerQuestRecord = Self::deserialize(bytes)?;
        if record.schema_version != PLAYER_QUEST_SCHEMA_VERSION {
            return Err(QuestError::SchemaMismatch {
                entity: "player_quest_record",
                expected: PLAYER_QUEST_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// Remove a player's snapshot entirely.
    pub fn remove_player_record(&self, player: &Uuid) -> Result<(), QuestError> {
        let key = Self::player_key(player);
        self.players.remove(key)?;
        self.players.flush()?;
        Ok(())
    }

    /// List every player UUID with a stored snapshot. Keys that do not parse
    /// as UUIDs are skipped.
    pub fn list_player_ids(&self) -> Result<Vec<Uuid>, QuestError> {
        let mut ids = Vec::new();
        for entry in self.players.scan_prefix(PLAYERS_PREFIX.as_bytes()) {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(raw) = text.strip_prefix(PLAYERS_PREFIX) {
                if let Ok(id) = Uuid::parse_str(raw) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::period::Period;
    use crate::quest::types::QuestProgress;
    use tempfile::TempDir;

    #[test]
    fn store_round_trip_player_record() {
        let dir = TempDir::new().expect("tempdir");
        let store = QuestStoreBuilder::new(dir.path()).open().expect("store");

        let player = Uuid::new_v4();
        let mut record = PlayerQuestRecord::default();
        record
            .progress
            .insert(Period::Daily, QuestProgress::new("2024-100", 2));

        store.put_player_record(&player, &record).expect("put");
        let fetched = store.get_player_record(&player).expect("get");
        assert_eq!(fetched.progress, record.progress);
        assert_eq!(fetched.schema_version, PLAYER_QUEST_SCHEMA_VERSION);
    }

    #[test]
    fn missing_record_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let store = QuestStoreBuilder::new(dir.path()).open().expect("store");
        let err = store.get_player_record(&Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, QuestError::NotFound(_)));
    }

    #[test]
    fn list_and_remove_player_ids() {
        let dir = TempDir::new().expect("tempdir");
        let store = QuestStoreBuilder::new(dir.path()).open().expect("store");

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store
            .put_player_record(&a, &PlayerQuestRecord::default())
            .expect("put a");
        store
            .put_player_record(&b, &PlayerQuestRecord::default())
            .expect("put b");

        let mut ids = store.list_player_ids().expect("list");
        ids.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(ids, expected);

        store.remove_player_record(&a).expect("remove");
        assert_eq!(store.list_player_ids().expect("list").len(), 1);
    }

    #[test]
    fn snapshots_survive_reopen() {
        let dir = TempDir::new().expect("tempdir");
        let player = Uuid::new_v4();
        {
            let store = QuestStoreBuilder::new(dir.path()).open().expect("store");
            let mut record = PlayerQuestRecord::default();
            record
                .progress
                .insert(Period::Weekly, QuestProgress::new("2024-W10", 3));
            store.put_player_record(&player, &record).expect("put");
        }

        let store = QuestStoreBuilder::new(dir.path()).open().expect("reopen");
        let record = store.get_player_record(&player).expect("get");
        let progress = record.progress.get(&Period::Weekly).expect("weekly entry");
        assert_eq!(progress.seed, "2024-W10");
    }
}
