use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use eyre::Result;
use rusqlite::{Connection, OptionalExtension, params};

use crate::config::get_app_data_prefix;

/// Durable key-value storage surviving across sessions.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Storage key for the language preference of `product`.
pub fn language_key(product: &str) -> String {
    format!("{product}Language")
}

/// SQLite-backed preference store.
pub struct State {
    conn: Connection,
}

impl State {
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        Self::open(&prefix.join("states.db"))
    }

    pub fn open(filepath: &Path) -> Result<Self> {
        if let Some(parent) = filepath.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(filepath)?;
        Self::init_db(&conn)?;
        Ok(Self { conn })
    }

    fn init_db(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME
            );
            ",
        )?;
        Ok(())
    }

    pub fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key=?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value, updated_at) VALUES (?, ?, ?)",
            params![key, value, Utc::now()],
        )?;
        Ok(())
    }

    pub fn delete_preference(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM preferences WHERE key=?", params![key])?;
        Ok(())
    }

    /// When `key` was last written.
    pub fn stored_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let stored = self
            .conn
            .query_row(
                "SELECT updated_at FROM preferences WHERE key=?",
                params![key],
                |row| row.get::<_, Option<DateTime<Utc>>>(0),
            )
            .optional()?;
        Ok(stored.flatten())
    }
}

impl PreferenceStore for State {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.get_preference(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_preference(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.delete_preference(key)
    }
}

/// Store that forgets everything when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_state() -> (State, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let state = State::open(&temp_dir.path().join("test_states.db")).unwrap();
        (state, temp_dir)
    }

    #[test]
    fn test_language_key() {
        assert_eq!(language_key("voxSacra"), "voxSacraLanguage");
    }

    #[test]
    fn test_state_database_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("test_init.db");
        assert!(!db_path.exists());
        State::open(&db_path).unwrap();
        assert!(db_path.exists());

        let conn = Connection::open(&db_path).unwrap();
        let mut stmt = conn.prepare("PRAGMA table_info(preferences)").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(1))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(columns, vec!["key", "value", "updated_at"]);
    }

    #[test]
    fn test_missing_preference() {
        let (state, _temp_dir) = setup_test_state();
        assert_eq!(state.get_preference("voxSacraLanguage").unwrap(), None);
        assert_eq!(state.stored_at("voxSacraLanguage").unwrap(), None);
    }

    #[test]
    fn test_preference_replace_and_delete() {
        let (mut state, _temp_dir) = setup_test_state();
        state.save("voxSacraLanguage", "en").unwrap();
        state.save("voxSacraLanguage", "ko").unwrap();
        assert_eq!(state.load("voxSacraLanguage").unwrap().as_deref(), Some("ko"));
        assert!(state.stored_at("voxSacraLanguage").unwrap().is_some());

        state.remove("voxSacraLanguage").unwrap();
        assert_eq!(state.load("voxSacraLanguage").unwrap(), None);
        assert!(state.remove("voxSacraLanguage").is_ok());
    }

    #[test]
    fn test_preference_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("states.db");
        {
            let mut state = State::open(&path).unwrap();
            state.save("voxSacraLanguage", "ko").unwrap();
        }
        let state = State::open(&path).unwrap();
        assert_eq!(state.load("voxSacraLanguage").unwrap().as_deref(), Some("ko"));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::with_value("k", "v");
        assert_eq!(store.load("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.load("k").unwrap(), None);
    }
}
