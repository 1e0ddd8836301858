//! SQLite-backed [`WeatherStore`] using rusqlite.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, params};
use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use crate::{StorageError, WeatherRecord, WeatherSnapshot};

use super::WeatherStore;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS weather_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    external_last_update TEXT NOT NULL,
    temp_c INTEGER NOT NULL,
    temp_f INTEGER NOT NULL,
    is_day INTEGER NOT NULL,
    cloud INTEGER NOT NULL,
    condition_text TEXT NOT NULL,
    condition_code INTEGER NOT NULL,
    humidity INTEGER NOT NULL,
    wind_k INTEGER NOT NULL,
    wind_m INTEGER NOT NULL,
    created_at TEXT NOT NULL
);
";

#[derive(Debug, Clone)]
pub struct SqliteWeatherStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteWeatherStore {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        Self::initialize(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }
}

fn insert(conn: &Connection, snapshot: WeatherSnapshot) -> Result<WeatherRecord, StorageError> {
    let created_at = Utc::now();

    conn.execute(
        "INSERT INTO weather_records (
            external_last_update, temp_c, temp_f, is_day, cloud,
            condition_text, condition_code, humidity, wind_k, wind_m, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            snapshot.external_last_update.to_rfc3339(),
            snapshot.temp_c,
            snapshot.temp_f,
            snapshot.is_day,
            snapshot.cloud,
            snapshot.condition_text,
            snapshot.condition_code,
            snapshot.humidity,
            snapshot.wind_k,
            snapshot.wind_m,
            created_at.to_rfc3339(),
        ],
    )?;

    Ok(WeatherRecord { id: conn.last_insert_rowid(), created_at, snapshot })
}

#[async_trait]
impl WeatherStore for SqliteWeatherStore {
    async fn create(&self, snapshot: WeatherSnapshot) -> Result<WeatherRecord, StorageError> {
        let conn = Arc::clone(&self.conn);

        let record = tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StorageError::Poisoned)?;
            insert(&conn, snapshot)
        })
        .await??;

        tracing::debug!(id = record.id, "stored weather record");
        Ok(record)
    }
}
