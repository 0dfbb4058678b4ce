//! Recommendation persistence.
//!
//! Stores hold one entry per record id: the JSON-serialized recommendation
//! set. Every put replaces the previous entry wholesale.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::config::{StoreBackend, StoreConfig};
use crate::recommendations::RecommendationSet;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Lock error")]
    Lock,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key-value persistence for computed recommendations.
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Store the serialized recommendations under `record_id`, replacing any prior value.
    async fn put(&self, record_id: &str, recommendations: String) -> Result<(), StoreError>;

    /// Fetch the serialized recommendations stored under `record_id`.
    async fn get(&self, record_id: &str) -> Result<Option<String>, StoreError>;
}

/// Serialize and persist a recommendation set, logging instead of failing.
///
/// Persistence is best-effort: the caller's result never depends on it.
pub async fn save_recommendations(
    store: &dyn RecommendationStore,
    record_id: &str,
    recommendations: &RecommendationSet,
) {
    let result = match serde_json::to_string(recommendations) {
        Ok(serialized) => store.put(record_id, serialized).await,
        Err(e) => Err(StoreError::from(e)),
    };

    match result {
        Ok(()) => tracing::info!(record_id, "Recommendations saved"),
        Err(e) => tracing::error!(record_id, error = %e, "Failed to save recommendations"),
    }
}

/// Build the store selected in configuration.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn RecommendationStore>, StoreError> {
    match config.backend {
        StoreBackend::Sqlite => {
            if let Some(parent) = Path::new(&config.path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let store = SqliteRecommendationStore::open(&config.path, &config.table)?;
            tracing::info!(
                path = %config.path,
                table = %config.table,
                "Opened SQLite recommendation store"
            );
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory recommendation store - entries are lost on restart");
            Ok(Arc::new(MemoryRecommendationStore::new()))
        }
    }
}

/// SQLite-backed recommendation store.
pub struct SqliteRecommendationStore {
    conn: Arc<Mutex<Connection>>,
    table: String,
}

impl SqliteRecommendationStore {
    /// Opens (or creates) the database at `path`. `table` must be a plain identifier.
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open(path)?, table)
    }

    /// Creates an in-memory database (for testing).
    pub fn in_memory(table: &str) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, table)
    }

    fn with_connection(conn: Connection, table: &str) -> Result<Self, StoreError> {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                recordId TEXT PRIMARY KEY,
                recommendations TEXT NOT NULL
            );",
            table
        ))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            table: table.to_string(),
        })
    }
}

#[async_trait]
impl RecommendationStore for SqliteRecommendationStore {
    async fn put(&self, record_id: &str, recommendations: String) -> Result<(), StoreError> {
        let conn = Arc::clone(&self.conn);
        let sql = format!(
            "INSERT OR REPLACE INTO {} (recordId, recommendations) VALUES (?1, ?2)",
            self.table
        );
        let record_id = record_id.to_string();

        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let conn = conn.lock().map_err(|_| StoreError::Lock)?;
            conn.execute(&sql, params![record_id, recommendations])?;
            Ok(())
        })
        .await?
    }

    async fn get(&self, record_id: &str) -> Result<Option<String>, StoreError> {
        let conn = Arc::clone(&self.conn);
        let sql = format!(
            "SELECT recommendations FROM {} WHERE recordId = ?1",
            self.table
        );
        let record_id = record_id.to_string();

        tokio::task::spawn_blocking(move || -> Result<Option<String>, StoreError> {
            let conn = conn.lock().map_err(|_| StoreError::Lock)?;
            let value = conn
                .query_row(&sql, params![record_id], |row| row.get(0))
                .optional()?;
            Ok(value)
        })
        .await?
    }
}

/// Process-local store.
#[derive(Default)]
pub struct MemoryRecommendationStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryRecommendationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecommendationStore for MemoryRecommendationStore {
    async fn put(&self, record_id: &str, recommendations: String) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Lock)?;
        entries.insert(record_id.to_string(), recommendations);
        Ok(())
    }

    async fn get(&self, record_id: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Lock)?;
        Ok(entries.get(record_id).cloned())
    }
}
