//! Connection pool, migrations and the single-writer actor.

use log::{error, info};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use diesel::connection::{Connection, SimpleConnection};
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::errors::IntoCore;
use investledger_core::errors::{DatabaseError, Error, Result};

pub mod write_actor;
pub use write_actor::{spawn_writer, WriteHandle};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

const DEFAULT_POOL_SIZE: u32 = 8;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Where the database lives and how many connections to keep.
#[derive(Debug, Clone, PartialEq)]
pub struct DbConfig {
    pub db_path: String,
    pub pool_size: u32,
}

impl DbConfig {
    /// Reads `DATABASE_URL` (or `INVESTLEDGER_DATA_DIR`, falling back to
    /// `default_data_dir`) and `INVESTLEDGER_POOL_SIZE`.
    pub fn from_env(default_data_dir: &str) -> Self {
        let data_dir = std::env::var("INVESTLEDGER_DATA_DIR")
            .unwrap_or_else(|_| default_data_dir.to_string());
        let pool_size = std::env::var("INVESTLEDGER_POOL_SIZE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_POOL_SIZE);
        DbConfig {
            db_path: get_db_path(&data_dir),
            pool_size,
        }
    }
}

/// Applies per-connection pragmas. SQLite only enforces the foreign keys
/// (cascade and set-null on group deletion) when the pragma is on for the
/// connection doing the write.
#[derive(Debug)]
struct ConnectionCustomizer;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 30000;")
            .map_err(r2d2::Error::QueryError)
    }
}

/// Ensures the database directory exists and sets file-level pragmas.
/// Returns the database path in use.
pub fn init(app_data_dir: &str) -> Result<String> {
    let db_path = get_db_path(app_data_dir);

    if let Some(db_dir) = Path::new(&db_path).parent() {
        if !db_dir.as_os_str().is_empty() && !db_dir.exists() {
            fs::create_dir_all(db_dir)?;
        }
    }

    let mut conn = SqliteConnection::establish(&db_path).into_core()?;
    conn.batch_execute(
        "
            PRAGMA journal_mode = WAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 30000;
            PRAGMA synchronous  = NORMAL;
        ",
    )
    .into_core()?;

    Ok(db_path)
}

pub fn create_pool(db_path: &str) -> Result<Arc<DbPool>> {
    create_pool_with_size(db_path, DEFAULT_POOL_SIZE)
}

pub fn create_pool_with_size(db_path: &str, max_size: u32) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = r2d2::Pool::builder()
        .max_size(max_size)
        .min_idle(Some(1))
        .connection_timeout(Duration::from_secs(30))
        .connection_customizer(Box::new(ConnectionCustomizer))
        .build(manager)
        .map_err(|e| Error::Database(DatabaseError::PoolCreationFailed(e.to_string())))?;
    Ok(Arc::new(pool))
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection> {
    pool.get().into_core()
}

pub fn run_migrations(pool: &DbPool) -> Result<()> {
    info!("Running database migrations");
    let mut connection = get_connection(pool)?;

    let applied = connection.run_pending_migrations(MIGRATIONS).map_err(|e| {
        error!("Database migration failed: {}", e);
        Error::Database(DatabaseError::MigrationFailed(e.to_string()))
    })?;

    if applied.is_empty() {
        info!("No pending migrations to apply.");
    } else {
        info!("Applied the following migrations:");
        for migration_version in &applied {
            info!("  - {}", migration_version);
        }
    }

    Ok(())
}

/// `DATABASE_URL` if set, otherwise `<app_data_dir>/app.db`.
pub fn get_db_path(app_data_dir: &str) -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        Path::new(app_data_dir)
            .join("app.db")
            .to_string_lossy()
            .into_owned()
    })
}

/// Initializes the file, builds the pool, migrates, and starts the writer.
///
/// Must be called inside a Tokio runtime.
pub fn open(config: &DbConfig) -> Result<(Arc<DbPool>, WriteHandle)> {
    let data_dir = Path::new(&config.db_path)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !data_dir.is_empty() && !Path::new(&data_dir).exists() {
        fs::create_dir_all(&data_dir)?;
    }
    let pool = create_pool_with_size(&config.db_path, config.pool_size)?;
    {
        let mut conn = get_connection(&pool)?;
        conn.batch_execute("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")
            .into_core()?;
    }
    run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());
    Ok((pool, writer))
}
