//! SQLite-backed storage for users and saved task text.
//!
//! Provides persistent storage for:
//! - Registered users and their password hashes
//! - Raw task text saved per user, returned in insertion order

use rusqlite::{params, Connection, ErrorCode};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only task text per user.
pub trait TaskStore: Send + Sync {
    fn save(&self, user_key: &str, content: &str) -> StoreResult<()>;
    fn list(&self, user_key: &str) -> StoreResult<Vec<String>>;
}

/// User records keyed by email.
pub trait UserStore: Send + Sync {
    /// Returns `false` if the email is already taken.
    fn insert_user(&self, email: &str, password_hash: &str) -> StoreResult<bool>;
    fn password_hash(&self, email: &str) -> StoreResult<Option<String>>;
}

/// SQLite database holding both tables.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and apply the schema.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn migrate(&self) -> StoreResult<()> {
        self.conn()?.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                email    TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                content    TEXT NOT NULL,
                user_email TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_user_email ON tasks(user_email);",
        )?;
        Ok(())
    }
}

impl TaskStore for Database {
    fn save(&self, user_key: &str, content: &str) -> StoreResult<()> {
        self.conn()?.execute(
            "INSERT INTO tasks (content, user_email) VALUES (?1, ?2)",
            params![content, user_key],
        )?;
        Ok(())
    }

    fn list(&self, user_key: &str) -> StoreResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT content FROM tasks WHERE user_email = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![user_key], |row| row.get::<_, String>(0))?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }
}

impl UserStore for Database {
    fn insert_user(&self, email: &str, password_hash: &str) -> StoreResult<bool> {
        let result = self.conn()?.execute(
            "INSERT INTO users (email, password) VALUES (?1, ?2)",
            params![email, password_hash],
        );
        match result {
            Ok(_) => Ok(true),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn password_hash(&self, email: &str) -> StoreResult<Option<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT password FROM users WHERE email = ?1")?;
        let mut rows = stmt.query(params![email])?;
        let hash = match rows.next()? {
            Some(row) => Some(row.get(0)?),
            None => None,
        };
        Ok(hash)
    }
}
