//! Shared request state and the bridge from async handlers to SQLite.

use crate::http::error::ApiError;
use habit_core::{Clock, HabitService, ServiceResult, SqliteHabitRepository};
use log::error;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub type Service<'a> = HabitService<SqliteHabitRepository<'a>, &'a (dyn Clock + Send + Sync)>;

/// Cloned into every handler; one connection serializes store access.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl AppState {
    pub fn new(conn: Connection, clock: impl Clock + Send + Sync + 'static) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            clock: Arc::new(clock),
        }
    }

    /// Runs one use case on the blocking pool with exclusive store access.
    pub async fn run<T, F>(&self, operation: &'static str, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: for<'a> FnOnce(&mut Service<'a>) -> ServiceResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let clock = Arc::clone(&self.clock);

        let joined = tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| {
                error!("event=store_lock module=http status=error operation={operation} error_code=lock_poisoned");
                ApiError::internal()
            })?;
            let mut service: Service<'_> =
                HabitService::new(SqliteHabitRepository::new(&mut guard), clock.as_ref());
            f(&mut service).map_err(ApiError::from)
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(err) => {
                error!(
                    "event=blocking_task module=http status=error operation={} error={}",
                    operation, err
                );
                Err(ApiError::internal())
            }
        }
    }
}
