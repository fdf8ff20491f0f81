use std::time::Duration;

use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AppConfig;

/// A positional stored-procedure argument. The closed set of shapes the
/// `activity.sp_*` procedures accept.
#[derive(Debug, Clone)]
pub enum SpArg {
    Uuid(Uuid),
    OptUuid(Option<Uuid>),
    OptUuidList(Option<Vec<Uuid>>),
    Text(String),
    OptText(Option<String>),
    Int(i32),
    Bool(bool),
    OptBool(Option<bool>),
    OptJson(Option<Value>),
}

/// Shared connection pool. Every data operation is a single stored-procedure
/// call; one connection is acquired per call and released immediately after.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a bounded pool and verify connectivity. Errors propagate to the
    /// caller unchanged; there is no retry.
    pub async fn connect(config: &AppConfig) -> Result<Self, sqlx::Error> {
        let db = &config.database;
        let pool = PgPoolOptions::new()
            .min_connections(db.pool_min)
            .max_connections(db.pool_max)
            .acquire_timeout(Duration::from_secs(db.command_timeout_secs))
            .connect(&config.database_url())
            .await?;

        tracing::info!(
            min = db.pool_min,
            max = db.pool_max,
            "database pool connected"
        );
        Ok(Self { pool })
    }

    /// Wrap an already-built pool. Used by tests to construct state around a
    /// lazy pool without connecting.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Drain and close all connections. Idempotent.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }

    /// Execute `SELECT * FROM <procedure>($1,..,$n)` with the given arguments
    /// bound by ordinal position, returning the full result set.
    pub async fn call_procedure(
        &self,
        procedure: &str,
        args: &[SpArg],
    ) -> Result<Vec<PgRow>, sqlx::Error> {
        let sql = procedure_sql(procedure, args.len());

        tracing::debug!(procedure, params = args.len(), "executing stored procedure");

        let mut query = sqlx::query(&sql);
        for arg in args {
            query = match arg {
                SpArg::Uuid(v) => query.bind(*v),
                SpArg::OptUuid(v) => query.bind(*v),
                SpArg::OptUuidList(v) => query.bind(v.clone()),
                SpArg::Text(v) => query.bind(v.clone()),
                SpArg::OptText(v) => query.bind(v.clone()),
                SpArg::Int(v) => query.bind(*v),
                SpArg::Bool(v) => query.bind(*v),
                SpArg::OptBool(v) => query.bind(*v),
                SpArg::OptJson(v) => query.bind(v.clone()),
            };
        }

        query.fetch_all(&self.pool).await
    }

    /// Trivial liveness probe used by the health endpoint.
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn procedure_sql(procedure: &str, arg_count: usize) -> String {
    let placeholders = (1..=arg_count)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT * FROM {procedure}({placeholders})")
}
