use crate::error::AppError;
use crate::models::{NewReport, Report};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{str::FromStr, sync::Arc};

/// Repository Trait
///
/// The contract for every persistence operation on reports. Handlers only see this
/// trait, so tests can swap the SQLite store for an in-memory mock.
///
/// **Send + Sync + async_trait** are required to share `Arc<dyn ReportRepository>`
/// across Axum's task boundaries.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Creates the `report` table and its indexes. Safe to call on every startup.
    async fn create_tables(&self) -> Result<(), AppError>;

    /// Persists a new report stamped with the current time and returns the stored row.
    async fn create(&self, report: NewReport) -> Result<Report, AppError>;

    /// All reports with `submitted = true`, most recent first.
    async fn accepted(&self) -> Result<Vec<Report>, AppError>;

    /// Point lookup by primary key. Absent ids yield `AppError::NotFound`.
    async fn get_by_id(&self, id: i64) -> Result<Report, AppError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn ReportRepository>;

const REPORT_COLUMNS: &str = "id, type, location, details, submitted, timestamp";

/// SqliteReportRepository
///
/// The `ReportRepository` backed by an embedded SQLite database file.
pub struct SqliteReportRepository {
    pool: SqlitePool,
}

impl SqliteReportRepository {
    /// Creates a new repository instance using an initialized connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// connect
    ///
    /// Opens a pool for `db_url` (e.g. `sqlite://reports.db`), creating the database
    /// file on first start.
    pub async fn connect(db_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ReportRepository for SqliteReportRepository {
    async fn create_tables(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS report (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL,
                location TEXT NOT NULL,
                details TEXT NOT NULL DEFAULT '',
                submitted BOOLEAN NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS report_submitted ON report (submitted)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS report_timestamp ON report (timestamp)")
            .execute(&self.pool)
            .await?;

        tracing::debug!("report table ready");
        Ok(())
    }

    /// create
    ///
    /// The timestamp is assigned here, never by the caller, and is not touched again.
    async fn create(&self, report: NewReport) -> Result<Report, AppError> {
        let query = format!(
            "INSERT INTO report (type, location, details, submitted, timestamp) \
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            REPORT_COLUMNS
        );

        let created = sqlx::query_as::<_, Report>(&query)
            .bind(report.report_type())
            .bind(report.location())
            .bind(report.details())
            .bind(report.submitted())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("create report error: {:?}", e);
                e
            })?;

        tracing::info!(report_id = created.id, "report created");
        Ok(created)
    }

    /// accepted
    ///
    /// Re-queried on every call. Rows sharing a timestamp fall back to insertion order.
    async fn accepted(&self) -> Result<Vec<Report>, AppError> {
        let query = format!(
            "SELECT {} FROM report WHERE submitted = 1 ORDER BY timestamp DESC, id DESC",
            REPORT_COLUMNS
        );

        let reports = sqlx::query_as::<_, Report>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(reports)
    }

    async fn get_by_id(&self, id: i64) -> Result<Report, AppError> {
        let query = format!("SELECT {} FROM report WHERE id = ?", REPORT_COLUMNS);

        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound)
    }
}
