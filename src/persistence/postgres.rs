//! PostgreSQL implementation of the timeline store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use sqlx::postgres::PgPoolOptions;

use super::{NewRecording, TimelineStore};
use crate::config::HubConfig;
use crate::domain::{CaptionEvent, MetadataEvent, Recording, RecordingId};
use crate::error::HubError;

/// Current Unix time in whole seconds, evaluated per statement.
const NOW_EPOCH: &str = "FLOOR(EXTRACT(EPOCH FROM clock_timestamp()))::BIGINT";

/// Advisory lock keys serializing stamp assignment per event table.
const METADATA_STAMP_LOCK: i64 = 0x6875_6201;
const CAPTION_STAMP_LOCK: i64 = 0x6875_6202;

const RECORDING_COLUMNS: &str =
    "id, file_base_name, file_extension, directory, start_time, end_time, uploaded, inserted_at";

type MetadataRow = (i64, String, String, i64);
type CaptionRow = (i64, String, f64, i64);
type RecordingRow = (i64, String, String, String, i64, Option<i64>, bool, i64);

fn metadata_from_row((id, key, value, inserted_at): MetadataRow) -> MetadataEvent {
    MetadataEvent {
        id,
        key,
        value,
        inserted_at,
    }
}

fn caption_from_row((id, text, duration_seconds, inserted_at): CaptionRow) -> CaptionEvent {
    CaptionEvent {
        id,
        text,
        duration_seconds,
        inserted_at,
    }
}

fn recording_from_row(
    (id, file_base_name, file_extension, directory, start_time, end_time, uploaded, inserted_at): RecordingRow,
) -> Recording {
    Recording {
        id: RecordingId::new(id),
        file_base_name,
        file_extension,
        directory,
        start_time,
        end_time,
        uploaded,
        inserted_at,
    }
}

/// Holds `key` until the transaction ends, so concurrent inserts read
/// `MAX(inserted_at)` one at a time and stamps follow id order.
async fn lock_stamps(tx: &mut Transaction<'_, Postgres>, key: i64) -> Result<(), HubError> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(key)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// PostgreSQL-backed [`TimelineStore`] using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using the database settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if the pool cannot be
    /// established.
    pub async fn connect(config: &HubConfig) -> Result<Self, HubError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), HubError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| HubError::StoreUnavailable(e.to_string()))
    }
}

#[async_trait]
impl TimelineStore for PostgresStore {
    async fn insert_metadata(&self, key: &str, value: &str) -> Result<MetadataEvent, HubError> {
        let sql = format!(
            "INSERT INTO metadata_events (metadata_key, metadata_value, inserted_at) \
             VALUES ($1, $2, GREATEST({NOW_EPOCH}, \
                 COALESCE((SELECT MAX(inserted_at) FROM metadata_events), 0))) \
             RETURNING id, metadata_key, metadata_value, inserted_at"
        );
        let mut tx = self.pool.begin().await?;
        lock_stamps(&mut tx, METADATA_STAMP_LOCK).await?;
        let row = sqlx::query_as::<_, MetadataRow>(&sql)
            .bind(key)
            .bind(value)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(metadata_from_row(row))
    }

    async fn latest_metadata(&self, key: &str) -> Result<Option<MetadataEvent>, HubError> {
        let row = sqlx::query_as::<_, MetadataRow>(
            "SELECT id, metadata_key, metadata_value, inserted_at FROM metadata_events \
             WHERE metadata_key = $1 ORDER BY inserted_at DESC, id DESC LIMIT 1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(metadata_from_row))
    }

    async fn metadata_in_range(
        &self,
        key: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<MetadataEvent>, HubError> {
        let rows = sqlx::query_as::<_, MetadataRow>(
            "SELECT id, metadata_key, metadata_value, inserted_at FROM metadata_events \
             WHERE metadata_key = $1 AND inserted_at >= $2 AND inserted_at <= $3 \
             ORDER BY inserted_at ASC, id ASC",
        )
        .bind(key)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(metadata_from_row).collect())
    }

    async fn latest_metadata_before(
        &self,
        key: &str,
        before: i64,
    ) -> Result<Option<MetadataEvent>, HubError> {
        let row = sqlx::query_as::<_, MetadataRow>(
            "SELECT id, metadata_key, metadata_value, inserted_at FROM metadata_events \
             WHERE metadata_key = $1 AND inserted_at < $2 \
             ORDER BY inserted_at DESC, id DESC LIMIT 1",
        )
        .bind(key)
        .bind(before)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(metadata_from_row))
    }

    async fn insert_caption(
        &self,
        text: &str,
        duration_seconds: f64,
    ) -> Result<CaptionEvent, HubError> {
        let sql = format!(
            "INSERT INTO caption_events (caption_text, duration_seconds, inserted_at) \
             VALUES ($1, $2, GREATEST({NOW_EPOCH}, \
                 COALESCE((SELECT MAX(inserted_at) FROM caption_events), 0))) \
             RETURNING id, caption_text, duration_seconds, inserted_at"
        );
        let mut tx = self.pool.begin().await?;
        lock_stamps(&mut tx, CAPTION_STAMP_LOCK).await?;
        let row = sqlx::query_as::<_, CaptionRow>(&sql)
            .bind(text)
            .bind(duration_seconds)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(caption_from_row(row))
    }

    async fn captions_in_range(
        &self,
        start: i64,
        end: i64,
    ) -> Result<Vec<CaptionEvent>, HubError> {
        let rows = sqlx::query_as::<_, CaptionRow>(
            "SELECT id, caption_text, duration_seconds, inserted_at FROM caption_events \
             WHERE inserted_at >= $1 AND inserted_at <= $2 \
             ORDER BY inserted_at ASC, id ASC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(caption_from_row).collect())
    }

    async fn start_recording(&self, new: NewRecording) -> Result<Recording, HubError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            "UPDATE recordings SET end_time = GREATEST({NOW_EPOCH}, start_time) \
             WHERE end_time IS NULL"
        ))
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, RecordingRow>(&format!(
            "INSERT INTO recordings \
                 (file_base_name, file_extension, directory, start_time, end_time, uploaded, inserted_at) \
             VALUES ($1, $2, $3, {NOW_EPOCH}, NULL, FALSE, {NOW_EPOCH}) \
             RETURNING {RECORDING_COLUMNS}"
        ))
        .bind(&new.file_base_name)
        .bind(&new.file_extension)
        .bind(&new.directory)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(recording_from_row(row))
    }

    async fn end_active_recordings(&self) -> Result<u64, HubError> {
        let result = sqlx::query(&format!(
            "UPDATE recordings SET end_time = GREATEST({NOW_EPOCH}, start_time) \
             WHERE end_time IS NULL"
        ))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn get_recording(&self, id: RecordingId) -> Result<Option<Recording>, HubError> {
        let row = sqlx::query_as::<_, RecordingRow>(&format!(
            "SELECT {RECORDING_COLUMNS} FROM recordings WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(recording_from_row))
    }

    async fn pending_recordings(&self) -> Result<Vec<Recording>, HubError> {
        let rows = sqlx::query_as::<_, RecordingRow>(&format!(
            "SELECT {RECORDING_COLUMNS} FROM recordings \
             WHERE uploaded = FALSE AND end_time IS NOT NULL \
             ORDER BY start_time ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(recording_from_row).collect())
    }

    async fn mark_uploaded(&self, id: RecordingId) -> Result<bool, HubError> {
        let result = sqlx::query(
            "UPDATE recordings SET uploaded = TRUE \
             WHERE id = $1 AND uploaded = FALSE AND end_time IS NOT NULL",
        )
        .bind(id.get())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_uploaded(&self, id: RecordingId) -> Result<(), HubError> {
        sqlx::query("UPDATE recordings SET uploaded = FALSE WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
