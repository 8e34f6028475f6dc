use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tle_format::ElementSet;

/// Records per COPY message sent to the server.
const COPY_CHUNK_RECORDS: usize = 1_000;

const CREATE_STAGE: &str = r#"
    CREATE TEMP TABLE element_sets_stage (
        catalog_number INTEGER,
        object_name TEXT,
        line1 TEXT,
        line2 TEXT,
        epoch TIMESTAMPTZ
    ) ON COMMIT DROP
"#;

const COPY_INTO_STAGE: &str = r#"
    COPY element_sets_stage (catalog_number, object_name, line1, line2, epoch)
    FROM STDIN WITH (FORMAT csv)
"#;

const MERGE_STAGE: &str = r#"
    INSERT INTO element_sets (catalog_number, object_name, line1, line2, epoch)
    SELECT catalog_number, object_name, line1, line2, epoch
    FROM element_sets_stage
    ON CONFLICT (catalog_number, epoch) DO NOTHING
"#;

const SELECT_COLUMNS: &str =
    "id, catalog_number, object_name, line1, line2, epoch, observed_at";

/// Result of one batch write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Rows bulk-loaded into staging
    pub staged: u64,
    /// Rows that were new and landed in `element_sets`
    pub inserted: u64,
}

impl BatchOutcome {
    pub fn skipped(&self) -> u64 {
        self.staged.saturating_sub(self.inserted)
    }
}

/// Element set as stored, with its surrogate id and ingestion time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredElementSet {
    pub id: i64,
    pub catalog_number: i32,
    pub object_name: String,
    pub line1: String,
    pub line2: String,
    pub epoch: DateTime<Utc>,
    pub observed_at: DateTime<Utc>,
}

impl StoredElementSet {
    /// Persist a batch: stage with COPY, then merge ignoring known keys.
    ///
    /// Runs in a single transaction; any failure rolls the whole batch back.
    /// Rows whose (catalog_number, epoch) already exist are skipped, never
    /// updated.
    pub async fn save_batch(records: &[ElementSet], pool: &PgPool) -> Result<BatchOutcome> {
        if records.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let mut tx = pool.begin().await.context("failed to open transaction")?;

        sqlx::query(CREATE_STAGE)
            .execute(&mut *tx)
            .await
            .context("failed to create staging table")?;

        let mut copy = tx
            .copy_in_raw(COPY_INTO_STAGE)
            .await
            .context("failed to start COPY into staging")?;
        for chunk in records.chunks(COPY_CHUNK_RECORDS) {
            copy.send(encode_csv(chunk).into_bytes())
                .await
                .context("failed to stream element sets into staging")?;
        }
        let staged = copy.finish().await.context("failed to finish COPY")?;

        let inserted = sqlx::query(MERGE_STAGE)
            .execute(&mut *tx)
            .await
            .context("failed to merge staged element sets")?
            .rows_affected();

        tx.commit().await.context("failed to commit element sets")?;

        tracing::debug!(staged, inserted, "Element set batch committed");

        Ok(BatchOutcome { staged, inserted })
    }

    /// Most recent epoch for every catalog number.
    pub async fn find_current(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT DISTINCT ON (catalog_number) {SELECT_COLUMNS}
             FROM element_sets
             ORDER BY catalog_number, epoch DESC"
        ))
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_latest_by_catalog_number(
        catalog_number: i32,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {SELECT_COLUMNS}
             FROM element_sets
             WHERE catalog_number = $1
             ORDER BY epoch DESC
             LIMIT 1"
        ))
        .bind(catalog_number)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Latest record whose name matches exactly. Names are not unique, so
    /// this is the newest epoch across every object carrying the name.
    pub async fn find_latest_by_name(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {SELECT_COLUMNS}
             FROM element_sets
             WHERE object_name = $1
             ORDER BY epoch DESC
             LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let (count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM element_sets")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

/// Render records as CSV rows matching the staging column order.
fn encode_csv(records: &[ElementSet]) -> String {
    let mut out = String::with_capacity(records.len() * 200);
    for record in records {
        out.push_str(&record.catalog_number.to_string());
        out.push(',');
        push_quoted(&mut out, &record.object_name);
        out.push(',');
        push_quoted(&mut out, &record.line1);
        out.push(',');
        push_quoted(&mut out, &record.line2);
        out.push(',');
        out.push_str(&record.epoch.to_rfc3339_opts(SecondsFormat::Micros, true));
        out.push('\n');
    }
    out
}

fn push_quoted(out: &mut String, field: &str) {
    out.push('"');
    out.push_str(&field.replace('"', "\"\""));
    out.push('"');
}
