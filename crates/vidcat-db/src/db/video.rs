use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use vidcat_core::models::{
    FormatCode, NewVideo, Page, PageRequest, UserSummary, Video, VideoChanges, VideoDetails,
    VideoFilter, VideoFormat,
};
use vidcat_core::AppError;

use super::filters::FilterParams;
use crate::traits::VideoRepository;

const VIDEO_COLUMNS: &str = "id, name, duration, source, user_id, enabled, created_at, updated_at";

const VIDEO_WITH_OWNER: &str = r#"
    SELECT v.id, v.name, v.duration, v.source, v.user_id, v.enabled, v.created_at, v.updated_at,
           u.username AS owner_username, u.pseudo AS owner_pseudo, u.created_at AS owner_created_at
    FROM videos v
    JOIN users u ON u.id = v.user_id
"#;

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::text IS NULL OR v.duration::text LIKE $1)
      AND ($2::text IS NULL OR v.name ILIKE $2)
      AND ($3::text IS NULL OR u.username ILIKE $3 OR u.id::text LIKE $3)
      AND ($4::bigint IS NULL OR v.user_id = $4)
"#;

/// Row type for a video joined with its owner (for FromRow).
#[derive(Debug, sqlx::FromRow)]
struct VideoOwnerRow {
    id: i64,
    name: String,
    duration: i32,
    source: String,
    user_id: i64,
    enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_username: String,
    owner_pseudo: Option<String>,
    owner_created_at: DateTime<Utc>,
}

impl VideoOwnerRow {
    fn into_details(self, formats: Vec<VideoFormat>) -> VideoDetails {
        VideoDetails {
            owner: UserSummary {
                id: self.user_id,
                username: self.owner_username,
                pseudo: self.owner_pseudo,
                created_at: self.owner_created_at,
            },
            video: Video {
                id: self.id,
                name: self.name,
                duration: self.duration,
                source: self.source,
                user_id: self.user_id,
                enabled: self.enabled,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            formats,
        }
    }
}

/// Repository for the `videos` and `video_formats` tables.
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the formats of several videos in one query, keyed by video id.
    async fn formats_for(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<VideoFormat>>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<Postgres, VideoFormat>(
            r#"
            SELECT id, code, uri, video_id
            FROM video_formats
            WHERE video_id = ANY($1)
            ORDER BY video_id ASC, code ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut map: HashMap<i64, Vec<VideoFormat>> = HashMap::with_capacity(ids.len());
        for format in rows {
            map.entry(format.video_id).or_default().push(format);
        }
        Ok(map)
    }

    async fn attach_formats(&self, rows: Vec<VideoOwnerRow>) -> Result<Vec<VideoDetails>, AppError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut formats = self.formats_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let video_formats = formats.remove(&row.id).unwrap_or_default();
                row.into_details(video_formats)
            })
            .collect())
    }

    async fn insert_formats(
        tx: &mut Transaction<'_, Postgres>,
        video_id: i64,
    ) -> Result<Vec<VideoFormat>, AppError> {
        let codes: Vec<i32> = FormatCode::ALL.iter().map(|c| c.as_i32()).collect();

        let formats = sqlx::query_as::<Postgres, VideoFormat>(
            r#"
            INSERT INTO video_formats (code, video_id)
            SELECT code, $2 FROM UNNEST($1::int[]) AS code
            RETURNING id, code, uri, video_id
            "#,
        )
        .bind(&codes)
        .bind(video_id)
        .fetch_all(&mut **tx)
        .await?;

        if formats.len() != FormatCode::ALL.len() {
            return Err(AppError::Internal(format!(
                "Expected {} format rows for video {}, inserted {}",
                FormatCode::ALL.len(),
                video_id,
                formats.len()
            )));
        }

        Ok(formats)
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "insert", user_id = video.user_id))]
    async fn create(&self, video: NewVideo) -> Result<VideoDetails, AppError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<Postgres, Video>(&format!(
            "INSERT INTO videos (name, duration, source, user_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            VIDEO_COLUMNS
        ))
        .bind(&video.name)
        .bind(video.duration)
        .bind(&video.source)
        .bind(video.user_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut formats = Self::insert_formats(&mut tx, created.id).await?;
        formats.sort_by_key(|f| f.code);

        let owner = sqlx::query_as::<Postgres, UserSummary>(
            "SELECT id, username, pseudo, created_at FROM users WHERE id = $1",
        )
        .bind(created.user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(video_id = created.id, "Video created with format rows");

        Ok(VideoDetails {
            video: created,
            owner,
            formats,
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: i64) -> Result<Option<VideoDetails>, AppError> {
        let row = sqlx::query_as::<Postgres, VideoOwnerRow>(&format!(
            "{} WHERE v.id = $1",
            VIDEO_WITH_OWNER
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.attach_formats(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", page = page.page(), per_page = page.per_page()))]
    async fn list(
        &self,
        filter: &VideoFilter,
        page: PageRequest,
    ) -> Result<Page<VideoDetails>, AppError> {
        let params = FilterParams::from(filter);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM videos v JOIN users u ON u.id = v.user_id {}",
            FILTER_CLAUSE
        ))
        .bind(&params.duration)
        .bind(&params.name)
        .bind(&params.user)
        .bind(params.user_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<Postgres, VideoOwnerRow>(&format!(
            "{} {} ORDER BY v.id ASC LIMIT $5 OFFSET $6",
            VIDEO_WITH_OWNER, FILTER_CLAUSE
        ))
        .bind(&params.duration)
        .bind(&params.name)
        .bind(&params.user)
        .bind(params.user_id)
        .bind(page.per_page())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let items = self.attach_formats(rows).await?;

        Ok(Page::new(items, page, total))
    }

    #[tracing::instrument(skip(self, uri), fields(db.table = "video_formats", db.operation = "update", db.record_id = %id, format = %code))]
    async fn record_encoding(
        &self,
        id: i64,
        code: FormatCode,
        uri: &str,
    ) -> Result<Option<VideoDetails>, AppError> {
        let mut tx = self.pool.begin().await?;

        let enabled = sqlx::query(
            "UPDATE videos SET enabled = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if enabled.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query("UPDATE video_formats SET uri = $1 WHERE video_id = $2 AND code = $3")
            .bind(uri)
            .bind(id)
            .bind(code)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get(id).await
    }

    #[tracing::instrument(skip(self, changes), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn update(
        &self,
        id: i64,
        changes: VideoChanges,
    ) -> Result<Option<VideoDetails>, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET name = $1, source = $2, user_id = $3, updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.source)
        .bind(changes.user_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
