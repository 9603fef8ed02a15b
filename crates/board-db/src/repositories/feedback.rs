//! PostgreSQL implementation of FeedbackRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use board_core::entities::Feedback;
use board_core::traits::{FeedbackRepository, RepoResult};

use crate::mappers::FeedbackInsert;
use crate::models::FeedbackModel;

use super::error::{map_db_error, map_insert_error};

/// Hard cap on a single "recent" read
const MAX_RECENT: i64 = 100;

/// PostgreSQL implementation of FeedbackRepository
#[derive(Clone)]
pub struct PgFeedbackRepository {
    pool: PgPool,
}

impl PgFeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackRepository for PgFeedbackRepository {
    #[instrument(skip(self, feedback), fields(id = %feedback.id))]
    async fn create(&self, feedback: &Feedback) -> RepoResult<Feedback> {
        let row = FeedbackInsert::try_from(feedback)?;

        let stored = sqlx::query_as::<_, FeedbackModel>(
            r#"
            INSERT INTO feedback (id, name, comment, emoji, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, comment, emoji, created_at
            "#,
        )
        .bind(row.id)
        .bind(row.name)
        .bind(row.comment)
        .bind(row.emoji)
        .bind(row.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, feedback.id))?;

        Ok(Feedback::from(stored))
    }

    #[instrument(skip(self))]
    async fn recent(&self, limit: i64) -> RepoResult<Vec<Feedback>> {
        let limit = limit.clamp(1, MAX_RECENT);

        let rows = sqlx::query_as::<_, FeedbackModel>(
            r#"
            SELECT id, name, comment, emoji, created_at
            FROM feedback
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Feedback::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM feedback")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
