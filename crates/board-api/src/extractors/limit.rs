//! Limit extractor for the recent-feedback query

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use board_service::RecentQuery;

use crate::response::ApiError;

/// Largest `limit` accepted at the edge; the service clamps further
pub const MAX_LIMIT: i64 = 50;

/// Optional `?limit=` parameter, clamped to `1..=MAX_LIMIT` when present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecentLimit(pub Option<i64>);

impl From<RecentQuery> for RecentLimit {
    fn from(query: RecentQuery) -> Self {
        Self(query.limit.map(|limit| limit.clamp(1, MAX_LIMIT)))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RecentLimit
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<RecentQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        Ok(RecentLimit::from(query))
    }
}
