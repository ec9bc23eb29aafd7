use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use timeline::Timeline;
use timeline_core::RepositoryProvider;

use crate::error::ApiError;

pub struct AppState<R: RepositoryProvider> {
    pub timeline: Arc<Timeline<R>>,
}

impl<R: RepositoryProvider> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            timeline: self.timeline.clone(),
        }
    }
}

pub(crate) fn authorization_header(request_headers: &axum::http::HeaderMap) -> Option<&str> {
    request_headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
}

/// Reject requests without a valid bearer token.
///
/// Only the signature and expiry are checked; the account is not looked up.
/// The verified [`timeline_core::Caller`] is stored in the request extensions.
pub async fn require_bearer<R>(
    State(state): State<AppState<R>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    R: RepositoryProvider,
{
    let caller = state
        .timeline
        .verify_token(authorization_header(request.headers()))
        .inspect_err(|e| tracing::debug!(error = %e, "Rejected bearer token"))?;

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}
