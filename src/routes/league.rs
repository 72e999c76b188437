use actix_web::{web, HttpResponse, Responder, ResponseError};
use serde_json::Value;
use std::sync::Arc;

use crate::core::{compute_for_against, normalize, StrengthEngine};
use crate::error::AppError;
use crate::models::{CanonicalMatch, HealthResponse, ServiceInfo};
use crate::services::{CacheKey, FeedSource, ResultCache};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<FeedSource>,
    pub cache: Arc<ResultCache>,
    pub engine: StrengthEngine,
}

impl AppState {
    /// Fetch the feed and normalize it into canonical matches
    async fn load_matches(&self) -> Result<Vec<CanonicalMatch>, AppError> {
        let rows = self.feed.fetch_rows().await?;
        let matches = normalize(&rows)?;
        tracing::debug!("Feed normalized: {} rows -> {} canonical matches", rows.len(), matches.len());
        if matches.is_empty() {
            tracing::warn!("Feed produced no matches, returning empty results");
        }
        Ok(matches)
    }
}

/// Configure all league routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(service_info))
        .route("/health", web::get().to(health_check))
        .route("/strength", web::get().to(strength))
        .route("/schedule_strength", web::get().to(schedule_strength))
        .route("/for_against", web::get().to(for_against))
        .route("/cache/stats", web::get().to(cache_stats))
        .route("/cache/clear", web::post().to(cache_clear));
}

async fn service_info() -> impl Responder {
    HttpResponse::Ok().json(ServiceInfo {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Overall strength ranking
///
/// GET /strength
async fn strength(state: web::Data<AppState>) -> HttpResponse {
    cached(&state, CacheKey::STRENGTH, |state| async move {
        let matches = state.load_matches().await?;
        let report = state.engine.compute_strength(&matches)?;
        Ok::<_, AppError>(serde_json::to_value(report)?)
    })
    .await
}

/// Schedule strength ranking
///
/// GET /schedule_strength
async fn schedule_strength(state: web::Data<AppState>) -> HttpResponse {
    cached(&state, CacheKey::SCHEDULE_STRENGTH, |state| async move {
        let matches = state.load_matches().await?;
        let report = state.engine.compute_schedule_strength(&matches)?;
        Ok::<_, AppError>(serde_json::to_value(report)?)
    })
    .await
}

/// Points for/against per team
///
/// GET /for_against
async fn for_against(state: web::Data<AppState>) -> HttpResponse {
    cached(&state, CacheKey::FOR_AGAINST, |state| async move {
        let matches = state.load_matches().await?;
        Ok::<_, AppError>(serde_json::to_value(compute_for_against(&matches))?)
    })
    .await
}

/// Serve `key` from the cache, computing it at most once per TTL window
async fn cached<F, Fut>(state: &web::Data<AppState>, key: &str, compute: F) -> HttpResponse
where
    F: FnOnce(AppState) -> Fut,
    Fut: std::future::Future<Output = Result<Value, AppError>>,
{
    let start = std::time::Instant::now();
    let owned = state.get_ref().clone();

    match state.cache.get_or_compute(key, move || compute(owned)).await {
        Ok(value) => {
            tracing::info!(
                "'{}' served in {:.3}s",
                key,
                start.elapsed().as_secs_f64()
            );
            HttpResponse::Ok().json(value.as_ref())
        }
        Err(err) => {
            tracing::error!(
                "'{}' failed after {:.3}s: {}",
                key,
                start.elapsed().as_secs_f64(),
                err
            );
            err.error_response()
        }
    }
}

async fn cache_stats(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.cache.stats().await)
}

async fn cache_clear(state: web::Data<AppState>) -> impl Responder {
    state.cache.clear(None).await;
    HttpResponse::Ok().json(serde_json::json!({ "cleared": true }))
}
