//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

use crate::cache::{CacheEntryDescriptor, MemoryEngine, UserCache, DEFAULT_PERCENT_PRECISION};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, CounterRequest, CounterResponse, DeleteResponse, ExistsResponse, GetResponse,
    HealthResponse, MemoryResponse, SetRequest, SetResponse, StatsResponse, TtlRequest,
    TtlResponse,
};

/// Application state shared across all handlers.
///
/// The facade synchronizes internally, so it is shared through a plain Arc.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<UserCache<MemoryEngine>>,
}

impl AppState {
    pub fn new(cache: UserCache<MemoryEngine>) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates the engine and facade described by the Config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let engine = MemoryEngine::from_config(config);
        Ok(Self::new(UserCache::from_config(engine, config)?))
    }
}

fn checked(req: &SetRequest) -> Result<()> {
    if req.key.is_empty() {
        return Err(CacheError::MissingKey);
    }
    match req.validate() {
        Some(error_msg) => Err(CacheError::InvalidRequest(error_msg)),
        None => Ok(()),
    }
}

/// Handler for PUT /set
///
/// Stores a value, using the default TTL when the request has none.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    checked(&req)?;
    let stored = state.cache.set(&req.key, req.value, req.ttl);
    Ok(Json(SetResponse::new(req.key, stored)))
}

/// Handler for POST /add
///
/// Stores a value only if the key is absent.
pub async fn add_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    checked(&req)?;
    let stored = state.cache.add(&req.key, req.value, req.ttl);
    Ok(Json(SetResponse::new(req.key, stored)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key) {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /exists/:key
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ExistsResponse> {
    let exists = state.cache.exists(&key);
    Json(ExistsResponse { key, exists })
}

/// Handler for POST /inc/:key
pub async fn inc_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<CounterResponse>> {
    let by = counter_step(&body)?;
    let value = state.cache.inc(&key, by);
    Ok(Json(CounterResponse::new(key, value)))
}

/// Handler for POST /dec/:key
pub async fn dec_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<CounterResponse>> {
    let by = counter_step(&body)?;
    let value = state.cache.dec(&key, by);
    Ok(Json(CounterResponse::new(key, value)))
}

/// Reads the counter step. An empty body means a step of 1; a body that is
/// not a valid `CounterRequest` is rejected.
fn counter_step(body: &[u8]) -> Result<i64> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(1);
    }
    serde_json::from_slice::<CounterRequest>(body)
        .map(|req| req.step())
        .map_err(|err| CacheError::InvalidRequest(format!("counter body: {}", err)))
}

/// Handler for DELETE /del/*search
///
/// Accepts a literal key, a wildcard search or a delimited pattern.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(search): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.cache.delete(&search);
    Json(DeleteResponse { search, deleted })
}

/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(ClearResponse {
        cleared: state.cache.clear(),
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let Some(info) = state.cache.info_snapshot() else {
        return Json(StatsResponse::default());
    };

    Json(StatsResponse::new(
        info.total_hit_count,
        info.total_miss_count,
        info.total_item_count,
        info.total_cache_uptime,
        info.is_local_cache,
    ))
}

/// Handler for GET /meminfo
pub async fn meminfo_handler(State(state): State<AppState>) -> Json<MemoryResponse> {
    let cache = &state.cache;
    Json(MemoryResponse {
        total: cache.memory_total().unwrap_or_default(),
        free: cache.memory_free().unwrap_or_default(),
        used: cache.memory_used().unwrap_or_default(),
        used_percent: cache.memory_used_percent(DEFAULT_PERCENT_PRECISION),
        overhead: cache.memory_overhead().unwrap_or_default(),
        used_blocks: cache.memory_used_blocks().unwrap_or_default(),
        free_blocks: cache.memory_free_blocks().unwrap_or_default(),
    })
}

/// Handler for GET /entries
pub async fn entries_handler(State(state): State<AppState>) -> Json<Vec<CacheEntryDescriptor>> {
    Json(state.cache.entries())
}

/// Handler for GET /ttl
pub async fn get_ttl_handler(State(state): State<AppState>) -> Json<TtlResponse> {
    Json(TtlResponse {
        default_ttl: state.cache.default_ttl(),
    })
}

/// Handler for PUT /ttl
pub async fn set_ttl_handler(
    State(state): State<AppState>,
    Json(req): Json<TtlRequest>,
) -> Json<TtlResponse> {
    state.cache.set_default_ttl(req.default_ttl);
    Json(TtlResponse {
        default_ttl: state.cache.default_ttl(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
