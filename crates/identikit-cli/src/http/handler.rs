use std::collections::HashMap;
use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::HeaderMap;
use chrono::Utc;
use identikit_admission::Admission;
use identikit_core::{BatchRequest, BatchResult, QueryParams};
use tracing::{error, info, warn};

use super::AppState;
use super::error::ApiError;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// `GET /api`: admit the caller, then generate one batch on the blocking pool.
pub async fn get_users(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<BatchResult>, ApiError> {
    let params = QueryParams {
        results: query.get("results").map(String::as_str),
        seed: query.get("seed").map(String::as_str),
        page: query.get("page").map(String::as_str),
        gender: query.get("gender").map(String::as_str),
    };
    let request = BatchRequest::from_query(params, state.max_results, default_seed());
    let client = client_key(peer, &headers, state.trust_forwarded_for);

    match state.admission.admit(&client, request.count as u64) {
        Admission::Allow { total } => {
            info!(
                client = %client,
                count = request.count,
                seed = request.effective_seed(),
                total,
                "request admitted"
            );
        }
        Admission::Deny { current } => {
            warn!(client = %client, current, "request denied by quota");
            return Err(ApiError::QuotaExceeded { current });
        }
    }

    let generator = state.generator.clone();
    let batch = tokio::task::spawn_blocking(move || generator.generate(&request))
        .await
        .map_err(|err| {
            error!(error = %err, "generation task failed");
            ApiError::Internal
        })?
        .map_err(|err| {
            error!(error = %err, client = %client, "generation failed");
            ApiError::Internal
        })?;

    Ok(Json(batch))
}

/// Seed used when the query has no usable one: current time in nanoseconds.
fn default_seed() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

fn client_key(peer: SocketAddr, headers: &HeaderMap, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get(FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if let Some(forwarded) = forwarded {
            return forwarded.to_string();
        }
    }
    peer.ip().to_string()
}
