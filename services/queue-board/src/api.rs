//! HTTP handlers for the dashboard.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use queue_board::api;
//! use std::sync::Arc;
//!
//! let app = api::router(Arc::new(registry));
//! axum::serve(listener, app).await?;
//! ```
//!
//! `GET /api/queues?mail=latest&video=failed&video=active` returns the
//! aggregate snapshot. Each query key names a queue; its value selects the
//! jobs listed for it.

use crate::error::BoardError;
use crate::queue::{JobFilter, LifecycleState};
use crate::registry::QueueRegistry;
use crate::snapshot::{aggregate, AggregateResult, QueueFilters};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Query value selecting jobs in every state.
pub const LATEST: &str = "latest";

/// Build the dashboard router over `registry`.
pub fn router(registry: Arc<QueueRegistry>) -> Router {
    Router::new()
        .route("/api/queues", get(queues))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}

/// Aggregate snapshot of every registered queue.
///
/// # Errors
///
/// Returns a 500 response if any backend read fails.
pub async fn queues(
    State(registry): State<Arc<QueueRegistry>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<AggregateResult>, BoardError> {
    let filters = parse_filters(&registry, params);
    let result = aggregate(&registry, &filters).await?;
    Ok(Json(result))
}

async fn health() -> &'static str {
    "ok"
}

/// Turn query pairs into per-queue job filters.
///
/// Values are split on `,`, so `mail=failed,completed` and
/// `mail=failed&mail=completed` mean the same. A lone `latest` selects every
/// state, a lone state name selects that state, and several values (or
/// `name[]=` keys) select a list of states. Unknown state names are dropped;
/// keys naming no registered queue are ignored.
#[must_use]
pub fn parse_filters(registry: &QueueRegistry, params: Vec<(String, String)>) -> QueueFilters {
    let mut grouped: Vec<(String, bool, Vec<String>)> = Vec::new();

    for (key, value) in params {
        let (name, is_list) = key
            .strip_suffix("[]")
            .map_or((key.as_str(), false), |name| (name, true));

        if registry.get(name).is_none() {
            debug!(queue = name, "Ignoring filter for unknown queue");
            continue;
        }

        let tokens = value
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        match grouped.iter_mut().find(|(existing, _, _)| existing == name) {
            Some((_, list, values)) => {
                *list |= is_list;
                values.extend(tokens);
            }
            None => grouped.push((name.to_string(), is_list, tokens.collect())),
        }
    }

    grouped
        .into_iter()
        .map(|(name, is_list, values)| {
            let filter = match values.as_slice() {
                [single] if !is_list && single == LATEST => JobFilter::Latest,
                [single] if !is_list => single.parse().map_or_else(
                    |_| {
                        debug!(queue = %name, state = %single, "Unknown job state in filter");
                        JobFilter::States(Vec::new())
                    },
                    JobFilter::State,
                ),
                _ => JobFilter::States(parse_states(&name, &values)),
            };
            (name, filter)
        })
        .collect()
}

fn parse_states(queue: &str, values: &[String]) -> Vec<LifecycleState> {
    values
        .iter()
        .filter_map(|value| match value.parse() {
            Ok(state) => Some(state),
            Err(err) => {
                debug!(queue, %err, "Dropping unknown job state from filter");
                None
            }
        })
        .collect()
}
