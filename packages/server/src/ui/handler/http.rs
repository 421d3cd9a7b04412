//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use kodama_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    infrastructure::dto::http::{NamespaceSummaryDto, SessionDetailDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Mounted namespaces and their connected sessions (for debugging)
pub async fn list_namespaces(State(state): State<Arc<AppState>>) -> Json<Vec<NamespaceSummaryDto>> {
    let mut summaries = Vec::new();

    for namespace in state.namespaces.paths() {
        let sessions = state
            .repository
            .list_sessions(&namespace)
            .await
            .into_iter()
            .map(|session| SessionDetailDto {
                sid: session.id.as_str().to_string(),
                connected_at: timestamp_to_jst_rfc3339(session.connected_at.value()),
            })
            .collect();

        summaries.push(NamespaceSummaryDto {
            namespace: namespace.as_str().to_string(),
            sessions,
        });
    }

    Json(summaries)
}
