//! HTTP server shipping codec-encoded weapon lists per regulation version.
//!
//! Every registered version is decoded and encoded once at startup; requests only
//! read that state.

use crate::codec::encode_weapons_string;
use crate::registry::{load_regulation_data, LoadError, Registry};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionInfo {
    pub id: String,
    pub name: String,
    pub weapons: usize,
}

#[derive(Debug, Default)]
pub struct ServerState {
    pub versions: Vec<VersionInfo>,
    encoded: HashMap<String, String>,
}

impl ServerState {
    pub fn build(registry: &Registry) -> Result<Self, String> {
        let mut state = ServerState::default();
        for version in &registry.versions {
            let regulation = load_regulation_data(registry, &version.id)
                .map_err(|e: LoadError| e.to_string())?;
            let encoded = encode_weapons_string(&regulation.weapons).map_err(|e| e.to_string())?;
            state.versions.push(VersionInfo {
                id: version.id.clone(),
                name: version.name.clone(),
                weapons: regulation.weapons.len(),
            });
            state.encoded.insert(version.id.clone(), encoded);
        }
        Ok(state)
    }

    pub fn weapons_json(&self, version_id: &str) -> Option<&str> {
        self.encoded.get(version_id).map(String::as_str)
    }
}

async fn list_versions(State(state): State<Arc<ServerState>>) -> Json<Vec<VersionInfo>> {
    Json(state.versions.clone())
}

async fn version_weapons(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.weapons_json(&id) {
        Some(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            format!("unknown regulation version: {}", id),
        ),
    }
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/versions", get(list_versions))
        .route("/versions/:id/weapons", get(version_weapons))
        .with_state(state)
}

pub async fn serve(registry: &Registry, addr: SocketAddr) -> Result<(), String> {
    let state = Arc::new(ServerState::build(registry)?);
    tracing::info!(versions = state.versions.len(), %addr, "serving regulation data");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| e.to_string())?;
    axum::serve(listener, router(state))
        .await
        .map_err(|e| e.to_string())
}
