//! Clinical site management (admin only; enforced by the registry service).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use shared_types::{Actor, Site, SiteId};

use crate::domain::error::ApiError;
use crate::router::AppState;

/// `POST /api/sites`
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(new): Json<rct_01_trial_registry::NewSite>,
) -> Result<(StatusCode, Json<Site>), ApiError> {
    let site = state.registry.create_site(actor, new)?;
    Ok((StatusCode::CREATED, Json(site)))
}

/// `GET /api/sites`
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<Site>>, ApiError> {
    Ok(Json(state.registry.list_sites(actor)?))
}

/// `PUT /api/sites/:id`
pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(site_id): Path<u64>,
    Json(patch): Json<rct_01_trial_registry::SitePatch>,
) -> Result<Json<Site>, ApiError> {
    let site = state.registry.update_site(actor, SiteId(site_id), patch)?;
    Ok(Json(site))
}

/// `DELETE /api/sites/:id` — refused while any study links to the site.
pub async fn remove(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(site_id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.registry.delete_site(actor, SiteId(site_id))?;
    Ok(StatusCode::NO_CONTENT)
}
