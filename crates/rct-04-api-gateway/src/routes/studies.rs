//! Study management: the study itself, its treatment arms, its
//! data-collection variables, and its site assignments.
//!
//! Ownership rules (a study manager operates only on studies they created)
//! live in the registry service; the handlers just pass the actor through.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use shared_types::{Actor, SiteId, Study, StudyId, StudySiteLink, StudyVariable, TreatmentArm};

use crate::domain::error::ApiError;
use crate::router::AppState;

/// `POST /api/studies`
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(new): Json<rct_01_trial_registry::NewStudy>,
) -> Result<(StatusCode, Json<Study>), ApiError> {
    let study = state.registry.create_study(actor, new)?;
    Ok((StatusCode::CREATED, Json(study)))
}

/// `GET /api/studies` — study managers see only their own studies.
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<Study>>, ApiError> {
    Ok(Json(state.registry.list_studies(actor)?))
}

/// `GET /api/studies/:id`
pub async fn get(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(study_id): Path<u64>,
) -> Result<Json<Study>, ApiError> {
    Ok(Json(state.registry.get_study(actor, StudyId(study_id))?))
}

/// `PUT /api/studies/:id`
pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(study_id): Path<u64>,
    Json(patch): Json<rct_01_trial_registry::StudyPatch>,
) -> Result<Json<Study>, ApiError> {
    let study = state
        .registry
        .update_study(actor, StudyId(study_id), patch)?;
    Ok(Json(study))
}

/// `DELETE /api/studies/:id` — removes the study with its arms and links.
pub async fn remove(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(study_id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.registry.delete_study(actor, StudyId(study_id))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AssignSiteRequest {
    pub study_id: StudyId,
    pub site_id: SiteId,
}

/// `POST /api/studies/assign` — links a site to a study.
pub async fn assign_site(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<AssignSiteRequest>,
) -> Result<(StatusCode, Json<StudySiteLink>), ApiError> {
    let link = state
        .registry
        .assign_site(actor, request.study_id, request.site_id)?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// `POST /api/studies/:id/arms`
pub async fn add_arm(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(study_id): Path<u64>,
    Json(new): Json<rct_01_trial_registry::NewArm>,
) -> Result<(StatusCode, Json<TreatmentArm>), ApiError> {
    let arm = state.registry.add_arm(actor, StudyId(study_id), new)?;
    Ok((StatusCode::CREATED, Json(arm)))
}

/// `GET /api/studies/:id/arms`
pub async fn arms(
    State(state): State<AppState>,
    Path(study_id): Path<u64>,
) -> Result<Json<Vec<TreatmentArm>>, ApiError> {
    Ok(Json(state.registry.arms(StudyId(study_id))?))
}

/// `POST /api/studies/:id/variables`
pub async fn define_variable(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(study_id): Path<u64>,
    Json(new): Json<rct_01_trial_registry::NewVariable>,
) -> Result<(StatusCode, Json<StudyVariable>), ApiError> {
    let variable = state
        .registry
        .define_variable(actor, StudyId(study_id), new)?;
    Ok((StatusCode::CREATED, Json(variable)))
}

/// `GET /api/studies/:id/variables`
pub async fn variables(
    State(state): State<AppState>,
    Path(study_id): Path<u64>,
) -> Result<Json<Vec<StudyVariable>>, ApiError> {
    Ok(Json(state.registry.variables(StudyId(study_id))?))
}
