//! Randomization and assignment-history endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;
use shared_types::{is_allowed, Actor, ArmId, AssignmentRecord, Operation, PatientId, SiteId};

use crate::domain::error::ApiError;
use crate::router::AppState;

#[derive(Debug, Serialize)]
pub struct RandomizeResponse {
    pub assigned_arm: String,
    pub treatment_arm_id: ArmId,
}

/// `POST /api/randomize`
///
/// Body: `{study_id, patient_id, site_id?, stratification_values?}`.
/// Returns 201 with the chosen arm once the audit record is written; any
/// engine refusal surfaces as the mapped error status with no record.
pub async fn randomize(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<rct_03_randomization::RandomizeRequest>,
) -> Result<(StatusCode, Json<RandomizeResponse>), ApiError> {
    if !is_allowed(actor.role, Operation::Randomize) {
        return Err(ApiError::forbidden("Access denied"));
    }

    let outcome = state.randomizer.randomize(request, actor.user_id)?;
    Ok((
        StatusCode::CREATED,
        Json(RandomizeResponse {
            assigned_arm: outcome.arm.name,
            treatment_arm_id: outcome.arm.id,
        }),
    ))
}

/// `GET /api/patients/:id/assignments` — audit history for a patient.
pub async fn patient_assignments(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(patient_id): Path<u64>,
) -> Result<Json<Vec<AssignmentRecord>>, ApiError> {
    if !is_allowed(actor.role, Operation::ViewPatient) {
        return Err(ApiError::forbidden("Access denied"));
    }
    Ok(Json(
        state.recorder.patient_history(PatientId(patient_id))?,
    ))
}

/// `GET /api/sites/:id/assignments` — audit history for a site. Under the
/// cluster strategy this is the record that fixes the site's arm.
pub async fn site_assignments(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(site_id): Path<u64>,
) -> Result<Json<Vec<AssignmentRecord>>, ApiError> {
    if !is_allowed(actor.role, Operation::ViewPatient) {
        return Err(ApiError::forbidden("Access denied"));
    }
    Ok(Json(state.recorder.site_history(SiteId(site_id))?))
}
