//! # Arm Assignment
//!
//! Pure decision logic mapping a study's configuration, its arms, and the
//! relevant assignment history to exactly one treatment arm.
//!
//! ## Strategies
//!
//! - `simple`: uniform choice among arms; allocation ratios are ignored.
//! - `block`: weighted pool where each arm appears `allocation_ratio`
//!   times, shuffled, first element taken. Selection probability is
//!   `ratio / sum(ratios)` per call. This is deliberately *not* true
//!   fixed-block permutation balancing: there is no running deficit across
//!   a block, every call stands alone, and `block_size` is not consulted.
//! - `stratified`: same weighted pool, uniform pick from the expanded
//!   pool. Stratification values are captured by the caller for the audit
//!   record; they do not alter selection probabilities.
//! - `cluster`: the unit of randomization is the site. The site's first
//!   recorded arm is permanent; later calls reuse it by name.
//!
//! Unknown strategy values fail with `UnsupportedRandomizationType` —
//! misconfiguration is surfaced, never coerced to a default strategy.

use rand::seq::SliceRandom;
use rand::Rng;
use shared_types::{
    AssignmentRecord, PatientId, RandomizationConfig, RandomizationType, SiteId,
    StratificationValues, TreatmentArm,
};

use crate::domain::errors::RandomizationError;

/// Assigns a patient to a treatment arm.
///
/// Pure: the only inputs are the arguments, the only output is the return
/// value. Persistence of the decision is the caller's responsibility.
///
/// `history` is the assignment history relevant to this call — for the
/// cluster strategy, the records of `site_id`. Other strategies never read
/// it. `patient_id` and `stratification_values` identify and annotate the
/// decision for the caller's audit record; selection does not consult them.
///
/// ## Errors
///
/// - `NoArmsDefined`: `arms` is empty
/// - `NotFound`: cluster strategy without a site id
/// - `StaleClusterAssignment`: the site's recorded arm is gone from `arms`
/// - `UnsupportedRandomizationType`: unrecognised strategy value
/// - `AssignmentFailed`: no arm resolved (e.g. an all-zero weighted pool)
pub fn assign<R: Rng + ?Sized>(
    config: &RandomizationConfig,
    arms: &[TreatmentArm],
    _patient_id: PatientId,
    site_id: Option<SiteId>,
    _stratification_values: &StratificationValues,
    history: &[AssignmentRecord],
    rng: &mut R,
) -> Result<TreatmentArm, RandomizationError> {
    if arms.is_empty() {
        return Err(RandomizationError::NoArmsDefined {
            study_id: config.study_id,
        });
    }

    match RandomizationType::parse(&config.randomization_type) {
        Some(RandomizationType::Simple) => arms
            .choose(rng)
            .cloned()
            .ok_or(RandomizationError::AssignmentFailed),

        Some(RandomizationType::Block) => {
            let mut pool = weighted_pool(arms);
            pool.shuffle(rng);
            pool.into_iter()
                .next()
                .ok_or(RandomizationError::AssignmentFailed)
        }

        Some(RandomizationType::Stratified) => {
            let pool = weighted_pool(arms);
            pool.choose(rng)
                .cloned()
                .ok_or(RandomizationError::AssignmentFailed)
        }

        Some(RandomizationType::Cluster) => {
            let site_id = site_id.ok_or(RandomizationError::NotFound { resource: "site" })?;
            assign_cluster(arms, site_id, history, rng)
        }

        // "none" and unrecognised values alike: the study is flagged as
        // randomized but carries no usable strategy.
        Some(RandomizationType::None) | None => {
            Err(RandomizationError::UnsupportedRandomizationType {
                type_name: config.randomization_type.clone(),
            })
        }
    }
}

/// Cluster strategy: reuse the site's recorded arm, or fix a fresh one.
fn assign_cluster<R: Rng + ?Sized>(
    arms: &[TreatmentArm],
    site_id: SiteId,
    history: &[AssignmentRecord],
    rng: &mut R,
) -> Result<TreatmentArm, RandomizationError> {
    let prior = history
        .iter()
        .find(|record| record.site_id == Some(site_id));

    match prior {
        Some(record) => arms
            .iter()
            .find(|arm| arm.name == record.arm_name)
            .cloned()
            .ok_or_else(|| RandomizationError::StaleClusterAssignment {
                site_id,
                arm_name: record.arm_name.clone(),
            }),
        None => arms
            .choose(rng)
            .cloned()
            .ok_or(RandomizationError::AssignmentFailed),
    }
}

/// Expands arms into a pool where each arm appears `allocation_ratio` times.
fn weighted_pool(arms: &[TreatmentArm]) -> Vec<TreatmentArm> {
    arms.iter()
        .flat_map(|arm| std::iter::repeat(arm.clone()).take(arm.allocation_ratio as usize))
        .collect()
}
