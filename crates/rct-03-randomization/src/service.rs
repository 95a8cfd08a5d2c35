//! # Randomization Service
//!
//! Orchestrates one randomization decision end to end: resolve the study,
//! gather the relevant history, run the pure engine, persist the audit
//! record, return the outcome.
//!
//! The service owns the process-wide RNG behind a mutex; determinism in
//! tests comes from constructing with a fixed seed. The engine never sees
//! the mutex — it receives a plain `&mut impl Rng` per call.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use shared_types::{
    PatientId, RandomizationType, SiteId, StratificationValues, StudyId, TreatmentArm, UserId,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::engine;
use crate::domain::errors::RandomizationError;
use crate::ports::{AssignmentDecision, AssignmentLedger, StudyResolver};


/// One randomization request.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomizeRequest {
    pub study_id: StudyId,
    pub patient_id: PatientId,
    #[serde(default)]
    pub site_id: Option<SiteId>,
    #[serde(default)]
    pub stratification_values: StratificationValues,
}

/// The decision together with its persisted audit record.
#[derive(Debug, Clone)]
pub struct RandomizeOutcome {
    pub arm: TreatmentArm,
    pub record: shared_types::AssignmentRecord,
}

/// The randomization service.
pub struct RandomizationService<R, L>
where
    R: StudyResolver,
    L: AssignmentLedger,
{
    resolver: R,
    ledger: L,
    /// Per-site serialization for cluster read-or-create. First writer wins;
    /// later callers observe the recorded arm.
    site_locks: Mutex<HashMap<SiteId, Arc<Mutex<()>>>>,
    rng: Mutex<StdRng>,
}

impl<R, L> RandomizationService<R, L>
where
    R: StudyResolver,
    L: AssignmentLedger,
{
    /// Creates a service. Pass a seed for deterministic behavior in tests;
    /// production callers pass `None` for an entropy-seeded generator.
    pub fn new(resolver: R, ledger: L, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            resolver,
            ledger,
            site_locks: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Randomizes a patient into an arm of the given study and records the
    /// decision.
    ///
    /// ## Errors
    ///
    /// Any variant of [`RandomizationError`]; on failure nothing has been
    /// written — the record is appended only after the engine succeeds.
    pub fn randomize(
        &self,
        request: RandomizeRequest,
        actor: UserId,
    ) -> Result<RandomizeOutcome, RandomizationError> {
        let (config, arms) = self.resolver.resolve(request.study_id)?;

        // Cluster decisions for the same site must not interleave between
        // the history read and the record write, or two first-callers could
        // fix different arms for one site.
        let strategy = RandomizationType::parse(&config.randomization_type);
        let site_lock = match (strategy, request.site_id) {
            (Some(RandomizationType::Cluster), Some(site_id)) => Some(self.site_lock(site_id)),
            _ => None,
        };
        let _serialized = site_lock.as_ref().map(|lock| lock.lock());

        let history = match request.site_id {
            Some(site_id) => self.ledger.site_history(site_id)?,
            None => Vec::new(),
        };

        let arm = {
            let mut rng = self.rng.lock();
            engine::assign(
                &config,
                &arms,
                request.patient_id,
                request.site_id,
                &request.stratification_values,
                &history,
                &mut *rng,
            )
        };
        let arm = match arm {
            Ok(arm) => arm,
            Err(err) => {
                warn!(
                    study_id = %request.study_id,
                    patient_id = %request.patient_id,
                    error = %err,
                    "randomization refused"
                );
                return Err(err);
            }
        };

        let record = self.ledger.record(&AssignmentDecision {
            patient_id: request.patient_id,
            arm: arm.clone(),
            stratification_values: request.stratification_values,
            site_id: request.site_id,
            recorded_by: actor,
        })?;

        info!(
            study_id = %request.study_id,
            patient_id = %request.patient_id,
            arm = %arm.name,
            site_id = ?request.site_id,
            "patient randomized"
        );
        Ok(RandomizeOutcome { arm, record })
    }

    fn site_lock(&self, site_id: SiteId) -> Arc<Mutex<()>> {
        Arc::clone(
            self.site_locks
                .lock()
                .entry(site_id)
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}
