//! # Full-Stack Randomization Flows
//!
//! Wires the real registry, ledger, and randomization service together via
//! the gateway adapters — the same assembly the HTTP server uses, minus the
//! HTTP layer — and drives complete randomization scenarios through it.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rct_01_trial_registry::{
        InMemorySiteStore, InMemoryStudyStore, InMemoryVariableStore, NewArm, NewStudy,
        RegistryService, SystemClock,
    };
    use rct_02_assignment_ledger::{AuditRecorder, InMemoryAssignmentStore};
    use rct_03_randomization::{
        RandomizationError, RandomizationService, RandomizeRequest,
    };
    use rct_04_api_gateway::adapters::{RecorderLedger, RegistryResolver};
    use shared_types::{
        Actor, PatientId, Role, SiteId, StratificationValues, StudyId, UserId,
    };

    type Registry = RegistryService<
        Arc<InMemoryStudyStore>,
        Arc<InMemorySiteStore>,
        Arc<InMemoryVariableStore>,
        SystemClock,
    >;
    type Randomizer = RandomizationService<
        RegistryResolver<
            Arc<InMemoryStudyStore>,
            Arc<InMemorySiteStore>,
            Arc<InMemoryVariableStore>,
            SystemClock,
        >,
        RecorderLedger<Arc<InMemoryAssignmentStore>, SystemClock>,
    >;

    struct Stack {
        registry: Arc<Registry>,
        recorder: Arc<AuditRecorder<Arc<InMemoryAssignmentStore>>>,
        randomizer: Randomizer,
    }

    fn stack(seed: u64) -> Stack {
        let registry = Arc::new(RegistryService::new(
            Arc::new(InMemoryStudyStore::new()),
            Arc::new(InMemorySiteStore::new()),
            Arc::new(InMemoryVariableStore::new()),
            SystemClock,
        ));
        let recorder = Arc::new(AuditRecorder::new(Arc::new(InMemoryAssignmentStore::new())));
        let randomizer = RandomizationService::new(
            RegistryResolver::new(Arc::clone(&registry)),
            RecorderLedger::new(Arc::clone(&recorder), SystemClock),
            Some(seed),
        );
        Stack {
            registry,
            recorder,
            randomizer,
        }
    }

    fn admin() -> Actor {
        Actor::new(UserId(1), Role::Admin)
    }

    fn new_study(name: &str, randomization_type: &str) -> NewStudy {
        NewStudy {
            name: name.to_string(),
            protocol_number: None,
            irb_number: None,
            start_date: None,
            end_date: None,
            randomization_type: randomization_type.to_string(),
            is_randomized: true,
            block_size: None,
            stratification_factors: Vec::new(),
        }
    }

    /// Creates a randomized study with the named 1:1 arms, returning its id.
    fn study_with_arms(stack: &Stack, randomization_type: &str, arms: &[&str]) -> StudyId {
        let study = stack
            .registry
            .create_study(admin(), new_study("Trial", randomization_type))
            .unwrap();
        for name in arms {
            stack
                .registry
                .add_arm(
                    admin(),
                    study.id,
                    NewArm {
                        name: name.to_string(),
                        allocation_ratio: None,
                    },
                )
                .unwrap();
        }
        study.id
    }

    fn request(study_id: StudyId, patient: u64, site: Option<u64>) -> RandomizeRequest {
        RandomizeRequest {
            study_id,
            patient_id: PatientId(patient),
            site_id: site.map(SiteId),
            stratification_values: StratificationValues::new(),
        }
    }

    #[test]
    fn test_cluster_site_arm_sticks_across_1000_calls() {
        let stack = stack(17);
        let study_id = study_with_arms(&stack, "cluster", &["A", "B"]);

        let first = stack
            .randomizer
            .randomize(request(study_id, 1, Some(7)), UserId(1))
            .unwrap();
        assert!(["A", "B"].contains(&first.arm.name.as_str()));

        for patient in 2..=1000 {
            let outcome = stack
                .randomizer
                .randomize(request(study_id, patient, Some(7)), UserId(1))
                .unwrap();
            assert_eq!(
                outcome.arm.name, first.arm.name,
                "patient {} broke site stickiness",
                patient
            );
        }
    }

    #[test]
    fn test_end_to_end_cluster_scenario() {
        // Cluster study, arms A and B at 1:1, no prior records for site 7:
        // the first call fixes the arm, the second (different patient)
        // reuses it.
        let stack = stack(3);
        let study_id = study_with_arms(&stack, "cluster", &["A", "B"]);

        let first = stack
            .randomizer
            .randomize(request(study_id, 100, Some(7)), UserId(2))
            .unwrap();
        assert!(["A", "B"].contains(&first.arm.name.as_str()));

        let second = stack
            .randomizer
            .randomize(request(study_id, 101, Some(7)), UserId(2))
            .unwrap();
        assert_eq!(second.arm.name, first.arm.name);
    }

    #[test]
    fn test_every_call_leaves_an_audit_record() {
        let stack = stack(5);
        let study_id = study_with_arms(&stack, "cluster", &["A", "B"]);

        for patient in 1..=4 {
            stack
                .randomizer
                .randomize(request(study_id, patient, Some(9)), UserId(3))
                .unwrap();
        }

        let history = stack.recorder.site_history(SiteId(9)).unwrap();
        assert_eq!(history.len(), 4);
        // Reused assignments are still individually recorded, all naming
        // the same arm.
        assert!(history.iter().all(|r| r.arm_name == history[0].arm_name));
        assert!(history.iter().all(|r| r.recorded_by == UserId(3)));

        let patient_history = stack.recorder.patient_history(PatientId(2)).unwrap();
        assert_eq!(patient_history.len(), 1);
        assert_eq!(patient_history[0].site_id, Some(SiteId(9)));
    }

    #[test]
    fn test_distinct_sites_randomize_independently() {
        let stack = stack(29);
        let study_id = study_with_arms(&stack, "cluster", &["A", "B"]);

        // Fix arms for many sites; each site must stay internally
        // consistent regardless of what the others drew.
        for site in 1..=20 {
            let first = stack
                .randomizer
                .randomize(request(study_id, site * 100, Some(site)), UserId(1))
                .unwrap();
            let again = stack
                .randomizer
                .randomize(request(study_id, site * 100 + 1, Some(site)), UserId(1))
                .unwrap();
            assert_eq!(first.arm.name, again.arm.name, "site {} drifted", site);
        }
    }

    #[test]
    fn test_unrandomized_study_is_refused() {
        let stack = stack(0);
        let study = stack
            .registry
            .create_study(
                admin(),
                NewStudy {
                    is_randomized: false,
                    ..new_study("Observational", "none")
                },
            )
            .unwrap();

        let result = stack
            .randomizer
            .randomize(request(study.id, 1, None), UserId(1));
        assert!(matches!(
            result,
            Err(RandomizationError::NotRandomized { .. })
        ));
    }

    #[test]
    fn test_armless_study_is_refused() {
        let stack = stack(0);
        let study = stack
            .registry
            .create_study(admin(), new_study("Armless", "simple"))
            .unwrap();

        let result = stack
            .randomizer
            .randomize(request(study.id, 1, None), UserId(1));
        assert!(matches!(
            result,
            Err(RandomizationError::NoArmsDefined { .. })
        ));
    }

    #[test]
    fn test_unknown_strategy_is_refused() {
        let stack = stack(0);
        let study_id = study_with_arms(&stack, "quantum", &["A"]);

        let result = stack
            .randomizer
            .randomize(request(study_id, 1, None), UserId(1));
        match result {
            Err(RandomizationError::UnsupportedRandomizationType { type_name }) => {
                assert_eq!(type_name, "quantum");
            }
            other => panic!("Expected UnsupportedRandomizationType, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_study_is_refused() {
        let stack = stack(0);
        let result = stack
            .randomizer
            .randomize(request(StudyId(404), 1, None), UserId(1));
        assert!(matches!(result, Err(RandomizationError::NotFound { .. })));
    }

    #[test]
    fn test_registry_resolve_is_idempotent() {
        let stack = stack(0);
        let study_id = study_with_arms(&stack, "block", &["A", "B", "C"]);

        let (config_a, arms_a) = stack.registry.resolve(study_id).unwrap();
        let (config_b, arms_b) = stack.registry.resolve(study_id).unwrap();
        assert_eq!(config_a, config_b);
        assert_eq!(arms_a, arms_b);
    }

    #[test]
    fn test_stratification_values_are_recorded_with_the_decision() {
        let stack = stack(8);
        let study_id = study_with_arms(&stack, "stratified", &["A", "B"]);

        let mut values = StratificationValues::new();
        values.insert("sex".to_string(), "F".to_string());
        values.insert("site_tier".to_string(), "urban".to_string());

        let outcome = stack
            .randomizer
            .randomize(
                RandomizeRequest {
                    study_id,
                    patient_id: PatientId(1),
                    site_id: None,
                    stratification_values: values.clone(),
                },
                UserId(4),
            )
            .unwrap();
        assert_eq!(outcome.record.stratification_values, values);

        let history = stack.recorder.patient_history(PatientId(1)).unwrap();
        assert_eq!(history[0].stratification_values, values);
    }
}
