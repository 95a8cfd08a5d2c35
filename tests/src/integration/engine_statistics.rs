//! # Selection-Frequency Convergence
//!
//! Statistical properties of the pure engine under each strategy, sampled
//! with a seeded generator so failures reproduce exactly:
//!
//! - `simple`: uniform 1/N per arm, allocation ratios ignored
//! - `block` and `stratified`: frequency proportional to allocation ratio

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rct_03_randomization::engine;
    use shared_types::{
        ArmId, PatientId, RandomizationConfig, StratificationValues, StudyId, TreatmentArm,
    };
    use std::collections::HashMap;

    const TRIALS: usize = 10_000;
    const TOLERANCE: f64 = 0.03;

    fn config(randomization_type: &str) -> RandomizationConfig {
        RandomizationConfig {
            study_id: StudyId(1),
            randomization_type: randomization_type.to_string(),
            block_size: None,
            stratification_factors: Vec::new(),
        }
    }

    fn arm(id: u64, name: &str, ratio: u32) -> TreatmentArm {
        TreatmentArm {
            id: ArmId(id),
            study_id: StudyId(1),
            name: name.to_string(),
            allocation_ratio: ratio,
        }
    }

    /// Runs `TRIALS` assignments and returns each arm's selection fraction.
    fn frequencies(
        strategy: &str,
        arms: &[TreatmentArm],
        values: &StratificationValues,
        seed: u64,
    ) -> HashMap<String, f64> {
        let config = config(strategy);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut counts: HashMap<String, usize> = HashMap::new();

        for patient in 0..TRIALS {
            let chosen = engine::assign(
                &config,
                arms,
                PatientId(patient as u64),
                None,
                values,
                &[],
                &mut rng,
            )
            .expect("assignment should succeed");
            *counts.entry(chosen.name).or_default() += 1;
        }

        counts
            .into_iter()
            .map(|(name, count)| (name, count as f64 / TRIALS as f64))
            .collect()
    }

    fn assert_close(freq: &HashMap<String, f64>, name: &str, expected: f64) {
        let actual = freq.get(name).copied().unwrap_or(0.0);
        assert!(
            (actual - expected).abs() <= TOLERANCE,
            "arm {}: expected {:.2} ± {:.2}, observed {:.4}",
            name,
            expected,
            TOLERANCE,
            actual
        );
    }

    #[test]
    fn test_simple_converges_to_uniform() {
        // Deliberately unequal ratios: simple must ignore them.
        let arms = [arm(1, "A", 5), arm(2, "B", 1), arm(3, "C", 2)];
        let freq = frequencies("simple", &arms, &StratificationValues::new(), 11);

        for name in ["A", "B", "C"] {
            assert_close(&freq, name, 1.0 / 3.0);
        }
    }

    #[test]
    fn test_block_converges_to_allocation_ratios() {
        let arms = [arm(1, "A", 2), arm(2, "B", 1), arm(3, "C", 1)];
        let freq = frequencies("block", &arms, &StratificationValues::new(), 22);

        assert_close(&freq, "A", 0.50);
        assert_close(&freq, "B", 0.25);
        assert_close(&freq, "C", 0.25);
    }

    #[test]
    fn test_stratified_converges_to_allocation_ratios() {
        let arms = [arm(1, "A", 2), arm(2, "B", 1), arm(3, "C", 1)];
        let freq = frequencies("stratified", &arms, &StratificationValues::new(), 33);

        assert_close(&freq, "A", 0.50);
        assert_close(&freq, "B", 0.25);
        assert_close(&freq, "C", 0.25);
    }

    #[test]
    fn test_stratification_values_do_not_shift_probabilities() {
        // Values are audit annotations only; the distribution must match the
        // unstratified run under the same seed.
        let arms = [arm(1, "A", 2), arm(2, "B", 1), arm(3, "C", 1)];
        let mut values = StratificationValues::new();
        values.insert("sex".to_string(), "F".to_string());
        values.insert("age_group".to_string(), "18-35".to_string());

        let with_values = frequencies("stratified", &arms, &values, 44);
        let without = frequencies("stratified", &arms, &StratificationValues::new(), 44);
        assert_eq!(with_values, without);
    }

    #[test]
    fn test_two_arm_simple_split() {
        let arms = [arm(1, "Treatment", 1), arm(2, "Control", 1)];
        let freq = frequencies("simple", &arms, &StratificationValues::new(), 55);

        assert_close(&freq, "Treatment", 0.50);
        assert_close(&freq, "Control", 0.50);
    }
}
