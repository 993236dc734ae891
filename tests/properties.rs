//! Property tests: normalization idempotence, score bounds, and run
//! determinism over generated inputs.

use proptest::prelude::*;

use heimdall_rs::{
    MatchMode, Normalizer, ScoringWeights, ScreeningConfig, ScreeningEngine, SimilarityScorer,
};

proptest! {
    #[test]
    fn normalization_is_idempotent(raw in ".{0,60}") {
        let normalizer = Normalizer::default();
        let first = normalizer.normalize(&raw);
        let second = normalizer.normalize(&first.render());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn token_scores_stay_in_range(a in "[a-z0-9]{0,12}", b in "[a-z0-9]{0,12}") {
        let scorer = SimilarityScorer::new(ScoringWeights::default());
        let score = scorer.token_score(&a, &b);
        prop_assert!((0.0..=100.0).contains(&score), "{} / {} -> {}", a, b, score);
    }

    #[test]
    fn identical_variants_always_hit_the_ceiling(raw in "[a-z]{1,10}( [a-z]{1,10}){0,3}") {
        let normalizer = Normalizer::default();
        let scorer = SimilarityScorer::new(ScoringWeights::default());
        let name = normalizer.normalize(&raw);
        let variant = &name.variants()[0];
        if !variant.is_empty() {
            let score = scorer.variant_score(variant, variant);
            prop_assert!((score - 100.0).abs() < 1e-9, "{} -> {}", raw, score);
        }
    }

    #[test]
    fn empty_variant_scores_zero_against_anything(raw in ".{0,40}") {
        let normalizer = Normalizer::default();
        let scorer = SimilarityScorer::new(ScoringWeights::default());
        let empty = normalizer.normalize("");
        let other = normalizer.normalize(&raw);

        prop_assert_eq!(scorer.name_score(&empty, &other).score, 0.0);
        prop_assert_eq!(scorer.name_score(&other, &empty).score, 0.0);
    }

    #[test]
    fn screening_twice_is_byte_identical(
        queries in prop::collection::vec("[A-Za-z .@/-]{0,24}", 0..6),
        references in prop::collection::vec("[A-Za-z .@/-]{0,24}", 0..6),
    ) {
        let engine = ScreeningEngine::new(ScreeningConfig {
            threshold: 40.0,
            mode: MatchMode::AllAboveThreshold,
            ..ScreeningConfig::default()
        }).unwrap();

        let first = engine.screen(&queries, &references).unwrap();
        let second = engine.screen(&queries, &references).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn flag_matches_threshold_comparison(
        queries in prop::collection::vec("[A-Za-z ]{1,20}", 1..5),
        threshold in 0.0f64..=100.0,
    ) {
        let engine = ScreeningEngine::new(ScreeningConfig {
            threshold,
            mode: MatchMode::BestMatchOnly,
            ..ScreeningConfig::default()
        }).unwrap();

        let references = vec!["John Smith".to_string(), "Maria Garcia".to_string()];
        for record in engine.screen(&queries, &references).unwrap() {
            prop_assert_eq!(record.flagged, record.score >= threshold);
        }
    }
}
