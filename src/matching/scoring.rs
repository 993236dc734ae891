//! Blended similarity scoring between normalized name variants.
//!
//! The token score blends a normalized edit-distance ratio with a
//! prefix-weighted (Jaro-Winkler) similarity and adds fixed bonuses for
//! phonetic equivalence and token containment; weights and bonuses come
//! from [`ScoringWeights`]. Variant scores aggregate token scores by
//! best-alignment, and name scores take the maximum over alias pairs.

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::core::config::ScoringWeights;
use crate::matching::normalize::{NameVariant, NormalizedName};
use crate::matching::phonetic::{PhoneticCode, PhoneticEncoder};

/// Maximum attainable similarity score.
pub const MAX_SCORE: f64 = 100.0;

/// Name-level scoring outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameScore {
    /// Blended similarity in [0, 100]
    pub score: f64,
    /// Index of the reference variant behind the maximal alias pair, when
    /// any pair scored above zero
    pub matched_variant: Option<usize>,
}

impl NameScore {
    fn zero() -> Self {
        Self {
            score: 0.0,
            matched_variant: None,
        }
    }
}

/// Weighted multi-metric similarity scorer.
#[derive(Debug)]
pub struct SimilarityScorer {
    weights: ScoringWeights,
    encoder: PhoneticEncoder,
}

impl SimilarityScorer {
    /// Create a scorer with the given weights
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            encoder: PhoneticEncoder::new(),
        }
    }

    /// The weights this scorer applies
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Blended similarity between two tokens, clamped to [0, 100].
    ///
    /// An empty token on either side scores 0 against everything.
    pub fn token_score(&self, a: &str, b: &str) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let edit_ratio = normalized_levenshtein(a, b) * 100.0;
        let prefix_sim = jaro_winkler(a, b) * 100.0;

        let mut score =
            self.weights.edit_weight * edit_ratio + self.weights.prefix_weight * prefix_sim;

        if self.phonetic_match(a, b) {
            score += self.weights.phonetic_bonus;
        }
        if a != b && (a.contains(b) || b.contains(a)) {
            score += self.weights.containment_bonus;
        }

        score.clamp(0.0, MAX_SCORE)
    }

    /// Similarity between two variants: the mean over the query variant's
    /// tokens of each token's best score against the reference tokens.
    ///
    /// Query-driven by design, and therefore asymmetric when the variants
    /// have different token counts: swapping the arguments can change the
    /// result. A variant with zero tokens on either side scores 0.
    pub fn variant_score(&self, query: &NameVariant, reference: &NameVariant) -> f64 {
        if query.is_empty() || reference.is_empty() {
            return 0.0;
        }

        let total: f64 = query
            .tokens()
            .iter()
            .map(|q| {
                reference
                    .tokens()
                    .iter()
                    .map(|r| self.token_score(q, r))
                    .fold(0.0, f64::max)
            })
            .sum();

        total / query.tokens().len() as f64
    }

    /// Name-level similarity: the maximum variant score over all
    /// (query variant, reference variant) alias pairs. Ties keep the
    /// earliest reference variant.
    pub fn name_score(&self, query: &NormalizedName, reference: &NormalizedName) -> NameScore {
        let mut best = NameScore::zero();
        for query_variant in query.variants() {
            for (index, reference_variant) in reference.variants().iter().enumerate() {
                let score = self.variant_score(query_variant, reference_variant);
                if score > best.score {
                    best = NameScore {
                        score,
                        matched_variant: Some(index),
                    };
                }
            }
        }
        best
    }

    fn phonetic_match(&self, a: &str, b: &str) -> bool {
        match (self.encoder.encode(a), self.encoder.encode(b)) {
            (PhoneticCode::Code(code_a), PhoneticCode::Code(code_b)) => code_a == code_b,
            _ => false,
        }
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::matching::normalize::Normalizer;

    fn variant(raw: &str) -> NameVariant {
        Normalizer::default().normalize(raw).variants()[0].clone()
    }

    #[test]
    fn identical_tokens_hit_the_ceiling() {
        let scorer = SimilarityScorer::default();
        assert_relative_eq!(scorer.token_score("smith", "smith"), MAX_SCORE);
    }

    #[test]
    fn identical_variants_score_one_hundred() {
        let scorer = SimilarityScorer::default();
        let a = variant("john smith");
        assert_relative_eq!(scorer.variant_score(&a, &a), MAX_SCORE);
    }

    #[test]
    fn empty_token_scores_zero() {
        let scorer = SimilarityScorer::default();
        assert_eq!(scorer.token_score("", "smith"), 0.0);
        assert_eq!(scorer.token_score("smith", ""), 0.0);
        assert_eq!(scorer.token_score("", ""), 0.0);
    }

    #[test]
    fn empty_variant_scores_zero_both_ways() {
        let scorer = SimilarityScorer::default();
        let empty = variant("");
        let full = variant("john smith");
        assert!(empty.is_empty());
        assert_eq!(scorer.variant_score(&empty, &full), 0.0);
        assert_eq!(scorer.variant_score(&full, &empty), 0.0);
        assert_eq!(scorer.variant_score(&empty, &empty), 0.0);
    }

    #[test]
    fn token_score_stays_bounded() {
        let scorer = SimilarityScorer::default();
        for (a, b) in [
            ("smith", "smyth"),
            ("jon", "john"),
            ("al", "alamin"),
            ("x", "x"),
        ] {
            let score = scorer.token_score(a, b);
            assert!((0.0..=MAX_SCORE).contains(&score), "{a}/{b} -> {score}");
        }
    }

    #[test]
    fn token_score_is_symmetric() {
        let scorer = SimilarityScorer::default();
        assert_relative_eq!(
            scorer.token_score("amin", "alamin"),
            scorer.token_score("alamin", "amin")
        );
    }

    #[test]
    fn variant_score_is_query_driven() {
        // One-token query against a two-token reference averages over the
        // single query token; the reverse direction averages over both.
        let scorer = SimilarityScorer::default();
        let short = variant("john");
        let long = variant("john smith");

        let forward = scorer.variant_score(&short, &long);
        let backward = scorer.variant_score(&long, &short);

        assert_relative_eq!(forward, MAX_SCORE);
        assert!(backward < forward);
    }

    #[test]
    fn phonetic_bonus_rewards_sound_alike_tokens() {
        let scorer = SimilarityScorer::default();
        let no_bonus = SimilarityScorer::new(ScoringWeights {
            phonetic_bonus: 0.0,
            ..ScoringWeights::default()
        });
        // smyth/smith share a Soundex class
        assert_relative_eq!(
            scorer.token_score("smyth", "smith") - no_bonus.token_score("smyth", "smith"),
            20.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn containment_bonus_rewards_substring_tokens() {
        let scorer = SimilarityScorer::default();
        let no_bonus = SimilarityScorer::new(ScoringWeights {
            containment_bonus: 0.0,
            ..ScoringWeights::default()
        });
        assert_relative_eq!(
            scorer.token_score("amin", "alamin") - no_bonus.token_score("amin", "alamin"),
            10.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn unrelated_names_stay_below_sanity_bound() {
        let scorer = SimilarityScorer::default();
        let a = variant("zzyzx qwghk vbnmt");
        let b = variant("eeoua illri puufs");
        assert!(scorer.variant_score(&a, &b) < 30.0);
    }

    #[test]
    fn multi_alias_name_takes_best_pair() {
        let scorer = SimilarityScorer::default();
        let normalizer = Normalizer::default();
        let query = normalizer.normalize("Maria Garcia / Maria G.");
        let reference = normalizer.normalize("Maria Garcia");

        let outcome = scorer.name_score(&query, &reference);
        assert_relative_eq!(outcome.score, MAX_SCORE);
        assert_eq!(outcome.matched_variant, Some(0));
    }

    #[test]
    fn zero_score_has_no_matched_variant() {
        let scorer = SimilarityScorer::default();
        let normalizer = Normalizer::default();
        let outcome = scorer.name_score(
            &normalizer.normalize(""),
            &normalizer.normalize("John Smith"),
        );
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.matched_variant, None);
    }
}
