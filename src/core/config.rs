//! Configuration types and management for heimdall-rs.
//!
//! Every knob of the screening formula lives here as named configuration:
//! the flagging threshold, the matching mode, the metric weights and bonus
//! constants, and the normalizer's honorific and spelling-variant tables.
//! Formula variants seen in the wild become configuration, not code forks.

use std::collections::HashMap;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::core::errors::{HeimdallError, Result};

/// Matching mode for a screening run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// One record per query: the highest-scoring reference, kept regardless
    /// of the threshold (the threshold only drives the `flagged` field)
    BestMatchOnly,
    /// One record per (query, reference) pair scoring at or above the
    /// threshold
    AllAboveThreshold,
}

/// Main configuration for the screening engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    /// Minimum score for a match to be flagged, in [0, 100]
    pub threshold: f64,

    /// Matching mode
    pub mode: MatchMode,

    /// Token similarity weights and bonus constants
    pub weights: ScoringWeights,

    /// Name normalization settings
    pub normalizer: NormalizerConfig,

    /// Worker threads for parallel scoring (0 = available compute units)
    pub workers: usize,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            threshold: 70.0,
            mode: MatchMode::BestMatchOnly,
            weights: ScoringWeights::default(),
            normalizer: NormalizerConfig::default(),
            workers: 0,
        }
    }
}

impl ScreeningConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            HeimdallError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            HeimdallError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=100.0).contains(&self.threshold) {
            return Err(HeimdallError::config_field(
                format!(
                    "threshold must be between 0.0 and 100.0, got {}",
                    self.threshold
                ),
                "threshold",
            ));
        }

        self.weights.validate()?;
        self.normalizer.validate()?;

        Ok(())
    }
}

/// Weights and bonus constants for the blended token score
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Weight applied to the normalized edit-distance ratio
    pub edit_weight: f64,

    /// Weight applied to the prefix-weighted (Jaro-Winkler) similarity
    pub prefix_weight: f64,

    /// Additive bonus when two tokens share a phonetic class
    pub phonetic_bonus: f64,

    /// Additive bonus when one token contains the other
    pub containment_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            edit_weight: 0.4,
            prefix_weight: 0.5,
            phonetic_bonus: 20.0,
            containment_bonus: 10.0,
        }
    }
}

impl ScoringWeights {
    /// Validate weights configuration
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in [
            ("weights.edit_weight", self.edit_weight),
            ("weights.prefix_weight", self.prefix_weight),
        ] {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(HeimdallError::config_field(
                    format!("{name} must be between 0.0 and 1.0, got {weight}"),
                    name,
                ));
            }
        }

        for (name, bonus) in [
            ("weights.phonetic_bonus", self.phonetic_bonus),
            ("weights.containment_bonus", self.containment_bonus),
        ] {
            if !bonus.is_finite() || !(0.0..=50.0).contains(&bonus) {
                return Err(HeimdallError::config_field(
                    format!("{name} must be between 0.0 and 50.0, got {bonus}"),
                    name,
                ));
            }
        }

        Ok(())
    }
}

/// Built-in canonicalization table for common transliteration variants.
/// Values must be fixed points: no value is itself remapped.
static DEFAULT_SPELLING_VARIANTS: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let pairs = [
        ("mohammed", "muhammad"),
        ("mohamed", "muhammad"),
        ("mohammad", "muhammad"),
        ("muhammed", "muhammad"),
        ("ahmed", "ahmad"),
        ("ahmet", "ahmad"),
        ("abdel", "abdul"),
        ("abdoul", "abdul"),
        ("husain", "hussein"),
        ("hussain", "hussein"),
        ("usama", "osama"),
        ("oussama", "osama"),
        ("yousef", "yusuf"),
        ("youssef", "yusuf"),
        ("aleksandr", "alexander"),
        ("alexandre", "alexander"),
    ];

    pairs
        .into_iter()
        .map(|(variant, canonical)| (variant.to_string(), canonical.to_string()))
        .collect()
});

/// Name normalization settings: honorific prefixes to drop and the
/// spelling-variant substitution table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Honorific tokens removed during normalization (lowercase)
    pub honorifics: Vec<String>,

    /// Variant-spelling substitutions applied per token (lowercase)
    pub spelling_variants: HashMap<String, String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            honorifics: vec![
                "mr".to_string(),
                "mrs".to_string(),
                "ms".to_string(),
                "dr".to_string(),
                "prof".to_string(),
            ],
            spelling_variants: DEFAULT_SPELLING_VARIANTS.clone(),
        }
    }
}

impl NormalizerConfig {
    /// Validate normalizer configuration
    pub fn validate(&self) -> Result<()> {
        for honorific in &self.honorifics {
            if !Self::is_canonical_token(honorific) {
                return Err(HeimdallError::config_field(
                    format!("honorific {honorific:?} must be a single lowercase token"),
                    "normalizer.honorifics",
                ));
            }
        }

        for (variant, canonical) in &self.spelling_variants {
            if !Self::is_canonical_token(variant) || !Self::is_canonical_token(canonical) {
                return Err(HeimdallError::config_field(
                    format!("substitution {variant:?} -> {canonical:?} must map single lowercase tokens"),
                    "normalizer.spelling_variants",
                ));
            }

            // Normalization applies the table once; a value that is itself
            // remapped (or removed as an honorific) would break idempotence.
            if let Some(next) = self.spelling_variants.get(canonical) {
                if next != canonical {
                    return Err(HeimdallError::config_field(
                        format!(
                            "substitution target {canonical:?} is remapped to {next:?}; table must be idempotent"
                        ),
                        "normalizer.spelling_variants",
                    ));
                }
            }
            if self.honorifics.iter().any(|h| h == canonical) {
                return Err(HeimdallError::config_field(
                    format!("substitution target {canonical:?} collides with an honorific"),
                    "normalizer.spelling_variants",
                ));
            }
        }

        Ok(())
    }

    fn is_canonical_token(token: &str) -> bool {
        !token.is_empty()
            && token
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    }
}
