//! Name canonicalization.
//!
//! Turns a raw name string into comparable alias variants: diacritics are
//! folded to ASCII, alias delimiters split the string into independent
//! variants, honorifics and punctuation are dropped, and known spelling
//! variants are rewritten to one canonical form. Normalization is a pure
//! function of its input and is idempotent over its own rendered output.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::core::config::NormalizerConfig;

/// Characters that separate bundled aliases inside one raw name field.
const ALIAS_SEPARATORS: [char; 3] = ['@', '/', '|'];

/// One normalized alias: a canonical token sequence plus the original
/// alias text retained for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameVariant {
    source: String,
    tokens: Vec<String>,
}

impl NameVariant {
    pub(crate) fn new(source: String, tokens: Vec<String>) -> Self {
        Self { source, tokens }
    }

    pub(crate) fn empty() -> Self {
        Self {
            source: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Original alias text (trimmed, diacritics folded, case preserved)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Canonical lowercase tokens
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// True when no tokens survived normalization
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Canonical rendering: tokens joined by single spaces
    pub fn render(&self) -> String {
        self.tokens.join(" ")
    }
}

// Matching identity is the token sequence; the retained source text is
// reporting metadata only.
impl PartialEq for NameVariant {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Eq for NameVariant {}

/// A raw name after normalization: one [`NameVariant`] per alias.
///
/// Always holds at least one variant; an unusable input yields a single
/// empty variant rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedName {
    variants: Vec<NameVariant>,
}

impl NormalizedName {
    /// The alias variants, in input order
    pub fn variants(&self) -> &[NameVariant] {
        &self.variants
    }

    /// True when no variant carries any tokens
    pub fn is_empty(&self) -> bool {
        self.variants.iter().all(NameVariant::is_empty)
    }

    /// Canonical rendering: variant renders joined by `" / "`, so that
    /// re-normalizing the rendered form reproduces this value
    pub fn render(&self) -> String {
        self.variants
            .iter()
            .map(NameVariant::render)
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Pure, deterministic name canonicalizer.
#[derive(Debug, Clone)]
pub struct Normalizer {
    honorifics: AHashSet<String>,
    spelling_variants: AHashMap<String, String>,
}

impl Normalizer {
    /// Build a normalizer from validated configuration
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            honorifics: config.honorifics.iter().cloned().collect(),
            spelling_variants: config
                .spelling_variants
                .iter()
                .map(|(variant, canonical)| (variant.clone(), canonical.clone()))
                .collect(),
        }
    }

    /// Canonicalize a raw name into its alias variants
    pub fn normalize(&self, raw: &str) -> NormalizedName {
        let folded = fold_to_ascii(raw);

        let mut variants: Vec<NameVariant> = Vec::new();
        for alias in folded.split(ALIAS_SEPARATORS) {
            let source = alias.trim();
            let tokens = self.tokenize(source);
            if !tokens.is_empty() {
                variants.push(NameVariant::new(source.to_string(), tokens));
            }
        }

        if variants.is_empty() {
            variants.push(NameVariant::empty());
        }

        NormalizedName { variants }
    }

    /// Canonicalize an optional raw name; `None` behaves as empty input
    pub fn normalize_opt(&self, raw: Option<&str>) -> NormalizedName {
        self.normalize(raw.unwrap_or(""))
    }

    fn tokenize(&self, alias: &str) -> Vec<String> {
        let mut cleaned = String::with_capacity(alias.len());
        for ch in alias.chars() {
            if ch.is_ascii_alphanumeric() {
                cleaned.push(ch.to_ascii_lowercase());
            } else {
                cleaned.push(' ');
            }
        }

        cleaned
            .split_whitespace()
            .filter(|token| !self.honorifics.contains(*token))
            .map(|token| match self.spelling_variants.get(token) {
                Some(canonical) => canonical.clone(),
                None => token.to_string(),
            })
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}

/// NFKD-decompose, drop combining marks, drop anything still non-ASCII.
fn fold_to_ascii(raw: &str) -> String {
    raw.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(char::is_ascii)
        .collect()
}
