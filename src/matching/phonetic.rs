//! Coarse pronunciation-class encoding.
//!
//! Soundex codes bucket tokens that are spelled differently but sound
//! alike ("smith"/"smyth"). The code is only ever a bonus signal in the
//! blended score, never the sole basis for a match.

use std::fmt;

use rphonetic::{Encoder, Soundex};

/// Pronunciation-class code for a single token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhoneticCode {
    /// The fixed code for an empty token; never equal to any real code
    Empty,
    /// Soundex class, or the literal token when nothing was encodable
    Code(String),
}

impl PhoneticCode {
    /// True for the empty-token code
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Total-function phonetic encoder over arbitrary tokens.
pub struct PhoneticEncoder {
    soundex: Soundex,
}

impl PhoneticEncoder {
    /// Create an encoder with the standard Soundex mapping
    pub fn new() -> Self {
        Self {
            soundex: Soundex::default(),
        }
    }

    /// Encode one token.
    ///
    /// Total over any input: the empty token maps to the distinct
    /// [`PhoneticCode::Empty`], and a token with no ASCII letters keeps its
    /// literal text as its code so unrelated unencodable tokens never
    /// collide.
    pub fn encode(&self, token: &str) -> PhoneticCode {
        if token.is_empty() {
            return PhoneticCode::Empty;
        }

        let letters: String = token.chars().filter(char::is_ascii_alphabetic).collect();
        if letters.is_empty() {
            return PhoneticCode::Code(token.to_ascii_lowercase());
        }

        PhoneticCode::Code(self.soundex.encode(&letters))
    }
}

impl Default for PhoneticEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PhoneticEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhoneticEncoder").finish()
    }
}
