//! Item name decoding.
//!
//! URLs carry item names in encoded form: percent-encoding from the browser,
//! plus site-specific character replacements (for example a space written
//! as `-`). Decoding undoes both, in that order.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One encode-time replacement: `find` was written as `replace_with`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameReplacement {
    pub find: String,
    pub replace_with: String,
}

/// Decodes encoded names and paths.
///
/// Pure: the same input always decodes to the same output.
#[derive(Debug, Clone, Default)]
pub struct NameDecoder {
    replacements: Vec<NameReplacement>,
}

impl NameDecoder {
    pub fn new(replacements: Vec<NameReplacement>) -> Self {
        // Empty patterns would match everywhere
        let replacements = replacements
            .into_iter()
            .filter(|r| !r.replace_with.is_empty())
            .collect();
        Self { replacements }
    }

    /// Decode a name or a whole path.
    ///
    /// Invalid UTF-8 after percent-decoding keeps the input as-is.
    pub fn decode(&self, encoded: &str) -> String {
        let decoded = percent_decode_str(encoded)
            .decode_utf8()
            .map(Cow::into_owned)
            .unwrap_or_else(|_| encoded.to_string());

        self.replacements
            .iter()
            .fold(decoded, |acc, r| acc.replace(&r.replace_with, &r.find))
    }
}
