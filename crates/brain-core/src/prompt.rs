//! System prompt fingerprints for logs.

use std::fmt::Write;

use sha2::{Digest, Sha256};

/// Hex characters kept by [`prompt_fingerprint`].
pub const FINGERPRINT_LEN: usize = 12;

/// SHA-256 of a prompt as lowercase hex.
pub fn hash_prompt(prompt: &str) -> String {
    Sha256::digest(prompt.as_bytes())
        .iter()
        .fold(String::with_capacity(64), |mut hex, byte| {
            let _ = write!(hex, "{:02x}", byte);
            hex
        })
}

/// Short, stable tag for a prompt. Two turns with the same retrieved
/// context share a tag, so logs show context changes without the text.
pub fn prompt_fingerprint(prompt: &str) -> String {
    let mut hash = hash_prompt(prompt);
    hash.truncate(FINGERPRINT_LEN);
    hash
}
