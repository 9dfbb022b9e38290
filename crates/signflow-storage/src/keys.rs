//! Object key generation.
//!
//! Key format: `{64 hex chars}.{ext}`, or just the hex part without an extension.

use rand::RngCore;

/// Random bytes per key; 256 bits makes collisions practically impossible.
const KEY_RANDOM_BYTES: usize = 32;
const MAX_EXTENSION_LEN: usize = 16;

/// Generate a unique object key that keeps the original extension.
pub fn generate_object_key(extension: Option<&str>) -> String {
    let mut random_bytes = [0u8; KEY_RANDOM_BYTES];
    rand::rng().fill_bytes(&mut random_bytes);
    let random_part = hex::encode(random_bytes);

    match extension.and_then(sanitize_extension) {
        Some(ext) => format!("{}.{}", random_part, ext),
        None => random_part,
    }
}

/// Keep only ASCII alphanumerics, lower-cased. Returns None if nothing usable is left.
fn sanitize_extension(extension: &str) -> Option<String> {
    let cleaned: String = extension
        .trim_start_matches('.')
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(MAX_EXTENSION_LEN)
        .collect::<String>()
        .to_ascii_lowercase();

    (!cleaned.is_empty()).then_some(cleaned)
}
