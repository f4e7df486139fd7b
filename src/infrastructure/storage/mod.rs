//! File storage implementations

mod local;
mod memory;

use std::path::Path;

use rand::Rng;

pub use local::LocalFileStorage;
pub use memory::InMemoryFileStorage;

/// URL-safe alphabet for generated names.
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";
const RANDOM_NAME_LEN: usize = 16;

/// `<16 random chars>.<ext of original>`, or `None` for an empty name.
pub(crate) fn random_filename(original: &str) -> Option<String> {
    if original.is_empty() {
        return None;
    }

    let mut rng = rand::thread_rng();
    let id: String = (0..RANDOM_NAME_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    match Path::new(original).extension().and_then(|e| e.to_str()) {
        Some(ext) => Some(format!("{}.{}", id, ext)),
        None => Some(id),
    }
}
