//! Paste identifier generation.

use crate::constants::{PASTE_ID_ALPHABET, PASTE_ID_LENGTH};
use rand::rngs::OsRng;
use rand::Rng;

/// Source of fresh paste identifiers.
///
/// Implementations need not guarantee global uniqueness; the store rejects
/// duplicates on insert and the lifecycle engine regenerates.
pub trait IdGenerator: Send + Sync {
    /// Produce a new identifier.
    fn generate(&self) -> String;
}

/// Fixed-length identifiers over `0-9a-zA-Z`, drawn from the OS CSPRNG.
#[derive(Debug, Clone, Copy)]
pub struct AlphanumericIds {
    length: usize,
}

impl AlphanumericIds {
    /// Generator producing identifiers of `length` characters.
    pub fn with_length(length: usize) -> Self {
        Self { length }
    }
}

impl Default for AlphanumericIds {
    fn default() -> Self {
        Self::with_length(PASTE_ID_LENGTH)
    }
}

impl IdGenerator for AlphanumericIds {
    fn generate(&self) -> String {
        generate_id(self.length)
    }
}

/// Generate a random identifier of `length` characters.
///
/// # Returns
/// A string of `length` symbols drawn uniformly from [`PASTE_ID_ALPHABET`].
fn generate_id(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| PASTE_ID_ALPHABET[rng.gen_range(0..PASTE_ID_ALPHABET.len())] as char)
        .collect()
}

/// Whether `candidate` is shaped like an identifier this module could emit.
#[cfg(test)]
pub(crate) fn looks_like_paste_id(candidate: &str) -> bool {
    candidate.len() == PASTE_ID_LENGTH
        && candidate
            .bytes()
            .all(|byte| PASTE_ID_ALPHABET.contains(&byte))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_have_fixed_length_and_alphabet() {
        let ids = AlphanumericIds::default();
        for _ in 0..256 {
            let id = ids.generate();
            assert_eq!(id.len(), PASTE_ID_LENGTH);
            assert!(id.chars().all(|ch| ch.is_ascii_alphanumeric()), "{}", id);
            assert!(looks_like_paste_id(&id));
        }
    }

    #[test]
    fn generated_ids_do_not_repeat_in_practice() {
        let ids = AlphanumericIds::default();
        let seen: HashSet<String> = (0..2_000).map(|_| ids.generate()).collect();
        assert_eq!(seen.len(), 2_000);
    }

    #[test]
    fn alphabet_has_sixty_two_distinct_symbols() {
        let distinct: HashSet<u8> = PASTE_ID_ALPHABET.iter().copied().collect();
        assert_eq!(distinct.len(), 62);
    }

    #[test]
    fn looks_like_paste_id_rejects_foreign_shapes() {
        assert!(!looks_like_paste_id("short"));
        assert!(!looks_like_paste_id("abcd-123"));
        assert!(!looks_like_paste_id("abcdefghi"));
    }

    #[test]
    fn custom_length_is_respected() {
        assert_eq!(AlphanumericIds::with_length(12).generate().len(), 12);
    }
}
