use crate::{IdGenerator, IdStyle, ZERO_WIDTH_NON_JOINER, ZERO_WIDTH_SPACE};
use rand::rngs::OsRng;
use rand::RngCore;
use veil_core::limits::{DELETION_CODE_LENGTH, ID_LENGTH, INVISIBLE_ID_LENGTH};
use veil_core::{DeletionCode, ObjectId};

/// URL-safe alphabet of exactly 64 symbols, so masking a random byte with
/// `0x3f` picks a symbol uniformly.
const URL_ALPHABET: &[u8; 64] =
    b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

const INVISIBLE_ALPHABET: [char; 2] = [ZERO_WIDTH_SPACE, ZERO_WIDTH_NON_JOINER];

/// Identifier and secret generator backed by the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureGenerator;

impl SecureGenerator {
    pub fn new() -> Self {
        Self
    }

    fn random_bytes(len: usize) -> Vec<u8> {
        let mut bytes = vec![0_u8; len];
        OsRng.fill_bytes(&mut bytes);
        bytes
    }

    fn url_safe(len: usize) -> String {
        Self::random_bytes(len)
            .into_iter()
            .map(|b| URL_ALPHABET[(b & 0x3f) as usize] as char)
            .collect()
    }

    fn invisible(len: usize) -> String {
        Self::random_bytes(len)
            .into_iter()
            .map(|b| INVISIBLE_ALPHABET[(b & 0x01) as usize])
            .collect()
    }
}

impl IdGenerator for SecureGenerator {
    fn generate(&self, style: IdStyle) -> ObjectId {
        let id = match style {
            IdStyle::Normal => Self::url_safe(ID_LENGTH),
            IdStyle::Invisible => Self::invisible(INVISIBLE_ID_LENGTH),
        };
        ObjectId::new_unchecked(id)
    }

    fn deletion_code(&self) -> DeletionCode {
        DeletionCode::new_unchecked(Self::url_safe(DELETION_CODE_LENGTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_url_safe(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c == '-'
    }

    #[test]
    fn alphabet_has_no_duplicates() {
        let unique: HashSet<_> = URL_ALPHABET.iter().collect();
        assert_eq!(unique.len(), 64);
    }

    #[test]
    fn normal_ids_are_ten_url_safe_characters() {
        let generator = SecureGenerator::new();
        for _ in 0..100 {
            let id = generator.generate(IdStyle::Normal);
            assert_eq!(id.as_str().len(), 10);
            assert!(id.as_str().chars().all(is_url_safe), "{id}");
        }
    }

    #[test]
    fn invisible_ids_are_56_zero_width_characters() {
        let generator = SecureGenerator::new();
        for _ in 0..100 {
            let id = generator.generate(IdStyle::Invisible);
            assert_eq!(id.as_str().chars().count(), 56);
            assert!(id
                .as_str()
                .chars()
                .all(|c| c == ZERO_WIDTH_SPACE || c == ZERO_WIDTH_NON_JOINER));
        }
    }

    #[test]
    fn deletion_codes_are_21_url_safe_characters() {
        let code = SecureGenerator::new().deletion_code();
        assert_eq!(code.as_str().len(), 21);
        assert!(code.as_str().chars().all(is_url_safe));
    }

    #[test]
    fn generated_ids_differ() {
        let generator = SecureGenerator::new();
        let ids: HashSet<_> = (0..1000)
            .map(|_| generator.generate(IdStyle::Normal))
            .collect();
        assert_eq!(ids.len(), 1000);
    }
}
