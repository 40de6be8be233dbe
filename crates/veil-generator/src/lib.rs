pub mod chance;
pub mod secure;
pub mod seq;

pub use chance::{Chance, PseudoChance};
pub use secure::SecureGenerator;
pub use seq::SeqGenerator;

use veil_core::{DeletionCode, ObjectId};

/// The two shapes an identifier can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStyle {
    /// Ten characters from a URL-safe alphabet.
    #[default]
    Normal,
    /// Fifty-six zero-width characters, so the path looks empty when pasted.
    Invisible,
}

impl IdStyle {
    /// Maps the client's `url` form field onto a style.
    pub fn from_form_value(value: &str) -> Self {
        if value == "invisible" {
            IdStyle::Invisible
        } else {
            IdStyle::Normal
        }
    }
}

/// Zero width space.
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';
/// Zero width non-joiner.
pub const ZERO_WIDTH_NON_JOINER: char = '\u{200C}';

/// Trait for generating object identifiers and deletion secrets.
///
/// Implementations are pure generators that don't interact with storage.
/// Collisions are not checked anywhere: a generated id that happens to exist
/// already overwrites the stored object.
pub trait IdGenerator: Send + Sync + 'static {
    /// Generates an identifier of the requested style.
    fn generate(&self, style: IdStyle) -> ObjectId;

    /// Generates the secret that authorizes deleting a new object.
    fn deletion_code(&self) -> DeletionCode;
}
