use crate::{IdGenerator, IdStyle, ZERO_WIDTH_NON_JOINER, ZERO_WIDTH_SPACE};
use std::sync::atomic::{AtomicU64, Ordering};
use veil_core::limits::{DELETION_CODE_LENGTH, ID_LENGTH, INVISIBLE_ID_LENGTH};
use veil_core::{DeletionCode, ObjectId};

/// A predictable generator using a sequential counter.
///
/// Normal ids look like `"seq0000000"`, `"seq0000001"`; invisible ids encode
/// the counter in binary with the two zero-width characters; deletion codes
/// are `"del"` followed by the zero-padded counter. Useful for tests and
/// local runs where reproducible locators matter more than secrecy.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            prefix: self.prefix.clone(),
        }
    }
}

impl SeqGenerator {
    /// Creates a generator with a custom prefix.
    ///
    /// Prefixes longer than the id length are truncated.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::with_offset(prefix, 0)
    }

    /// Creates a generator starting from a specific counter value.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Self {
        let prefix: String = prefix.into().chars().take(ID_LENGTH).collect();
        Self {
            counter: AtomicU64::new(offset),
            prefix,
        }
    }

    fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }
}

impl IdGenerator for SeqGenerator {
    fn generate(&self, style: IdStyle) -> ObjectId {
        let count = self.next();
        let id = match style {
            IdStyle::Normal => {
                let width = ID_LENGTH - self.prefix.chars().count();
                format!("{}{:0width$}", self.prefix, count, width = width)
            }
            IdStyle::Invisible => format!("{:0width$b}", count, width = INVISIBLE_ID_LENGTH)
                .chars()
                .map(|bit| {
                    if bit == '1' {
                        ZERO_WIDTH_NON_JOINER
                    } else {
                        ZERO_WIDTH_SPACE
                    }
                })
                .collect(),
        };
        ObjectId::new_unchecked(id)
    }

    fn deletion_code(&self) -> DeletionCode {
        let count = self.next();
        DeletionCode::new_unchecked(format!(
            "del{:0width$}",
            count,
            width = DELETION_CODE_LENGTH - 3
        ))
    }
}
