//! Fixed limits shared by every component.

use std::time::Duration;

/// Largest accepted payload: 25 MiB for files, 25 Mi characters for URLs.
pub const MAX_PAYLOAD_SIZE: usize = 26_214_400;

/// Smallest accepted client TTL, in seconds.
pub const MIN_TTL_SECONDS: u64 = 60;

/// Lifetime of a transport mailbox entry.
pub const TRANSPORT_TTL: Duration = Duration::from_secs(86_400);

/// Length of a normal-mode identifier.
pub const ID_LENGTH: usize = 10;

/// Length of an invisible-mode identifier, in characters.
pub const INVISIBLE_ID_LENGTH: usize = 56;

/// Shortest identifier accepted from a request path, in characters.
pub const MIN_ID_LENGTH: usize = 10;

/// Length of a deletion code.
pub const DELETION_CODE_LENGTH: usize = 21;
