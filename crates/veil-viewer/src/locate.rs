use crate::error::ViewError;
use std::net::IpAddr;
use veil_core::{ObjectId, ReadStore, StoredObject};

/// Path code that names the caller's own transport mailbox.
pub const TRANSPORT_CODE: &str = "t";

/// Maps a path code onto a store key and loads the object.
///
/// `invalid` builds the endpoint-specific error for a malformed code. The
/// transport code resolves through `client_addr`; without an address there
/// is no mailbox to read.
pub(crate) async fn load<S: ReadStore + ?Sized>(
    store: &S,
    code: &str,
    client_addr: Option<IpAddr>,
    invalid: fn(String) -> ViewError,
) -> Result<StoredObject, ViewError> {
    let id = if code == TRANSPORT_CODE {
        ObjectId::mailbox(client_addr.ok_or(ViewError::NotFound)?)
    } else {
        ObjectId::parse(code).map_err(|e| invalid(e.to_string()))?
    };

    store.get_with_metadata(&id).await?.ok_or(ViewError::NotFound)
}
