//! Upload and deletion services.
//!
//! [`CreateService`] validates an [`UploadForm`], stores the payload and
//! crafts the locators handed back to the client; [`DeletionService`]
//! removes an object once its deletion code has been checked.

pub mod create;
pub mod delete;
pub mod embed;
pub mod error;
pub mod form;

pub use create::{CreateContext, CreateOutcome, CreateService, CreateSettings};
pub use delete::{DeletionRequest, DeletionService};
pub use error::{CreateError, DeletionError};
pub use form::{FilePart, UploadData, UploadForm};
