//! Read side of the object drop.
//!
//! [`RawRetrievalService`] hands out stored bytes (or redirects for stored
//! URLs) and [`RenderService`] wraps files in an HTML landing page.

pub mod error;
pub mod html;
pub mod humanize;
mod locate;
pub mod raw;
pub mod render;

pub use error::ViewError;
pub use locate::TRANSPORT_CODE;
pub use raw::{RawContent, RawRetrievalService};
pub use render::{RenderService, RenderSettings, Rendered, ROBOTS_TXT};
