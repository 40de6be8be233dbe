mod envelope;
mod health;

pub use envelope::{Envelope, MessageData};
pub use health::HealthResponse;
