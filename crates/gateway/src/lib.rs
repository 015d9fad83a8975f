//! The gateway dispatcher.
//!
//! One inbound request carries an action discriminant; the dispatcher
//! routes it to the matching downstream client and folds each downstream's
//! distinct success/error contract into the single uniform response shape.
//! The gateway owns no persistent state and performs no retries: it is a
//! pure routing and translation layer.

pub mod dispatcher;
pub mod error;

pub use dispatcher::Dispatcher;
pub use error::GatewayError;
