//! Single-flight execution for restmodel.
//!
//! A [`SingleFlight`] guards one asynchronous action slot (an entity's
//! store, update, destroy or find). While an action is in flight, further
//! calls do not start a second one; they join the pending run and observe
//! its result.

mod error;
mod single_flight;

pub use error::{ExecutorError, ExecutorResult};
pub use single_flight::{Flight, SingleFlight};
