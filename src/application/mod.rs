// Application layer - use cases over the account registry.
// Every mutation goes through `LedgerService`, which owns validation and the
// per-account locking discipline.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
