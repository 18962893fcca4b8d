//! Command implementations.

mod delta;
mod info;
mod query;
mod rebuild;
mod reconstruct;
mod session;
mod validate;

pub use delta::run_delta;
pub use info::run_info;
pub use query::run_query;
pub use rebuild::run_rebuild;
pub use reconstruct::run_reconstruct;
pub use validate::run_validate;
