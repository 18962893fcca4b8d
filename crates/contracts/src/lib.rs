//! # Contracts
//!
//! Shared records and collaborator interfaces used by every speedtrace crate.
//! Business crates share data through these types and each other's public APIs.
//!
//! ## Units
//! - speed: km/h, as shown on the speedometer
//! - distance: meters, cumulative from the first sample
//! - time: seconds since the first processed frame
//! - acceleration: m/s² (divide by [`STANDARD_GRAVITY`] for g)

mod blueprint;
mod error;
mod reading;
mod reconstruction_config;
mod sample;
mod source;

pub use blueprint::*;
pub use error::*;
pub use reading::*;
pub use reconstruction_config::*;
pub use sample::*;
pub use source::*;
