//! Arena Core Types
//!
//! Shared vocabulary for the agent arena: agents, battles, the static
//! vulnerability and achievement catalogs, and the event contract.

pub mod catalog;
pub mod error;
pub mod events;
pub mod types;

pub use catalog::*;
pub use error::*;
pub use events::*;
pub use types::*;
