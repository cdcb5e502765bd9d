//! Wire-level DTOs for the Keez public API.

pub mod common;
pub mod invoice;
pub mod item;

pub use common::*;
pub use invoice::*;
pub use item::*;
