//! Backend test support utilities
//!
//! Currently this crate only carries unified logging initialization shared
//! by unit and integration tests.

pub mod logging;
