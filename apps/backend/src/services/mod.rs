//! Service layer: read-modify-publish orchestration over the shared
//! store.

pub mod games;
pub mod rooms;
