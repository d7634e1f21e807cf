pub mod broker;
pub mod protocol;
pub mod registry;
pub mod session;
