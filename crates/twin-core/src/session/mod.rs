//! Session persistence port.

pub mod box_store;
pub mod store;
