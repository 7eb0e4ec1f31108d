pub mod adapters;
pub mod catalog;
pub mod coordinator;
pub mod core;
pub mod parameters;
pub mod systems;
