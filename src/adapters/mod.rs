pub mod audit;
pub mod diff;
pub mod store;
