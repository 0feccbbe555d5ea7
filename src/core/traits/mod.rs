pub mod audit;
pub mod document_store;
pub mod tree_diff;
