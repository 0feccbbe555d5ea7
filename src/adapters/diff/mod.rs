pub mod deep_diff;
