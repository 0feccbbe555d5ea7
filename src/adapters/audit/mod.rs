pub mod json_lines_sink;
pub mod log_sink;
pub mod memory_sink;
