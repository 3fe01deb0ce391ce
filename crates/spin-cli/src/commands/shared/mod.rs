pub mod gate_errors;
pub mod input;
pub mod kv;
pub mod require;
pub mod task;
