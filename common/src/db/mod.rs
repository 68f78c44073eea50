pub mod benchmark;
pub mod core;
pub mod indices;
