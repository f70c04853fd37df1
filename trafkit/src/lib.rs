pub mod errors;
pub mod export;
pub mod sample;
pub mod schedule;
pub mod types;
pub mod view;
