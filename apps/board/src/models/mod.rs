pub mod application;
pub mod timestamp;
