pub mod broadcast;
pub mod service;
pub mod types;
