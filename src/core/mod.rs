pub mod client;
pub mod repository;
