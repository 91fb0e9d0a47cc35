pub mod access;
pub mod kv;
pub mod repository;
pub mod seed;
pub mod store;
