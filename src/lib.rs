pub mod config;
pub mod db;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod storage;
pub mod transform;
pub mod types;
