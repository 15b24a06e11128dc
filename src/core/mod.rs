pub mod config;

pub use config::MappingConfig;
