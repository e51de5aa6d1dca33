pub mod data_loader_service;

pub use data_loader_service::{DataLoaderService, DataSource, LoadMessage};
