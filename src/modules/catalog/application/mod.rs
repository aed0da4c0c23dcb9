pub mod service;

pub use service::CatalogService;
