pub mod assembler;
pub mod dto;
pub mod service;

pub use service::{MovieService, LANDING_PAGE_SIZE};
