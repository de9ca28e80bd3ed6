pub mod gas_service;

pub use gas_service::GasService;
