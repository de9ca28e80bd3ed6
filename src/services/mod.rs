pub mod mint_service;
pub mod polling_service;
pub mod tx;

pub use mint_service::MintService;
pub use polling_service::PollingService;
