pub mod gas;
pub mod signer;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use types::{MintOutcome, TxOptions};
