mod local_signer;
mod signer_trait;

pub use local_signer::LocalSigner;
pub use signer_trait::TxSigner;
