pub mod opportunity;
pub mod receipt;

pub use opportunity::{MintOpportunity, MintPrice};
pub use receipt::{MintReceipt, ReceiptStatus};
