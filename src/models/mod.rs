mod amount;
mod transaction;

pub use amount::Amount;
pub use transaction::{ParsedTransaction, TransactionType, NOT_AVAILABLE};
