pub mod context;
pub mod ledger;

pub use context::{Role, Session, SessionError};
pub use ledger::{Ledger, PendingWrite};
