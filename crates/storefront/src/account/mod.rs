//! Visitor account state.
//!
//! The selected account, the sign-in result and per-account data live in
//! [`Storage`] areas. Changes are announced through [`AccountEvents`].

mod events;
mod session;
mod storage;

pub use events::{AccountEvent, AccountEvents, Subscription};
pub use session::{ACCOUNT_KEY, AccountError, AccountSession, SELECTED_ACCOUNT_KEY, UserData};
pub use storage::{MemoryStorage, SessionStorage, Storage, StorageError};
