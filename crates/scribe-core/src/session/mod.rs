//! Session persistence
//!
//! A [`Session`] is one conversation transcript plus the environment it was
//! started in. [`SessionStore`] keeps them on disk and tracks the active one.

mod store;
mod types;

pub use store::{SessionStore, DEFAULT_SESSION_NAME};
pub use types::{Session, SessionContext, SHORT_ID_LEN};
