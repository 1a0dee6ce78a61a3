//! The investigation orchestration protocol: create or join a session,
//! register one hashed identifier per party through the public registry,
//! and jointly count matches on the compute network.

mod api;
pub use api::*;

mod directory;
mod link;
mod session;

pub use directory::{KeyValueStore, SessionDirectory, DIRECTORY_KEY};
pub use link::SessionLink;
pub use session::{InvestigationSession, SessionState};
