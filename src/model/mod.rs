//! Data exchanged with clients and stored on database.

mod body;
mod envelope;
mod exchange;
mod user;

pub use body::*;
pub use envelope::*;
pub use exchange::*;
pub use user::*;
