//! Session domain
//!
//! Server-side session records that bind an authenticated user to a browser
//! through a signed cookie.

mod entity;
mod store;

pub use entity::{Session, SessionData};
pub use store::SessionStore;
