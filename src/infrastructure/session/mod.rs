//! Session infrastructure: signed cookies and the session store

mod cookie;
mod in_memory;

pub use cookie::SessionCookie;
pub use in_memory::MokaSessionStore;
