//! Line protocol shared by the server and both clients.

mod messages;

pub use messages::*;
