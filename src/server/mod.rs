//! Quiz server module.
//!
//! Accepts TCP connections and runs one [`Session`] per connection on a
//! bounded pool of workers.

mod runner;
mod server;
mod session;

pub use runner::{run_session, RunnerOptions, SessionEnd, SessionReport};
pub use server::{run, Server};
pub use session::{Session, SessionError, SessionState};
