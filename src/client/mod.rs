//! Quiz client module.
//!
//! Two front-ends over the same line protocol: a plain console prompt and a
//! full-screen terminal UI.

mod client;
mod console;
mod error;
mod state;
mod terminal;
mod ui;

use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::info;

use crate::config::ConnectionConfig;
use crate::protocol::MAX_LINE_LENGTH;

pub use client::run as run_tui;
pub use console::{play, run as run_console};
pub use error::ClientError;
pub use state::{ClientApp, ClientState, QuizPhase};

/// A line-framed connection to the server.
pub type ServerConnection = Framed<TcpStream, LinesCodec>;

/// Connect to the server named by `config`.
pub async fn connect(config: &ConnectionConfig) -> Result<ServerConnection, ClientError> {
    let addr = config.addr();
    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|source| ClientError::ConnectionRefused {
            addr: addr.clone(),
            source,
        })?;
    info!("connected to {}", addr);

    Ok(Framed::new(
        stream,
        LinesCodec::new_with_max_length(MAX_LINE_LENGTH),
    ))
}
