use std::fmt;
use std::io;

use tokio_util::codec::LinesCodecError;

/// Error ending a client front-end.
#[derive(Debug)]
pub enum ClientError {
    /// The server could not be reached.
    ConnectionRefused { addr: String, source: io::Error },
    /// The connection dropped mid-session.
    ConnectionLost(String),
    /// Local terminal or stdin/stdout failure.
    Io(io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::ConnectionRefused { addr, source } => {
                write!(f, "could not connect to the server at {}: {}", addr, source)
            }
            ClientError::ConnectionLost(reason) => write!(f, "connection lost: {}", reason),
            ClientError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::ConnectionRefused { source, .. } => Some(source),
            ClientError::Io(e) => Some(e),
            ClientError::ConnectionLost(_) => None,
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        ClientError::Io(err)
    }
}

impl From<LinesCodecError> for ClientError {
    fn from(err: LinesCodecError) -> Self {
        ClientError::ConnectionLost(err.to_string())
    }
}
