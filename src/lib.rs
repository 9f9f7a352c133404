//! # line-quiz
//!
//! A multiple-choice quiz played over a newline-delimited TCP text protocol.
//!
//! The server keeps a read-only [`QuestionBank`] and runs one [`Session`]
//! per connection on a bounded pool of workers. Two clients speak the same
//! protocol: a console prompt and a full-screen terminal UI.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use line_quiz::{config::ServerConfig, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Serve the built-in questions on 0.0.0.0:1234 with 5 workers.
//!     server::run(ServerConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
mod data;
mod models;
pub mod protocol;
pub mod server;

use std::io;

pub use client::ClientError;
pub use config::{ConfigError, ConnectionConfig, ServerConfig};
pub use data::{load_questions_from_json, LoadError, NotFound, QuestionBank};
pub use models::{Choice, Question};
pub use server::{Server, Session, SessionError, SessionState};

/// Error type for quiz operations.
#[derive(Debug)]
pub enum QuizError {
    /// Error loading questions from file.
    Load(LoadError),
    /// Error reading the client configuration.
    Config(ConfigError),
    /// Client front-end failure.
    Client(ClientError),
    /// IO error while serving.
    Io(io::Error),
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::Load(e) => write!(f, "Failed to load questions: {}", e),
            QuizError::Config(e) => write!(f, "Invalid configuration: {}", e),
            QuizError::Client(e) => write!(f, "Client error: {}", e),
            QuizError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::Load(e) => Some(e),
            QuizError::Config(e) => Some(e),
            QuizError::Client(e) => Some(e),
            QuizError::Io(e) => Some(e),
        }
    }
}

impl From<LoadError> for QuizError {
    fn from(err: LoadError) -> Self {
        QuizError::Load(err)
    }
}

impl From<ConfigError> for QuizError {
    fn from(err: ConfigError) -> Self {
        QuizError::Config(err)
    }
}

impl From<ClientError> for QuizError {
    fn from(err: ClientError) -> Self {
        QuizError::Client(err)
    }
}

impl From<io::Error> for QuizError {
    fn from(err: io::Error) -> Self {
        QuizError::Io(err)
    }
}
