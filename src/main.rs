use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use line_quiz::config::{DEFAULT_CONFIG_FILE, DEFAULT_READ_TIMEOUT, DEFAULT_WORKERS};
use line_quiz::protocol::DEFAULT_PORT;
use line_quiz::{client, server, ConnectionConfig, QuizError, ServerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Host the quiz server
    Server {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Number of sessions served at once (at least 1)
        #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
        workers: NonZeroUsize,

        /// Seconds a session may sit idle before it is dropped (0 = never)
        #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT.as_secs())]
        read_timeout: u64,

        /// JSON file to load the questions from instead of the built-in set
        #[arg(short, long)]
        questions: Option<PathBuf>,
    },

    /// Play in the console
    Console(ClientArgs),

    /// Play in a full-screen terminal UI
    Tui(ClientArgs),
}

#[derive(Args, Debug)]
struct ClientArgs {
    /// Two-line file holding the server host and port
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Server host, overriding the configuration file
    #[arg(long)]
    host: Option<String>,

    /// Server port, overriding the configuration file
    #[arg(short, long)]
    port: Option<u16>,
}

impl ClientArgs {
    fn connection(&self) -> ConnectionConfig {
        let mut config = ConnectionConfig::load_or_default(&self.config);
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result: Result<(), QuizError> = match cli.command {
        Mode::Server {
            host,
            port,
            workers,
            read_timeout,
            questions,
        } => {
            init_logging();
            let config = ServerConfig {
                host,
                port,
                workers,
                read_timeout: (read_timeout > 0).then(|| Duration::from_secs(read_timeout)),
                questions,
            };
            server::run(config).await
        }
        Mode::Console(args) => {
            init_logging();
            client::run_console(args.connection()).await.map_err(QuizError::from)
        }
        Mode::Tui(args) => {
            // No subscriber: log lines would draw over the screen.
            client::run_tui(args.connection()).await.map_err(QuizError::from)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_workers(args: &[&str]) -> Result<NonZeroUsize, clap::Error> {
        let cli = Cli::try_parse_from(["line-quiz", "server"].iter().chain(args).copied())?;
        match cli.command {
            Mode::Server { workers, .. } => Ok(workers),
            other => panic!("parsed as {:?}", other),
        }
    }

    #[test]
    fn test_workers_default() {
        assert_eq!(parse_workers(&[]).unwrap(), DEFAULT_WORKERS);
    }

    #[test]
    fn test_workers_accepts_positive_count() {
        assert_eq!(parse_workers(&["--workers", "3"]).unwrap().get(), 3);
    }

    #[test]
    fn test_workers_rejects_zero() {
        let err = parse_workers(&["--workers", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
