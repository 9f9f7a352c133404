//! TCP listener with a bounded pool of session workers.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{error, info, Instrument};

use crate::config::ServerConfig;
use crate::data::{load_questions_from_json, QuestionBank};
use crate::QuizError;

use super::runner::{run_session, RunnerOptions};

const ACCEPT_BACKOFF_START: Duration = Duration::from_millis(10);
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Pause before retrying `accept` after `failures` errors in a row.
fn accept_backoff(failures: u32) -> Duration {
    ACCEPT_BACKOFF_START
        .saturating_mul(1 << failures.min(7))
        .min(ACCEPT_BACKOFF_MAX)
}

/// Run the quiz server until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<(), QuizError> {
    let bank = match &config.questions {
        Some(path) => QuestionBank::new(load_questions_from_json(path)?)?,
        None => QuestionBank::builtin(),
    };
    info!("loaded {} questions", bank.len());

    let server = Server::bind(&config, bank).await?;
    info!(
        "server listening on {} with {} workers",
        server.local_addr()?,
        config.workers
    );

    server
        .serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("server stopped");
    Ok(())
}

/// A bound listener ready to serve sessions.
pub struct Server {
    listener: TcpListener,
    bank: Arc<QuestionBank>,
    workers: Arc<Semaphore>,
    options: RunnerOptions,
}

impl Server {
    pub async fn bind(config: &ServerConfig, bank: QuestionBank) -> io::Result<Self> {
        let listener = TcpListener::bind(config.bind_addr()).await?;

        Ok(Self {
            listener,
            bank: Arc::new(bank),
            workers: Arc::new(Semaphore::new(config.workers.get())),
            options: RunnerOptions {
                read_timeout: config.read_timeout,
            },
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever.
    pub async fn serve(self) {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Sessions already running are left to finish on their own.
    pub async fn serve_with_shutdown<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut accept_failures = 0u32;

        loop {
            let accepted = tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => accepted,
            };

            // Errors such as EMFILE repeat until something is released,
            // so back off instead of spinning.
            let (stream, peer) = match accepted {
                Ok(accepted) => {
                    accept_failures = 0;
                    accepted
                }
                Err(e) => {
                    let delay = accept_backoff(accept_failures);
                    accept_failures = accept_failures.saturating_add(1);
                    error!("failed to accept connection: {}, retrying in {:?}", e, delay);
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(delay) => continue,
                    }
                }
            };

            info!(%peer, "connection accepted");
            if self.workers.available_permits() == 0 {
                info!(%peer, "all workers busy, connection waits for a free slot");
            }

            // The accept loop itself waits here, so a saturated pool never
            // grows past its bound.
            let permit = tokio::select! {
                _ = &mut shutdown => break,
                permit = Arc::clone(&self.workers).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            self.spawn_worker(stream, peer, permit);
        }

        info!("listener shut down");
    }

    fn spawn_worker(&self, stream: TcpStream, peer: SocketAddr, permit: OwnedSemaphorePermit) {
        let bank = Arc::clone(&self.bank);
        let options = self.options;
        let span = tracing::info_span!("connection", %peer);

        tokio::spawn(
            async move {
                let report = run_session(stream, bank, options).await;
                info!(session = %report.id, "worker released");
                drop(permit);
            }
            .instrument(span),
        );
    }
}
