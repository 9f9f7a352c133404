//! Drives one connection through one [`Session`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Framed, LinesCodec, LinesCodecError};
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use crate::data::QuestionBank;
use crate::protocol::{Response, MAX_LINE_LENGTH};

use super::session::{Session, SessionError};

/// Per-connection knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunnerOptions {
    /// Longest the runner waits for the next line. `None` waits forever.
    pub read_timeout: Option<Duration>,
}

/// Why a session stopped.
#[derive(Debug)]
pub enum SessionEnd {
    /// The session reached its final score and the `END:` line was sent.
    Finished,
    /// The peer closed the connection.
    PeerClosed,
    /// No line arrived within the read timeout.
    TimedOut,
    /// Reading or writing failed.
    ConnectionLost(LinesCodecError),
    /// The session broke an internal invariant and was terminated.
    Internal(SessionError),
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEnd::Finished => f.write_str("finished"),
            SessionEnd::PeerClosed => f.write_str("peer closed the connection"),
            SessionEnd::TimedOut => f.write_str("read timed out"),
            SessionEnd::ConnectionLost(e) => write!(f, "connection lost: {}", e),
            SessionEnd::Internal(e) => write!(f, "terminated: {}", e),
        }
    }
}

/// Summary of a completed connection.
#[derive(Debug)]
pub struct SessionReport {
    pub id: Uuid,
    pub score: usize,
    pub answered: usize,
    pub end: SessionEnd,
}

/// Serve one connection until its session finishes or the connection fails.
///
/// Never panics on peer behaviour; every way out is described by the
/// returned [`SessionEnd`].
pub async fn run_session<S>(stream: S, bank: Arc<QuestionBank>, options: RunnerOptions) -> SessionReport
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let id = Uuid::new_v4();
    let span = tracing::info_span!("session", %id);

    async move {
        let mut lines = Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
        let mut session = Session::new();

        info!("session started");
        let end = match drive(&mut lines, &mut session, &bank, options).await {
            Ok(()) => {
                // Flushes the END line and shuts the write half down.
                if let Err(e) = SinkExt::<String>::close(&mut lines).await {
                    warn!("failed to close connection cleanly: {}", e);
                }
                SessionEnd::Finished
            }
            Err(end) => end,
        };

        match &end {
            SessionEnd::Finished | SessionEnd::PeerClosed => {
                info!(score = session.score(), answered = session.answered(), "session ended: {}", end)
            }
            SessionEnd::TimedOut => warn!(score = session.score(), "session ended: {}", end),
            SessionEnd::ConnectionLost(_) | SessionEnd::Internal(_) => {
                error!(score = session.score(), "session ended: {}", end)
            }
        }

        SessionReport {
            id,
            score: session.score(),
            answered: session.answered(),
            end,
        }
    }
    .instrument(span)
    .await
}

/// The read/dispatch loop. `Ok` means the session finished normally.
async fn drive<S>(
    lines: &mut Framed<S, LinesCodec>,
    session: &mut Session,
    bank: &QuestionBank,
    options: RunnerOptions,
) -> Result<(), SessionEnd>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    send_all(lines, &[Response::Welcome]).await?;

    while !session.is_finished() {
        let next = match options.read_timeout {
            Some(limit) => tokio::time::timeout(limit, lines.next())
                .await
                .map_err(|_| SessionEnd::TimedOut)?,
            None => lines.next().await,
        };

        let line = match next {
            Some(Ok(line)) => line,
            Some(Err(e)) => return Err(SessionEnd::ConnectionLost(e)),
            None => return Err(SessionEnd::PeerClosed),
        };

        let responses = session
            .handle_line(bank, &line)
            .map_err(SessionEnd::Internal)?;
        send_all(lines, &responses).await?;
    }

    Ok(())
}

async fn send_all<S>(lines: &mut Framed<S, LinesCodec>, responses: &[Response]) -> Result<(), SessionEnd>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    for response in responses {
        lines
            .feed(response.to_string())
            .await
            .map_err(SessionEnd::ConnectionLost)?;
    }
    SinkExt::<String>::flush(lines)
        .await
        .map_err(SessionEnd::ConnectionLost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Choice, Question};
    use crate::protocol::WELCOME_BANNER;
    use tokio::io::{duplex, AsyncBufReadExt, AsyncWriteExt, BufReader};

    fn bank() -> Arc<QuestionBank> {
        Arc::new(
            QuestionBank::new(vec![
                Question::new("First?", ["1", "2", "3", "4"], Choice::A),
                Question::new("Second?", ["1", "2", "3", "4"], Choice::B),
            ])
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_runs_scenario_to_end() {
        let (client, server) = duplex(4096);
        let task = tokio::spawn(run_session(server, bank(), RunnerOptions::default()));

        let (read, mut write) = tokio::io::split(client);
        let mut reader = BufReader::new(read).lines();

        assert_eq!(reader.next_line().await.unwrap().unwrap(), WELCOME_BANNER);

        let script = [
            ("START", "QUESTION:First?;1;2;3;4"),
            ("ANSWER:a", "FEEDBACK:Correct!"),
            ("NEXT", "QUESTION:Second?;1;2;3;4"),
            ("ANSWER:a", "FEEDBACK:Incorrect! The correct answer was b"),
            ("NEXT", "END:Quiz over! Your final score is 1"),
        ];
        for (command, expected) in script {
            write.write_all(format!("{}\n", command).as_bytes()).await.unwrap();
            assert_eq!(reader.next_line().await.unwrap().unwrap(), expected);
        }

        // Connection closes after END.
        assert_eq!(reader.next_line().await.unwrap(), None);

        let report = task.await.unwrap();
        assert!(matches!(report.end, SessionEnd::Finished));
        assert_eq!(report.score, 1);
        assert_eq!(report.answered, 2);
    }

    #[tokio::test]
    async fn test_peer_close_ends_session() {
        let (client, server) = duplex(4096);
        let task = tokio::spawn(run_session(server, bank(), RunnerOptions::default()));

        let (read, mut write) = tokio::io::split(client);
        let mut reader = BufReader::new(read).lines();
        reader.next_line().await.unwrap();
        write.write_all(b"START\r\n").await.unwrap();
        assert!(reader.next_line().await.unwrap().unwrap().starts_with("QUESTION:"));

        drop(write);
        drop(reader);

        let report = task.await.unwrap();
        assert!(matches!(
            report.end,
            SessionEnd::PeerClosed | SessionEnd::ConnectionLost(_)
        ));
        assert_eq!(report.score, 0);
    }

    #[tokio::test]
    async fn test_read_timeout_releases_connection() {
        let (client, server) = duplex(4096);
        let options = RunnerOptions {
            read_timeout: Some(Duration::from_millis(50)),
        };
        let report = run_session(server, bank(), options).await;
        assert!(matches!(report.end, SessionEnd::TimedOut));
        drop(client);
    }

    #[tokio::test]
    async fn test_overlong_line_drops_connection() {
        let (client, server) = duplex(8192);
        let task = tokio::spawn(run_session(server, bank(), RunnerOptions::default()));

        let (read, mut write) = tokio::io::split(client);
        let mut reader = BufReader::new(read).lines();
        reader.next_line().await.unwrap();

        let long = "x".repeat(MAX_LINE_LENGTH + 10);
        write.write_all(format!("{}\n", long).as_bytes()).await.unwrap();

        let report = task.await.unwrap();
        assert!(matches!(report.end, SessionEnd::ConnectionLost(_)));
    }
}
