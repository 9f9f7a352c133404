//! Line-by-line console front-end.

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_util::codec::{Framed, LinesCodec};

use crate::config::ConnectionConfig;
use crate::models::Choice;
use crate::protocol::{Command, ServerLine};

use super::{connect, ClientError};

/// Connect and play on stdin/stdout.
pub async fn run(config: ConnectionConfig) -> Result<(), ClientError> {
    let server = connect(&config).await?;
    println!("Connected to the server.");

    let stdin = BufReader::new(tokio::io::stdin());
    let result = play(server, stdin, tokio::io::stdout()).await;

    if let Err(ClientError::ConnectionLost(_)) = &result {
        println!("Connection lost.");
    }
    result
}

/// Play one session: print each server line, then forward one line of user input.
///
/// Returns after the `END:` line. End of input sends `QUIT`.
pub async fn play<S, I, O>(
    mut server: Framed<S, LinesCodec>,
    input: I,
    mut output: O,
) -> Result<(), ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut input = input.lines();
    let mut answering = false;

    loop {
        let line = match server.next().await {
            Some(line) => line?,
            None => {
                return Err(ClientError::ConnectionLost(
                    "server closed the connection".to_string(),
                ));
            }
        };

        let text = match ServerLine::parse(&line) {
            ServerLine::Question(question) => {
                answering = true;
                let mut text = format!("\n{}\n", question.text);
                for (choice, option) in Choice::ALL.iter().zip(question.options.iter()) {
                    text.push_str(&format!("  {}) {}\n", choice, option));
                }
                text
            }
            ServerLine::Feedback(feedback) => {
                answering = false;
                format!("{}\nType NEXT to continue or QUIT to stop.\n", feedback)
            }
            ServerLine::End(message) => {
                output.write_all(format!("{}\n", message).as_bytes()).await?;
                output.flush().await?;
                return Ok(());
            }
            ServerLine::Notice(notice) => format!("Server: {}\n", notice),
        };

        let prompt = if answering { "Your answer (a-d): " } else { "> " };
        output.write_all(text.as_bytes()).await?;
        output.write_all(prompt.as_bytes()).await?;
        output.flush().await?;

        let reply = match input.next_line().await? {
            Some(typed) if answering => answer_line(&typed),
            Some(typed) => typed.trim().to_string(),
            None => Command::Quit.to_string(),
        };
        server.send(reply).await?;
    }
}

/// A bare letter becomes `ANSWER:<letter>`; anything that already looks like
/// a command is sent unchanged.
fn answer_line(typed: &str) -> String {
    let typed = typed.trim();
    let is_command = Command::parse(typed).is_ok()
        || typed
            .get(..6)
            .is_some_and(|word| word.eq_ignore_ascii_case("ANSWER"));

    if is_command {
        typed.to_string()
    } else {
        format!("ANSWER:{}", typed)
    }
}
