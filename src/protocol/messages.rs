//! Protocol messages for client-server communication.
//!
//! Every message is one UTF-8 line. Commands flow from client to server,
//! responses flow back, and responses carry a prefix that tells the client
//! how to render them.

use std::fmt;

use crate::models::{Choice, Question};

pub const QUESTION_PREFIX: &str = "QUESTION:";
pub const FEEDBACK_PREFIX: &str = "FEEDBACK:";
pub const END_PREFIX: &str = "END:";

/// Separator between the prompt and the options of a `QUESTION:` line.
pub const FIELD_SEPARATOR: char = ';';

/// Default server host used by the clients.
pub const DEFAULT_HOST: &str = "localhost";

/// Default server port.
pub const DEFAULT_PORT: u16 = 1234;

/// Longest line either side accepts.
pub const MAX_LINE_LENGTH: usize = 1024;

pub const WELCOME_BANNER: &str = "Welcome to the quiz! Send START to begin.";

/// Commands sent from client to server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Next,
    Answer(Choice),
    Quit,
}

/// A line the server could not turn into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Not a known command word.
    Unknown(String),
    /// `ANSWER` without a single a-d letter.
    InvalidAnswer(String),
}

impl Command {
    /// Parse one input line. Command words are case-insensitive.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();

        if let Some((word, payload)) = line.split_once(':') {
            if !word.trim().eq_ignore_ascii_case("ANSWER") {
                return Err(CommandError::Unknown(line.to_string()));
            }
            return Choice::from_letter(payload.trim())
                .map(Command::Answer)
                .ok_or_else(|| CommandError::InvalidAnswer(payload.trim().to_string()));
        }

        match line.to_ascii_uppercase().as_str() {
            "START" => Ok(Command::Start),
            "NEXT" => Ok(Command::Next),
            "QUIT" => Ok(Command::Quit),
            "ANSWER" => Err(CommandError::InvalidAnswer(String::new())),
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "START",
            Command::Next => "NEXT",
            Command::Answer(_) => "ANSWER",
            Command::Quit => "QUIT",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Answer(choice) => write!(f, "ANSWER:{}", choice),
            other => f.write_str(other.name()),
        }
    }
}

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Greeting sent once when the connection is taken up by a worker.
    Welcome,

    /// The question the client should answer now.
    Question(Question),

    /// Result of an `ANSWER`.
    Feedback { correct: Choice, was_correct: bool },

    /// Session over. The connection closes after this line.
    End { score: usize, empty_bank: bool },

    /// Command rejected; `expected` lists what is valid right now.
    InvalidCommand { expected: &'static str },

    /// `ANSWER` payload was not one of a-d.
    InvalidAnswer,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Welcome => f.write_str(WELCOME_BANNER),
            Response::Question(q) => {
                write!(f, "{}{}", QUESTION_PREFIX, q.text)?;
                for option in &q.options {
                    write!(f, "{}{}", FIELD_SEPARATOR, option)?;
                }
                Ok(())
            }
            Response::Feedback {
                was_correct: true, ..
            } => write!(f, "{}Correct!", FEEDBACK_PREFIX),
            Response::Feedback { correct, .. } => write!(
                f,
                "{}Incorrect! The correct answer was {}",
                FEEDBACK_PREFIX, correct
            ),
            Response::End {
                score,
                empty_bank: true,
            } => write!(
                f,
                "{}No questions available. Your final score is {}",
                END_PREFIX, score
            ),
            Response::End { score, .. } => {
                write!(f, "{}Quiz over! Your final score is {}", END_PREFIX, score)
            }
            Response::InvalidCommand { expected } => {
                write!(f, "Invalid command. Expected {}.", expected)
            }
            Response::InvalidAnswer => {
                f.write_str("Invalid answer. Use ANSWER:a, ANSWER:b, ANSWER:c or ANSWER:d.")
            }
        }
    }
}

/// A question as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub text: String,
    pub options: [String; 4],
}

/// A server line classified by its prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerLine {
    Question(QuestionView),
    Feedback(String),
    End(String),
    /// Unprefixed text, or a `QUESTION:` line that does not have five fields.
    Notice(String),
}

impl ServerLine {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(payload) = line.strip_prefix(QUESTION_PREFIX) {
            let parts: Vec<&str> = payload.split(FIELD_SEPARATOR).collect();
            if let [text, a, b, c, d] = parts.as_slice() {
                return ServerLine::Question(QuestionView {
                    text: text.to_string(),
                    options: [a, b, c, d].map(|s| s.to_string()),
                });
            }
            return ServerLine::Notice(line.to_string());
        }

        if let Some(payload) = line.strip_prefix(FEEDBACK_PREFIX) {
            return ServerLine::Feedback(payload.to_string());
        }

        if let Some(payload) = line.strip_prefix(END_PREFIX) {
            return ServerLine::End(payload.to_string());
        }

        ServerLine::Notice(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_case_insensitive() {
        assert_eq!(Command::parse("START"), Ok(Command::Start));
        assert_eq!(Command::parse("  next \r"), Ok(Command::Next));
        assert_eq!(Command::parse("Quit"), Ok(Command::Quit));
        assert_eq!(Command::parse("ANSWER:a"), Ok(Command::Answer(Choice::A)));
        assert_eq!(Command::parse("answer: C "), Ok(Command::Answer(Choice::C)));
    }

    #[test]
    fn test_parse_rejects_bad_answers() {
        assert!(matches!(
            Command::parse("ANSWER:e"),
            Err(CommandError::InvalidAnswer(_))
        ));
        assert!(matches!(
            Command::parse("ANSWER:ab"),
            Err(CommandError::InvalidAnswer(_))
        ));
        assert!(matches!(
            Command::parse("ANSWER:"),
            Err(CommandError::InvalidAnswer(_))
        ));
        assert!(matches!(
            Command::parse("answer"),
            Err(CommandError::InvalidAnswer(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!(Command::parse(""), Err(CommandError::Unknown(_))));
        assert!(matches!(Command::parse("HELLO"), Err(CommandError::Unknown(_))));
        assert!(matches!(Command::parse("START:now"), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn test_response_lines() {
        let question = Question::new("2 + 2?", ["3", "4", "5", "6"], Choice::B);
        assert_eq!(
            Response::Question(question).to_string(),
            "QUESTION:2 + 2?;3;4;5;6"
        );
        assert_eq!(
            Response::Feedback {
                correct: Choice::B,
                was_correct: true
            }
            .to_string(),
            "FEEDBACK:Correct!"
        );
        assert_eq!(
            Response::Feedback {
                correct: Choice::B,
                was_correct: false
            }
            .to_string(),
            "FEEDBACK:Incorrect! The correct answer was b"
        );
        assert_eq!(
            Response::End {
                score: 3,
                empty_bank: false
            }
            .to_string(),
            "END:Quiz over! Your final score is 3"
        );
    }

    #[test]
    fn test_server_line_parse() {
        assert_eq!(
            ServerLine::parse("QUESTION:Q?;w;x;y;z"),
            ServerLine::Question(QuestionView {
                text: "Q?".to_string(),
                options: ["w", "x", "y", "z"].map(String::from),
            })
        );
        assert_eq!(
            ServerLine::parse("FEEDBACK:Correct!"),
            ServerLine::Feedback("Correct!".to_string())
        );
        assert_eq!(
            ServerLine::parse("END:done\r"),
            ServerLine::End("done".to_string())
        );
        assert!(matches!(
            ServerLine::parse("QUESTION:missing;fields"),
            ServerLine::Notice(_)
        ));
        assert!(matches!(ServerLine::parse(WELCOME_BANNER), ServerLine::Notice(_)));
    }

    #[test]
    fn test_command_display_round_trips() {
        for command in [
            Command::Start,
            Command::Next,
            Command::Quit,
            Command::Answer(Choice::D),
        ] {
            assert_eq!(Command::parse(&command.to_string()), Ok(command));
        }
    }
}
