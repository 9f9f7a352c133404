//! Per-connection quiz session.
//!
//! A [`Session`] is a plain value owned by the task serving one connection.
//! It never touches the network: it turns commands into responses and
//! advances its own state, reading questions from the shared bank.

use std::fmt;

use crate::data::{NotFound, QuestionBank};
use crate::protocol::{Command, CommandError, Response};

/// Where a session is in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, waiting for `START`.
    AwaitingStart,
    /// A question has been sent, waiting for `ANSWER`.
    AwaitingAnswer,
    /// Feedback has been sent, waiting for `NEXT`.
    AwaitingNext,
    /// Final score sent. Terminal.
    Finished,
}

impl SessionState {
    /// Commands accepted in this state, as shown to the client.
    fn expected(self) -> &'static str {
        match self {
            SessionState::AwaitingStart => "START or QUIT",
            SessionState::AwaitingAnswer => "ANSWER:<a-d> or QUIT",
            SessionState::AwaitingNext => "NEXT or QUIT",
            SessionState::Finished => "nothing",
        }
    }
}

/// Internal invariant violation. The session cannot continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    QuestionIndexOutOfRange(NotFound),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::QuestionIndexOutOfRange(e) => write!(f, "session invariant broken: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::QuestionIndexOutOfRange(e) => Some(e),
        }
    }
}

impl From<NotFound> for SessionError {
    fn from(err: NotFound) -> Self {
        SessionError::QuestionIndexOutOfRange(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    state: SessionState,
    current_index: usize,
    score: usize,
    answered: usize,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::AwaitingStart,
            current_index: 0,
            score: 0,
            answered: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Number of `ANSWER` commands accepted so far.
    pub fn answered(&self) -> usize {
        self.answered
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    /// Handle one raw input line.
    ///
    /// A finished session ignores its input and returns no responses.
    pub fn handle_line(
        &mut self,
        bank: &QuestionBank,
        line: &str,
    ) -> Result<Vec<Response>, SessionError> {
        if self.is_finished() {
            return Ok(Vec::new());
        }

        match Command::parse(line) {
            Ok(command) => self.handle(bank, command),
            Err(CommandError::InvalidAnswer(_)) => Ok(vec![Response::InvalidAnswer]),
            Err(CommandError::Unknown(_)) => Ok(vec![self.invalid_command()]),
        }
    }

    /// Apply a parsed command.
    ///
    /// On error the session is forced into [`SessionState::Finished`].
    pub fn handle(
        &mut self,
        bank: &QuestionBank,
        command: Command,
    ) -> Result<Vec<Response>, SessionError> {
        let result = self.apply(bank, command);
        if result.is_err() {
            self.state = SessionState::Finished;
        }
        result
    }

    fn apply(&mut self, bank: &QuestionBank, command: Command) -> Result<Vec<Response>, SessionError> {
        let responses = match (self.state, command) {
            (SessionState::Finished, _) => Vec::new(),

            (_, Command::Quit) => vec![self.finish(false)],

            (SessionState::AwaitingStart, Command::Start) => {
                if bank.is_empty() {
                    vec![self.finish(true)]
                } else {
                    let question = bank.get(0)?.clone();
                    self.current_index = 0;
                    self.state = SessionState::AwaitingAnswer;
                    vec![Response::Question(question)]
                }
            }

            (SessionState::AwaitingAnswer, Command::Answer(choice)) => {
                let question = bank.get(self.current_index)?;
                let correct = question
                    .correct_choice()
                    .ok_or(NotFound {
                        index: question.correct_answer,
                        len: 4,
                    })?;
                let was_correct = question.is_correct(choice);

                self.answered += 1;
                if was_correct {
                    self.score += 1;
                }
                self.state = SessionState::AwaitingNext;
                vec![Response::Feedback {
                    correct,
                    was_correct,
                }]
            }

            (SessionState::AwaitingNext, Command::Next) => {
                let next = self.current_index + 1;
                if next < bank.len() {
                    let question = bank.get(next)?.clone();
                    self.current_index = next;
                    self.state = SessionState::AwaitingAnswer;
                    vec![Response::Question(question)]
                } else {
                    self.current_index = bank.len();
                    vec![self.finish(false)]
                }
            }

            _ => vec![self.invalid_command()],
        };

        Ok(responses)
    }

    fn finish(&mut self, empty_bank: bool) -> Response {
        self.state = SessionState::Finished;
        Response::End {
            score: self.score,
            empty_bank,
        }
    }

    fn invalid_command(&self) -> Response {
        Response::InvalidCommand {
            expected: self.state.expected(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Choice, Question};

    fn two_question_bank() -> QuestionBank {
        QuestionBank::new(vec![
            Question::new("First?", ["one", "two", "three", "four"], Choice::A),
            Question::new("Second?", ["one", "two", "three", "four"], Choice::B),
        ])
        .unwrap()
    }

    fn lines(responses: Vec<Response>) -> Vec<String> {
        responses.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_full_scenario() {
        let bank = two_question_bank();
        let mut session = Session::new();

        assert_eq!(
            lines(session.handle_line(&bank, "START").unwrap()),
            vec!["QUESTION:First?;one;two;three;four"]
        );
        assert_eq!(session.state(), SessionState::AwaitingAnswer);

        assert_eq!(
            lines(session.handle_line(&bank, "ANSWER:a").unwrap()),
            vec!["FEEDBACK:Correct!"]
        );
        assert_eq!(session.score(), 1);
        assert_eq!(session.state(), SessionState::AwaitingNext);

        assert_eq!(
            lines(session.handle_line(&bank, "NEXT").unwrap()),
            vec!["QUESTION:Second?;one;two;three;four"]
        );
        assert_eq!(session.current_index(), 1);

        assert_eq!(
            lines(session.handle_line(&bank, "ANSWER:a").unwrap()),
            vec!["FEEDBACK:Incorrect! The correct answer was b"]
        );
        assert_eq!(session.score(), 1);

        let end = lines(session.handle_line(&bank, "NEXT").unwrap());
        assert_eq!(end.len(), 1);
        assert!(end[0].starts_with("END:"));
        assert!(end[0].ends_with("final score is 1"));
        assert!(session.is_finished());
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn test_quit_after_start() {
        let bank = two_question_bank();
        let mut session = Session::new();
        session.handle_line(&bank, "start").unwrap();

        let end = lines(session.handle_line(&bank, "QUIT").unwrap());
        assert_eq!(end, vec!["END:Quiz over! Your final score is 0"]);
        assert!(session.is_finished());
    }

    #[test]
    fn test_quit_before_start() {
        let bank = two_question_bank();
        let mut session = Session::new();
        let end = session.handle(&bank, Command::Quit).unwrap();
        assert_eq!(
            end,
            vec![Response::End {
                score: 0,
                empty_bank: false
            }]
        );
    }

    #[test]
    fn test_empty_bank_finishes_on_start() {
        let bank = QuestionBank::new(Vec::new()).unwrap();
        let mut session = Session::new();
        let end = lines(session.handle_line(&bank, "START").unwrap());
        assert_eq!(end, vec!["END:No questions available. Your final score is 0"]);
        assert!(session.is_finished());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_invalid_commands_keep_state() {
        let bank = two_question_bank();
        let mut session = Session::new();

        for line in ["NEXT", "ANSWER:a", "hello", "", "START:x"] {
            let before = session.clone();
            let responses = session.handle_line(&bank, line).unwrap();
            assert_eq!(responses.len(), 1);
            assert!(!responses[0].to_string().starts_with("QUESTION:"));
            assert_eq!(session, before, "line {:?} changed the session", line);
        }

        session.handle_line(&bank, "START").unwrap();
        let before = session.clone();
        assert_eq!(
            session.handle_line(&bank, "NEXT").unwrap(),
            vec![Response::InvalidCommand {
                expected: "ANSWER:<a-d> or QUIT"
            }]
        );
        assert_eq!(
            session.handle_line(&bank, "START").unwrap(),
            vec![Response::InvalidCommand {
                expected: "ANSWER:<a-d> or QUIT"
            }]
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_malformed_answer_does_not_advance() {
        let bank = two_question_bank();
        let mut session = Session::new();
        session.handle_line(&bank, "START").unwrap();

        for line in ["ANSWER:", "ANSWER:e", "ANSWER:ab", "ANSWER"] {
            assert_eq!(
                session.handle_line(&bank, line).unwrap(),
                vec![Response::InvalidAnswer]
            );
            assert_eq!(session.state(), SessionState::AwaitingAnswer);
            assert_eq!(session.answered(), 0);
        }
    }

    #[test]
    fn test_answer_is_case_insensitive() {
        let bank = two_question_bank();
        let mut session = Session::new();
        session.handle_line(&bank, "START").unwrap();
        session.handle_line(&bank, "answer:A").unwrap();
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_second_answer_rejected() {
        let bank = two_question_bank();
        let mut session = Session::new();
        session.handle_line(&bank, "START").unwrap();
        session.handle_line(&bank, "ANSWER:a").unwrap();
        session.handle_line(&bank, "ANSWER:a").unwrap();
        assert_eq!(session.score(), 1);
        assert_eq!(session.answered(), 1);
    }

    #[test]
    fn test_finished_ignores_input() {
        let bank = two_question_bank();
        let mut session = Session::new();
        session.handle_line(&bank, "QUIT").unwrap();
        let before = session.clone();

        for line in ["START", "NEXT", "ANSWER:a", "QUIT", "junk"] {
            assert!(session.handle_line(&bank, line).unwrap().is_empty());
        }
        assert_eq!(session, before);
    }

    #[test]
    fn test_counters_are_monotonic_and_bounded() {
        let bank = QuestionBank::builtin();
        let script = [
            "ANSWER:c", "START", "NEXT", "ANSWER:a", "ANSWER:b", "NEXT", "ANSWER:b", "bogus",
            "NEXT", "ANSWER:c", "NEXT", "ANSWER:d", "NEXT", "ANSWER:a", "NEXT", "NEXT",
        ];

        let mut session = Session::new();
        let mut last = (0, 0);
        for line in script {
            session.handle_line(&bank, line).unwrap();
            let now = (session.current_index(), session.score());
            assert!(now.0 >= last.0 && now.1 >= last.1);
            assert!(session.current_index() <= bank.len());
            assert!(session.score() <= session.answered());
            last = now;
        }
        assert!(session.is_finished());
        assert_eq!(session.current_index(), bank.len());
    }

    #[test]
    fn test_out_of_range_forces_finish() {
        let bank = two_question_bank();
        let mut session = Session::new();
        session.handle_line(&bank, "START").unwrap();

        // Same session played against a bank that has lost its questions.
        let shrunk = QuestionBank::new(Vec::new()).unwrap();
        let err = session.handle(&shrunk, Command::Answer(Choice::A)).unwrap_err();
        assert!(matches!(err, SessionError::QuestionIndexOutOfRange(_)));
        assert!(session.is_finished());
    }
}
