//! Client state management.
//!
//! Pure state for the terminal UI: server lines and key actions go in,
//! commands to send come out. Nothing here touches the network.

use crate::models::Choice;
use crate::protocol::{Command, QuestionView, ServerLine};

/// Progress through the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    /// Picking an option; check is enabled.
    Answering,
    /// Answer sent, waiting for feedback.
    Submitted,
    /// Feedback received; only next is enabled.
    Checked { feedback: String },
}

/// Current state of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientState {
    /// Connecting to server.
    Connecting,

    /// Connected, no question loaded yet.
    Waiting,

    /// A question is on screen.
    Quiz {
        question: QuestionView,
        number: usize,
        selected: Option<usize>,
        phase: QuizPhase,
    },

    /// The server sent its final score.
    Finished { message: String },

    /// Disconnected from server.
    Disconnected { message: String },
}

/// Client application state.
pub struct ClientApp {
    /// Current state.
    pub state: ClientState,
    /// Last unprefixed server line or local warning.
    pub notice: Option<String>,
    /// Server address, for display.
    pub server_addr: String,
    /// Whether the client should quit.
    pub should_quit: bool,
    questions_seen: usize,
}

impl ClientApp {
    pub fn new(server_addr: String) -> Self {
        Self {
            state: ClientState::Connecting,
            notice: None,
            server_addr,
            should_quit: false,
            questions_seen: 0,
        }
    }

    pub fn connected(&mut self) {
        if self.state == ClientState::Connecting {
            self.state = ClientState::Waiting;
        }
    }

    /// Apply one line from the server.
    pub fn handle_server_line(&mut self, line: ServerLine) {
        match line {
            ServerLine::Question(question) => {
                self.questions_seen += 1;
                self.notice = None;
                self.state = ClientState::Quiz {
                    question,
                    number: self.questions_seen,
                    selected: None,
                    phase: QuizPhase::Answering,
                };
            }
            ServerLine::Feedback(feedback) => {
                if let ClientState::Quiz { phase, .. } = &mut self.state {
                    *phase = QuizPhase::Checked { feedback };
                }
            }
            ServerLine::End(message) => {
                self.notice = None;
                self.state = ClientState::Finished { message };
            }
            ServerLine::Notice(notice) => {
                // A rejected answer re-opens the question.
                if let ClientState::Quiz { phase, .. } = &mut self.state {
                    if *phase == QuizPhase::Submitted {
                        *phase = QuizPhase::Answering;
                    }
                }
                self.notice = Some(notice);
            }
        }
    }

    /// Move to disconnected state unless the session already ended.
    pub fn disconnect(&mut self, message: String) {
        if !matches!(self.state, ClientState::Finished { .. }) {
            self.state = ClientState::Disconnected { message };
        }
    }

    /// Whether the session on the server is still open.
    pub fn is_live(&self) -> bool {
        matches!(self.state, ClientState::Waiting | ClientState::Quiz { .. })
    }

    pub fn can_check(&self) -> bool {
        matches!(
            self.state,
            ClientState::Quiz {
                phase: QuizPhase::Answering,
                ..
            }
        )
    }

    pub fn can_next(&self) -> bool {
        matches!(
            self.state,
            ClientState::Quiz {
                phase: QuizPhase::Checked { .. },
                ..
            }
        )
    }

    /// Select next option in quiz.
    pub fn select_next_option(&mut self) {
        self.move_selection(1);
    }

    /// Select previous option in quiz.
    pub fn select_previous_option(&mut self) {
        self.move_selection(3);
    }

    fn move_selection(&mut self, step: usize) {
        if !self.can_check() {
            return;
        }
        if let ClientState::Quiz { selected, .. } = &mut self.state {
            *selected = Some(match *selected {
                Some(current) => (current + step) % 4,
                None if step == 1 => 0,
                None => 3,
            });
        }
    }

    /// Get current selected option.
    pub fn selected_option(&self) -> Option<usize> {
        if let ClientState::Quiz { selected, .. } = &self.state {
            *selected
        } else {
            None
        }
    }

    /// Submit the selected option. Returns the command to send, if any.
    pub fn check(&mut self) -> Option<Command> {
        if !self.can_check() {
            return None;
        }

        let ClientState::Quiz {
            selected, phase, ..
        } = &mut self.state
        else {
            return None;
        };

        match selected.and_then(Choice::from_index) {
            Some(choice) => {
                *phase = QuizPhase::Submitted;
                self.notice = None;
                Some(Command::Answer(choice))
            }
            None => {
                self.notice = Some("Please select an answer.".to_string());
                None
            }
        }
    }

    /// Ask for the next question once feedback has arrived.
    pub fn next(&mut self) -> Option<Command> {
        if !self.can_next() {
            return None;
        }
        if let ClientState::Quiz { phase, .. } = &mut self.state {
            *phase = QuizPhase::Submitted;
        }
        Some(Command::Next)
    }

    /// Leave the client. Sends `QUIT` while the session is still open.
    pub fn quit(&mut self) -> Option<Command> {
        self.should_quit = true;
        self.is_live().then_some(Command::Quit)
    }
}
