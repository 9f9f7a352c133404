use serde::Deserialize;

use super::Choice;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: [String; 4],
    pub correct_answer: usize,
}

impl Question {
    pub fn new(text: &str, options: [&str; 4], correct: Choice) -> Self {
        Self {
            text: text.to_string(),
            options: options.map(str::to_string),
            correct_answer: correct.index(),
        }
    }

    /// The correct option as a letter choice.
    ///
    /// Returns `None` only for a question that was never validated.
    pub fn correct_choice(&self) -> Option<Choice> {
        Choice::from_index(self.correct_answer)
    }

    pub fn is_correct(&self, choice: Choice) -> bool {
        self.correct_answer == choice.index()
    }
}
