//! The read-only question bank shared by every session.

use std::fmt;

use crate::models::Question;

use super::{validate_question, LoadError};

/// Lookup past the end of the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound {
    pub index: usize,
    pub len: usize,
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "question index {} out of range (bank holds {})",
            self.index, self.len
        )
    }
}

impl std::error::Error for NotFound {}

/// Immutable, ordered list of questions.
///
/// Built once at startup and shared behind an `Arc`; there is no write path.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, rejecting questions that cannot be sent over the wire.
    pub fn new(questions: Vec<Question>) -> Result<Self, LoadError> {
        for (index, question) in questions.iter().enumerate() {
            validate_question(question)
                .map_err(|reason| LoadError::InvalidQuestion { index, reason })?;
        }
        Ok(Self { questions })
    }

    /// The bank compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            questions: super::builtin::questions(),
        }
    }

    pub fn get(&self, index: usize) -> Result<&Question, NotFound> {
        self.questions.get(index).ok_or(NotFound {
            index,
            len: self.questions.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Choice;

    #[test]
    fn test_get_checks_bounds() {
        let bank = QuestionBank::new(vec![Question::new(
            "Capital of France?",
            ["Paris", "Rome", "Madrid", "Berlin"],
            Choice::A,
        )])
        .unwrap();

        assert_eq!(bank.len(), 1);
        assert!(bank.get(0).is_ok());
        assert_eq!(bank.get(1), Err(NotFound { index: 1, len: 1 }));
    }

    #[test]
    fn test_empty_bank_is_allowed() {
        let bank = QuestionBank::new(Vec::new()).unwrap();
        assert!(bank.is_empty());
        assert!(bank.get(0).is_err());
    }

    #[test]
    fn test_builtin_bank_is_valid() {
        let bank = QuestionBank::builtin();
        assert!(!bank.is_empty());
        for i in 0..bank.len() {
            let question = bank.get(i).unwrap();
            assert!(validate_question(question).is_ok());
            assert!(question.correct_choice().is_some());
        }
    }

    #[test]
    fn test_new_rejects_overlong_question() {
        let prompt = "x".repeat(1100);
        let result = QuestionBank::new(vec![Question::new(
            &prompt,
            ["a", "b", "c", "d"],
            Choice::A,
        )]);
        assert!(matches!(result, Err(LoadError::InvalidQuestion { index: 0, .. })));
    }

    #[test]
    fn test_new_rejects_unsafe_text() {
        let result = QuestionBank::new(vec![Question::new(
            "Line\nbreak",
            ["a", "b", "c", "d"],
            Choice::B,
        )]);
        assert!(result.is_err());
    }
}
