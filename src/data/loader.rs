use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::Question;
use crate::protocol::{MAX_LINE_LENGTH, QUESTION_PREFIX};

/// Error raised while loading a question file.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// The file is not a valid JSON question list.
    Parse { path: PathBuf, source: serde_json::Error },
    /// The file contains no questions.
    Empty { path: PathBuf },
    /// A question cannot be served over the wire.
    InvalidQuestion { index: usize, reason: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            LoadError::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
            LoadError::Empty { path } => {
                write!(f, "{} must contain at least one question", path.display())
            }
            LoadError::InvalidQuestion { index, reason } => {
                write!(f, "question {} is invalid: {}", index + 1, reason)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Load questions from a JSON array of `{ text, options, correct_answer }`.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let questions = parse_questions(&json_content).map_err(|err| match err {
        ParseFailure::Json(source) => LoadError::Parse {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Empty => LoadError::Empty {
            path: path.to_path_buf(),
        },
        ParseFailure::Invalid(err) => err,
    })?;

    Ok(questions)
}

enum ParseFailure {
    Json(serde_json::Error),
    Empty,
    Invalid(LoadError),
}

fn parse_questions(json: &str) -> Result<Vec<Question>, ParseFailure> {
    let questions: Vec<Question> = serde_json::from_str(json).map_err(ParseFailure::Json)?;

    if questions.is_empty() {
        return Err(ParseFailure::Empty);
    }

    for (index, question) in questions.iter().enumerate() {
        validate_question(question)
            .map_err(|reason| ParseFailure::Invalid(LoadError::InvalidQuestion { index, reason }))?;
    }

    Ok(questions)
}

/// Checks that a question fits the `prompt;a;b;c;d` wire layout.
pub fn validate_question(question: &Question) -> Result<(), String> {
    if question.correct_answer > 3 {
        return Err(format!(
            "correct_answer must be between 0 and 3, got {}",
            question.correct_answer
        ));
    }

    if question.text.trim().is_empty() {
        return Err("question text is empty".to_string());
    }

    let fields = std::iter::once(&question.text).chain(question.options.iter());
    for field in fields {
        if field.contains([';', '\n', '\r']) {
            return Err(format!("text {:?} contains ';' or a line break", field));
        }
    }

    let line_len = QUESTION_PREFIX.len()
        + question.text.len()
        + question.options.iter().map(|o| o.len() + 1).sum::<usize>();
    if line_len > MAX_LINE_LENGTH {
        return Err(format!(
            "question line is {} bytes, longer than the {} byte limit",
            line_len, MAX_LINE_LENGTH
        ));
    }

    Ok(())
}
