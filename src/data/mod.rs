mod bank;
mod builtin;
mod loader;

pub use bank::{NotFound, QuestionBank};
pub use loader::{load_questions_from_json, validate_question, LoadError};
