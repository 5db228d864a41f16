pub mod quiz_question;
pub mod usage_entry;

pub use quiz_question::QuizQuestion;
pub use usage_entry::UsageEntry;
