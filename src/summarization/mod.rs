//! Natural-language student summaries produced by an external text-generation runtime.
//!
//! The HTTP layer depends only on the [`SummaryClient`] trait; the Ollama-backed implementation
//! streams the generation response and concatenates its fragments.

mod ollama;
pub mod stream;

use async_trait::async_trait;
use thiserror::Error;

use crate::students::StudentRecord;

pub use ollama::OllamaSummaryClient;

/// Errors surfaced while generating a student summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The HTTP client could not be constructed.
    #[error("Failed to construct generation client: {0}")]
    ClientBuild(String),
    /// The generation endpoint was unreachable, answered with a non-200 status, or streamed
    /// data that could not be decoded.
    #[error("Generation request failed: {0}")]
    Upstream(String),
    /// The stream completed without producing any text.
    #[error("Empty response from generation API")]
    EmptyResponse,
}

/// Interface implemented by summary generation backends.
#[async_trait]
pub trait SummaryClient: Send + Sync {
    /// Produce a short, friendly description of the student.
    async fn generate_summary(&self, student: &StudentRecord) -> Result<String, SummaryError>;
}

/// Build the generation prompt for a student profile.
pub fn build_prompt(student: &StudentRecord) -> String {
    format!(
        "Summarize the student's profile with the following information:\n\n\
         Name: {}\nAge: {}\nEmail: {}\n\n\
         Please keep the summary concise and in a friendly tone.",
        student.name, student.age, student.email
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_profile_fields() {
        let prompt = build_prompt(&StudentRecord {
            id: 7,
            name: "Rahul".into(),
            age: 22,
            email: "rahul@gmail.com".into(),
        });

        assert_eq!(
            prompt,
            "Summarize the student's profile with the following information:\n\n\
             Name: Rahul\nAge: 22\nEmail: rahul@gmail.com\n\n\
             Please keep the summary concise and in a friendly tone."
        );
    }
}
