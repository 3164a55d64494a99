use thiserror::Error;

use crate::validation::ValidationIssue;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("invalid card json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("card type must be \"AdaptiveCard\", found \"{found}\"")]
    UnexpectedCardType { found: String },
    #[error("card validation failed: {}", format_issues(.issues))]
    Validation { issues: Vec<ValidationIssue> },
    #[error("binding error: {0}")]
    Binding(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| {
            if issue.path.is_empty() {
                issue.message.clone()
            } else {
                format!("{}: {}", issue.path, issue.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
