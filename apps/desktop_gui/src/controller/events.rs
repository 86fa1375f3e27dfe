//! Backend-to-UI events and error modeling for the desktop GUI controller.

use client_core::ClientError;
use shared::domain::{Book, BookId};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    BooksLoaded { generation: u64, books: Vec<Book> },
    BookSaved { book: Book },
    BookDeleted { id: BookId },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Rejected,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Refresh,
    Save,
    Delete,
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Rejected => "Server",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

fn context_summary(context: UiErrorContext) -> &'static str {
    match context {
        UiErrorContext::BackendStartup => "Backend worker failed to start",
        UiErrorContext::Refresh => "Could not load books",
        UiErrorContext::Save => "Could not save book",
        UiErrorContext::Delete => "Could not delete book",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Transport { .. } => UiErrorCategory::Transport,
            ClientError::Rejected { status, .. } if matches!(status.as_u16(), 400 | 422) => {
                UiErrorCategory::Validation
            }
            ClientError::Rejected { .. } => UiErrorCategory::Rejected,
            ClientError::InvalidBaseUrl { .. } | ClientError::UnsupportedScheme { .. } => {
                UiErrorCategory::Validation
            }
            ClientError::Decode { .. } => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    /// Classifies free-form failure text, e.g. runtime startup errors that
    /// never went through the HTTP client.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unavailable")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line status text for the footer.
    pub fn status_line(&self) -> String {
        format!(
            "{} ({} error): {}",
            context_summary(self.context),
            err_label(self.category).to_ascii_lowercase(),
            self.message
        )
    }
}
