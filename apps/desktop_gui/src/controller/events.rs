//! UI/backend events and error modeling for the dashboard controller.

use std::fmt;

use client_core::SourceError;
use shared::domain::{CategoryRecord, ProductPage};

pub enum UiEvent {
    ProductsFetched {
        seq: u64,
        result: Result<ProductPage, UiError>,
    },
    CategoriesLoaded(Vec<CategoryRecord>),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Remote,
    Transport,
    Decode,
    Backend,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Products,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_source(context: UiErrorContext, err: &SourceError) -> Self {
        let category = match err {
            SourceError::Remote(_) => UiErrorCategory::Remote,
            SourceError::Transport(_) => UiErrorCategory::Transport,
            SourceError::Decode(_) => UiErrorCategory::Decode,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("backend worker")
            || message_lower.contains("command queue")
            || message_lower.contains("command processor")
        {
            UiErrorCategory::Backend
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("dns")
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
}

/// Renders only the message, which is what the dashboard shows verbatim.
impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Remote => "Query",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Decode => "Response",
        UiErrorCategory::Backend => "Backend",
        UiErrorCategory::Unknown => "Unexpected",
    }
}
