//! Error types and utilities for Vouch Bot

use crate::types::ChannelId;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for vouch operations
pub type Result<T> = std::result::Result<T, VouchError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for vouch operations
#[derive(Error, Debug)]
pub enum VouchError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong.
        message: String,
        /// Underlying cause, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Validation errors for user input
    #[error("Validation error: {message}")]
    Validation {
        /// Message shown to the user.
        message: String,
        /// Offending command option, if known.
        field: Option<String>,
    },

    /// The caller is not allowed to run the command here
    #[error("Auth error: {message}")]
    Auth {
        /// Message shown to the user.
        message: String,
    },

    /// Reading or writing the vouch store failed
    #[error("Persistence error: {message}")]
    Persistence {
        /// What went wrong.
        message: String,
        /// Underlying cause, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Discord API related errors (user lookups, message delivery)
    #[error("Discord API error: {message}")]
    Discord {
        /// What went wrong.
        message: String,
        /// Underlying cause, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// An external call did not finish in time
    #[error("{operation} timed out after {}s", .after.as_secs())]
    Timeout {
        /// The operation that was abandoned.
        operation: String,
        /// The configured bound.
        after: Duration,
    },

    /// The configured vouch channel does not exist in the guild
    #[error("Vouch channel {channel} not found")]
    DestinationMissing {
        /// The configured channel.
        channel: ChannelId,
    },

}

impl VouchError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new auth error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth { message: msg.into() }
    }

    /// Create a new persistence error with source
    pub fn persistence_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Persistence {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new Discord API error
    pub fn discord(msg: impl Into<String>) -> Self {
        Self::Discord {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new Discord API error with source
    pub fn discord_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Discord {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new timeout error
    pub fn timeout(operation: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            after,
        }
    }

    /// Whether the message of this error is meant for the person who ran the
    /// command. Everything else gets a generic reply and goes to the log.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Auth { .. })
    }

    /// The short text to show the user for user-facing errors.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Validation { message, .. } | Self::Auth { message } => Some(message.clone()),
            _ => None,
        }
    }
}
