use booru_common::Dialect;
use std::io;
use thiserror::Error;

use crate::status::StatusInfo;

/// Enumerates every way a call to an imageboard can fail.
///
/// A call either returns the decoded body or one of these variants. Nothing is retried and
/// nothing is partially returned, so matching on `ApiError` is enough to handle all failure
/// modes in one place.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The site name or URL could not be turned into a usable base URL, or a server
    /// configuration file is invalid.
    #[error("Invalid site configuration: {message}")]
    Config { message: String },

    /// The route requires authentication but the credentials are missing, or the password
    /// could not be hashed with the site template.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// The server answered with a status code outside of the accepted `2xx` set.
    #[error("{status_code}: {reason} -- URL: {url}")]
    Http {
        status_code: u16,
        url: String,
        reason: StatusInfo,
    },

    /// The response body is not valid JSON (or XML for the sites that answer with it).
    #[error("Failed to decode response: {message}{}", position_suffix(.line, .column))]
    Decode {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    /// The request did not complete within the configured timeout.
    #[error("Timeout! URL: {url}")]
    Timeout { url: String },

    /// Any other error while connecting to the server or reading its response.
    #[error("Connection Error: {source}")]
    Connection {
        #[from]
        source: reqwest::Error,
    },

    /// The arguments given to an endpoint method don't make a valid request.
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// The route or HTTP method is not available for this dialect.
    #[error("Route '{route}' is not supported by the {dialect} API")]
    UnsupportedOperation { route: String, dialect: Dialect },

    /// Failed to read an upload or a configuration file.
    #[error("Failed to access file: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

fn position_suffix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" in line {line} column {column}"),
        (Some(line), None) => format!(" in line {line}"),
        _ => String::new(),
    }
}

impl ApiError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// HTTP status code of the failed response, if the error came from one.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// The URL the failed request was sent to, when known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Http { url, .. } | Self::Timeout { url } => Some(url),
            Self::Connection { source } => source.url().map(url::Url::as_str),
            _ => None,
        }
    }
}
