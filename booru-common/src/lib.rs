use std::{
    env,
    fmt::Display,
    fs::create_dir_all,
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

// Public Exports
pub use directories;
pub use log;
pub use reqwest;
pub use serde;
pub use serde_json;
pub use tokio;

use directories::ProjectDirs;

use log::debug;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod macros;

/// All API dialects spoken by the supported imageboards.
///
/// Several independent websites run the same software, so the client talks to a dialect rather
/// than to a specific website.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Represents ```https://danbooru.donmai.us``` and every site running Danbooru 2.
    Danbooru,
    /// Represents ```https://konachan.com```, ```https://yande.re``` and other Moebooru sites.
    Moebooru,
    /// Represents ```https://e621.net``` or it's safe variant ```https://e926.net```.
    E621,
    /// Represents ```https://gelbooru.com``` and the sites sharing its `dapi` endpoint.
    Gelbooru,
}

impl Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Danbooru => write!(f, "danbooru"),
            Self::Moebooru => write!(f, "moebooru"),
            Self::E621 => write!(f, "e621"),
            Self::Gelbooru => write!(f, "gelbooru"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown API dialect: {0}")]
    UnknownDialect(String),

    #[error("Unknown response format: {0}")]
    UnknownFormat(String),
}

impl FromStr for Dialect {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "danbooru" => Ok(Self::Danbooru),
            "moebooru" => Ok(Self::Moebooru),
            "e621" => Ok(Self::E621),
            "gelbooru" => Ok(Self::Gelbooru),
            _ => Err(ParseError::UnknownDialect(s.to_string())),
        }
    }
}

impl Dialect {
    /// Each variant can generate a specific user-agent to connect to the imageboard site.
    ///
    /// It will always follow the version declared inside ```Cargo.toml```
    #[inline]
    #[must_use]
    pub fn user_agent(self) -> String {
        let app_name = "Rust Booru Client";
        let ua = format!("{}/{} ({})", app_name, env!("CARGO_PKG_VERSION"), self);
        debug!("Using user-agent: {}", ua);
        ua
    }

    /// Format the responses of this dialect are encoded with, unless the site overrides it.
    #[inline]
    #[must_use]
    pub const fn default_format(self) -> ResponseFormat {
        ResponseFormat::Json
    }

    /// Whether the client only exposes read (`GET`) routes for this dialect.
    #[inline]
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::E621 | Self::Gelbooru)
    }

    /// Returns a `PathBuf` pointing to the client's configuration directory.
    ///
    /// This is XDG-compliant and resolves to
    /// `$XDG_CONFIG_HOME/booru-client` on Linux or
    /// `%APPDATA%/booru-rs/booru-client` on Windows
    ///
    /// Or you can set the env var `BOORU_CONFIG_DIR` to point it to a custom location.
    pub fn config_dir() -> Result<PathBuf, io::Error> {
        let cfg_path = match env::var("BOORU_CONFIG_DIR") {
            Ok(path) => path,
            Err(_) => {
                let cdir = ProjectDirs::from("com", "booru-rs", "booru-client").ok_or_else(|| {
                    io::Error::new(io::ErrorKind::NotFound, "No home directory available")
                })?;
                cdir.config_dir().to_string_lossy().to_string()
            }
        };

        let cfold = Path::new(&cfg_path);

        if !cfold.exists() {
            create_dir_all(cfold)?;
        }

        Ok(cfold.to_path_buf())
    }
}

/// Body encoding used by a site for its API responses.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

impl Display for ResponseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Xml => write!(f, "xml"),
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            _ => Err(ParseError::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dialect_names_round_trip_through_display() {
        for dialect in [
            Dialect::Danbooru,
            Dialect::Moebooru,
            Dialect::E621,
            Dialect::Gelbooru,
        ] {
            assert_eq!(Dialect::from_str(&dialect.to_string()), Ok(dialect));
        }
    }

    #[test]
    fn dialect_parsing_ignores_case() {
        assert_eq!(Dialect::from_str("MoeBooru"), Ok(Dialect::Moebooru));
        assert_eq!(
            Dialect::from_str("shimmie"),
            Err(ParseError::UnknownDialect("shimmie".to_string()))
        );
    }

    #[test]
    fn only_read_dialects_are_flagged() {
        assert!(!Dialect::Danbooru.is_read_only());
        assert!(!Dialect::Moebooru.is_read_only());
        assert!(Dialect::E621.is_read_only());
        assert!(Dialect::Gelbooru.is_read_only());
    }

    #[test]
    fn user_agent_carries_crate_version() {
        let ua = Dialect::Danbooru.user_agent();
        assert!(ua.starts_with("Rust Booru Client/"));
        assert!(ua.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn response_format_parsing() {
        assert_eq!(ResponseFormat::from_str("XML"), Ok(ResponseFormat::Xml));
        assert_eq!(ResponseFormat::default(), ResponseFormat::Json);
        assert!(ResponseFormat::from_str("yaml").is_err());
    }
}
