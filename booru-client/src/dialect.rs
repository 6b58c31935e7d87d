//! Per-dialect behavior, selected once when a client is built.
use booru_common::{Dialect, ResponseFormat};

/// How requests are authenticated on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScheme {
    /// HTTP basic auth with the username and API key.
    Token,
    /// `login` and `password_hash` body fields, the hash being a SHA-1 of a site template
    /// formatted with the plain password.
    LegacyHash,
}

/// How a route's literal path is turned into a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStyle {
    /// The path is appended to the base URL as is (`/posts.json`).
    Literal,
    /// `/<route>.json`, or `/<route>/index.json` for top level routes on legacy API versions.
    Moebooru,
    /// `/index.php?page=dapi&s=<route>&q=index`.
    Dapi,
}

/// Strategy object describing everything that differs between dialects at the request level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialectConfig {
    pub auth: AuthScheme,
    pub paths: PathStyle,
    pub format: ResponseFormat,
    /// Only `GET` routes are exposed.
    pub read_only: bool,
}

impl DialectConfig {
    #[must_use]
    pub const fn for_dialect(dialect: Dialect) -> Self {
        let (auth, paths) = match dialect {
            Dialect::Danbooru | Dialect::E621 => (AuthScheme::Token, PathStyle::Literal),
            Dialect::Moebooru => (AuthScheme::LegacyHash, PathStyle::Moebooru),
            Dialect::Gelbooru => (AuthScheme::Token, PathStyle::Dapi),
        };

        Self {
            auth,
            paths,
            format: dialect.default_format(),
            read_only: dialect.is_read_only(),
        }
    }

    /// Overrides the response format, for sites that answer differently than their dialect.
    #[must_use]
    pub const fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }
}

impl From<Dialect> for DialectConfig {
    fn from(dialect: Dialect) -> Self {
        Self::for_dialect(dialect)
    }
}
