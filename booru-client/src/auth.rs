//! Request authentication for both credential schemes.
//!
//! Danbooru style sites take the username and API key as HTTP basic auth. Moebooru sites expect
//! `login` and `password_hash` fields in the request body, the hash being the hex SHA-1 of a
//! site specific template with the plain password substituted for its `{0}` placeholder.
use log::debug;
use sha1::{Digest, Sha1};
use std::fmt::Debug;

use crate::dialect::AuthScheme;
use crate::error::ApiError;
use crate::request::HttpMethod;

/// Placeholder replaced by the password in Moebooru hash templates.
pub const PASSWORD_PLACEHOLDER: &str = "{0}";

/// Credentials given by the user when building a client. Empty strings count as missing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub api_key: Option<String>,
    pub password: Option<String>,
    /// Overrides the hash template of the site.
    pub hash_template: Option<String>,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &redacted(self.api_key.as_deref()))
            .field("password", &redacted(self.password.as_deref()))
            .field("hash_template", &self.hash_template)
            .finish()
    }
}

/// What has to be added to a request for it to be authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthAttachment {
    None,
    BasicAuth { username: String, api_key: String },
    LoginFields { login: String, password_hash: String },
}

impl Debug for AuthAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::BasicAuth { username, .. } => f
                .debug_struct("BasicAuth")
                .field("username", username)
                .field("api_key", &"<redacted>")
                .finish(),
            Self::LoginFields { login, .. } => f
                .debug_struct("LoginFields")
                .field("login", login)
                .field("password_hash", &"<redacted>")
                .finish(),
        }
    }
}

/// Holds the credentials of a session and decides what each request carries.
#[derive(Clone)]
pub enum Authenticator {
    Token {
        username: Option<String>,
        api_key: Option<String>,
    },
    LegacyHash {
        username: Option<String>,
        password: Option<String>,
        template: Option<String>,
        /// Computed on the first authenticated call, then reused.
        password_hash: Option<String>,
    },
}

impl Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token { username, api_key } => f
                .debug_struct("Token")
                .field("username", username)
                .field("api_key", &redacted(api_key.as_deref()))
                .finish(),
            Self::LegacyHash {
                username,
                password,
                template,
                password_hash,
            } => f
                .debug_struct("LegacyHash")
                .field("username", username)
                .field("password", &redacted(password.as_deref()))
                .field("template", template)
                .field("password_hash", &redacted(password_hash.as_deref()))
                .finish(),
        }
    }
}

const fn redacted(value: Option<&str>) -> Option<&'static str> {
    match value {
        Some(_) => Some("<redacted>"),
        None => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Authenticator {
    /// Builds the authenticator for `scheme`. A template in `credentials` takes precedence over
    /// `site_template`.
    #[must_use]
    pub fn new(scheme: AuthScheme, credentials: Credentials, site_template: Option<&str>) -> Self {
        let username = non_empty(credentials.username);

        match scheme {
            AuthScheme::Token => Self::Token {
                username,
                api_key: non_empty(credentials.api_key),
            },
            AuthScheme::LegacyHash => Self::LegacyHash {
                username,
                password: non_empty(credentials.password),
                template: non_empty(credentials.hash_template)
                    .or_else(|| site_template.map(str::to_string)),
                password_hash: None,
            },
        }
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Token { username, .. } | Self::LegacyHash { username, .. } => {
                username.as_deref()
            }
        }
    }

    /// The cached password digest, once an authenticated call computed it.
    #[must_use]
    pub fn password_hash(&self) -> Option<&str> {
        match self {
            Self::Token { .. } => None,
            Self::LegacyHash { password_hash, .. } => password_hash.as_deref(),
        }
    }

    /// Decides what a request carries.
    ///
    /// The token scheme sends basic auth whenever both the username and key are known, and
    /// requires them on `requires_auth` routes. The legacy scheme only authenticates mutating
    /// calls and routes flagged `requires_auth`.
    ///
    /// # Errors
    /// Returns [`ApiError::Auth`] if authentication is needed but the credentials are missing,
    /// or if the hash template has no `{0}` placeholder.
    pub fn authorize(
        &mut self,
        requires_auth: bool,
        method: HttpMethod,
    ) -> Result<AuthAttachment, ApiError> {
        match self {
            Self::Token { username, api_key } => match (username, api_key) {
                (Some(username), Some(api_key)) => Ok(AuthAttachment::BasicAuth {
                    username: username.clone(),
                    api_key: api_key.clone(),
                }),
                _ if requires_auth => Err(ApiError::auth(
                    "username and api_key are required for this call",
                )),
                _ => Ok(AuthAttachment::None),
            },
            Self::LegacyHash {
                username,
                password,
                template,
                password_hash,
            } => {
                if !requires_auth && !method.is_mutating() {
                    return Ok(AuthAttachment::None);
                }

                let Some(login) = username.clone() else {
                    return Err(ApiError::auth("username is required for this call"));
                };

                let hash = match password_hash.clone() {
                    Some(hash) => hash,
                    None => {
                        let Some(password) = password.as_deref() else {
                            return Err(ApiError::auth("password is required for this call"));
                        };
                        let Some(template) = template.as_deref() else {
                            return Err(ApiError::auth(
                                "This site has no hash template, supply one with the password",
                            ));
                        };
                        let hash = hash_password(template, password)?;
                        debug!("Computed password hash for {login}");
                        *password_hash = Some(hash.clone());
                        hash
                    }
                };

                Ok(AuthAttachment::LoginFields {
                    login,
                    password_hash: hash,
                })
            }
        }
    }
}

/// Hex encoded SHA-1 of `template` with `password` replacing its `{0}` placeholder.
///
/// # Errors
/// Returns [`ApiError::Auth`] if the template has no placeholder.
pub fn hash_password(template: &str, password: &str) -> Result<String, ApiError> {
    if !template.contains(PASSWORD_PLACEHOLDER) {
        return Err(ApiError::auth(format!(
            "Hash template '{template}' has no {PASSWORD_PLACEHOLDER} placeholder"
        )));
    }

    let salted = template.replace(PASSWORD_PLACEHOLDER, password);
    Ok(hex::encode(Sha1::digest(salted.as_bytes())))
}
