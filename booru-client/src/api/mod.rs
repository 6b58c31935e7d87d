//! Typed endpoint methods, one wrapper per dialect.
//!
//! Each wrapper owns a [`BooruClient`](crate::BooruClient) and turns an explicit parameter
//! struct into the parameter names its dialect expects. Anything not covered here can still be
//! reached with [`BooruClient::call`](crate::BooruClient::call) through
//! [`client_mut`](MoebooruApi::client_mut).
use booru_common::join_tags;

use crate::error::ApiError;
use crate::request::Params;

/// Converts a parameter struct into request parameters. Unset fields are left out.
pub trait ApiParams {
    fn to_params(&self) -> Params;
}

/// Highest accepted vote score.
pub const MAX_VOTE_SCORE: i32 = 3;

/// Accepts `0..=3`: remove vote, good, great, favorite.
///
/// # Errors
/// Returns [`ApiError::InvalidParameter`] for any other score.
pub fn validate_score(score: i32) -> Result<u8, ApiError> {
    if (0..=MAX_VOTE_SCORE).contains(&score) {
        u8::try_from(score).map_err(|_| ApiError::invalid_param("Invalid score"))
    } else {
        Err(ApiError::invalid_param(format!(
            "Value of score can only be 0, 1, 2 or 3, got {score}"
        )))
    }
}

/// Joins `tags` into one search string. Empty entries are skipped.
pub(crate) fn tag_string<S: AsRef<str>>(tags: &[S]) -> String {
    let tags: Vec<&str> = tags
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect();
    join_tags!(tags)
}

pub(crate) fn require_text(name: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid_param(format!("'{name}' can't be empty")));
    }
    Ok(())
}

/// Generates a dialect wrapper around [`BooruClient`](crate::BooruClient) with its
/// constructors and accessors.
macro_rules! dialect_api {
    ($(#[$meta:meta])* $name:ident, $dialect:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<T: $crate::transport::Transport = $crate::transport::ReqwestTransport> {
            client: $crate::client::BooruClient<T>,
        }

        impl $name {
            /// Anonymous client for a registered site.
            ///
            /// # Errors
            /// Returns [`ApiError::Config`](crate::ApiError::Config) if the site is unknown or
            /// speaks another dialect.
            pub fn new(site_name: &str) -> Result<Self, $crate::error::ApiError> {
                Self::from_client($crate::client::BooruClient::new($dialect, site_name)?)
            }

            /// Starts a builder for this dialect, for credentials or custom URLs.
            #[must_use]
            pub fn builder() -> $crate::client::ClientBuilder {
                $crate::client::ClientBuilder::new($dialect)
            }
        }

        impl<T: $crate::transport::Transport> $name<T> {
            /// Wraps a client built for this dialect.
            ///
            /// # Errors
            /// Returns [`ApiError::Config`](crate::ApiError::Config) for clients of another
            /// dialect.
            pub fn from_client(
                client: $crate::client::BooruClient<T>,
            ) -> Result<Self, $crate::error::ApiError> {
                if client.dialect() != $dialect {
                    return Err($crate::error::ApiError::config(format!(
                        "Expected a {} client, got {}",
                        $dialect,
                        client.dialect()
                    )));
                }
                Ok(Self { client })
            }

            #[must_use]
            pub const fn client(&self) -> &$crate::client::BooruClient<T> {
                &self.client
            }

            pub fn client_mut(&mut self) -> &mut $crate::client::BooruClient<T> {
                &mut self.client
            }

            #[must_use]
            pub fn into_inner(self) -> $crate::client::BooruClient<T> {
                self.client
            }

            async fn get<P: $crate::api::ApiParams>(
                &mut self,
                route: $crate::routes::Route,
                params: &P,
            ) -> Result<serde_json::Value, $crate::error::ApiError> {
                self.client.call(route, params.to_params()).await
            }
        }
    };
}

pub(crate) use dialect_api;

#[cfg(feature = "danbooru")]
pub mod danbooru;
#[cfg(feature = "e621")]
pub mod e621;
#[cfg(feature = "gelbooru")]
pub mod gelbooru;
#[cfg(feature = "moebooru")]
pub mod moebooru;

#[cfg(feature = "danbooru")]
pub use danbooru::DanbooruApi;
#[cfg(feature = "e621")]
pub use e621::E621Api;
#[cfg(feature = "gelbooru")]
pub use gelbooru::GelbooruApi;
#[cfg(feature = "moebooru")]
pub use moebooru::MoebooruApi;
