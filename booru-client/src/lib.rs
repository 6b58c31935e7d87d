//! Client for the REST APIs of Danbooru, Moebooru, e621 and Gelbooru based imageboards.
//!
//! A [`BooruClient`] is configured once with a site (a name from the [registry](crate::registry)
//! or any `http`/`https` base URL) and a [`Dialect`]. Every call then runs the same pipeline:
//! the route is translated to the dialect's literal path, the request is authenticated when
//! needed, sent through a [`Transport`](crate::transport::Transport) and the response is decoded
//! into a [`serde_json::Value`] or mapped to an [`ApiError`].
//!
//! ```no_run
//! use booru_client::prelude::*;
//!
//! async fn test() -> Result<(), ApiError> {
//!     let mut konachan = MoebooruApi::new("konachan")?;
//!
//!     let params = moebooru::PostListParams {
//!         tags: Some("blue_eyes".to_string()),
//!         limit: Some(10),
//!         ..Default::default()
//!     };
//!
//!     let posts = konachan.post_list(&params).await?;
//!
//!     println!("{posts:#?}");
//!     println!("{:?}", konachan.client().last_call());
//!     Ok(())
//! }
//! ```
extern crate booru_common;

pub use booru_common::{Dialect, ResponseFormat};

pub mod api;
pub mod auth;
pub mod client;
pub mod dialect;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod request;
pub mod resolver;
pub mod response;
pub mod routes;
pub mod session;
pub mod status;
pub mod transport;
pub mod xml;

#[cfg(test)]
mod test_support;

pub use crate::client::{BooruClient, ClientBuilder};
pub use crate::error::ApiError;
