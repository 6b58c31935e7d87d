//! Danbooru 2 endpoints.
//!
//! Searches take `search[...]` parameters. Username and API key are sent as basic auth on every
//! call when both are set, which lifts the anonymous tag and rate limits.
use booru_common::Dialect;
use serde_json::Value;

use super::{dialect_api, tag_string, validate_score, ApiParams};
use crate::error::ApiError;
use crate::request::Params;
use crate::routes::Route;
use crate::transport::Transport;

dialect_api!(
    /// Client for Danbooru based sites.
    DanbooruApi,
    Dialect::Danbooru
);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListParams {
    pub tags: Option<String>,
    /// At most 200.
    pub limit: Option<u32>,
    /// A page number, or `b<id>`/`a<id>` for posts before or after an id.
    pub page: Option<String>,
    /// Search `tags` as a single literal tag.
    pub raw: Option<bool>,
    pub random: Option<bool>,
}

impl PostListParams {
    /// Searches for posts carrying every tag of `tags`.
    #[must_use]
    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = Some(tag_string(tags));
        self
    }
}

impl ApiParams for PostListParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("tags", self.tags.as_ref())
            .with_opt("limit", self.limit)
            .with_opt("page", self.page.as_ref())
            .with_opt("raw", self.raw)
            .with_opt("random", self.random)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagListParams {
    /// Wildcards allowed (`blue_*`).
    pub name_matches: Option<String>,
    /// `0` general, `1` artist, `3` copyright, `4` character, `5` meta.
    pub category: Option<u8>,
    /// `name`, `date` or `count`.
    pub order: Option<String>,
    pub hide_empty: Option<bool>,
    pub has_wiki: Option<bool>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl ApiParams for TagListParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("search[name_matches]", self.name_matches.as_ref())
            .with_opt("search[category]", self.category)
            .with_opt("search[order]", self.order.as_ref())
            .with_opt("search[hide_empty]", self.hide_empty)
            .with_opt("search[has_wiki]", self.has_wiki)
            .with_opt("limit", self.limit)
            .with_opt("page", self.page)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistListParams {
    pub name: Option<String>,
    /// Matches the name, other names and group name.
    pub any_name_matches: Option<String>,
    pub url_matches: Option<String>,
    pub is_deleted: Option<bool>,
    pub is_banned: Option<bool>,
    /// `name`, `updated_at` or `post_count`.
    pub order: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl ApiParams for ArtistListParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("search[name]", self.name.as_ref())
            .with_opt("search[any_name_matches]", self.any_name_matches.as_ref())
            .with_opt("search[url_matches]", self.url_matches.as_ref())
            .with_opt("search[is_deleted]", self.is_deleted)
            .with_opt("search[is_banned]", self.is_banned)
            .with_opt("search[order]", self.order.as_ref())
            .with_opt("limit", self.limit)
            .with_opt("page", self.page)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentListParams {
    pub post_id: Option<u64>,
    pub body_matches: Option<String>,
    pub creator_name: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl ApiParams for CommentListParams {
    fn to_params(&self) -> Params {
        // Without it the endpoint groups comments by post
        Params::new()
            .with("group_by", "comment")
            .with_opt("search[post_id]", self.post_id)
            .with_opt("search[body_matches]", self.body_matches.as_ref())
            .with_opt("search[creator_name]", self.creator_name.as_ref())
            .with_opt("limit", self.limit)
            .with_opt("page", self.page)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiListParams {
    pub title: Option<String>,
    pub body_matches: Option<String>,
    pub other_names_match: Option<String>,
    pub creator_name: Option<String>,
    pub is_deleted: Option<bool>,
    /// `title` or `updated_at`.
    pub order: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl ApiParams for WikiListParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("search[title]", self.title.as_ref())
            .with_opt("search[body_matches]", self.body_matches.as_ref())
            .with_opt("search[other_names_match]", self.other_names_match.as_ref())
            .with_opt("search[creator_name]", self.creator_name.as_ref())
            .with_opt("search[is_deleted]", self.is_deleted)
            .with_opt("search[order]", self.order.as_ref())
            .with_opt("limit", self.limit)
            .with_opt("page", self.page)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolListParams {
    pub name_matches: Option<String>,
    pub description_matches: Option<String>,
    /// `series` or `collection`.
    pub category: Option<String>,
    pub is_deleted: Option<bool>,
    /// `name`, `created_at`, `updated_at` or `post_count`.
    pub order: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl ApiParams for PoolListParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("search[name_matches]", self.name_matches.as_ref())
            .with_opt(
                "search[description_matches]",
                self.description_matches.as_ref(),
            )
            .with_opt("search[category]", self.category.as_ref())
            .with_opt("search[is_deleted]", self.is_deleted)
            .with_opt("search[order]", self.order.as_ref())
            .with_opt("limit", self.limit)
            .with_opt("page", self.page)
    }
}

impl<T: Transport> DanbooruApi<T> {
    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn post_list(&mut self, params: &PostListParams) -> Result<Value, ApiError> {
        self.get(Route::PostList, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn post_show(&mut self, id: u64) -> Result<Value, ApiError> {
        self.client
            .call_with_id(Route::PostShow, id, Params::new())
            .await
    }

    /// Votes for a post. `0` withdraws the vote.
    ///
    /// # Errors
    /// [`ApiError::InvalidParameter`] for scores outside of `0..=3` and [`ApiError::Auth`]
    /// without credentials, both before anything is sent.
    pub async fn post_vote(&mut self, id: u64, score: i32) -> Result<Value, ApiError> {
        let score = validate_score(score)?;
        let params = Params::new().with("score", score);
        self.client.call_with_id(Route::PostVote, id, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn tag_list(&mut self, params: &TagListParams) -> Result<Value, ApiError> {
        self.get(Route::TagList, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn artist_list(&mut self, params: &ArtistListParams) -> Result<Value, ApiError> {
        self.get(Route::ArtistList, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn comment_list(&mut self, params: &CommentListParams) -> Result<Value, ApiError> {
        self.get(Route::CommentList, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn wiki_list(&mut self, params: &WikiListParams) -> Result<Value, ApiError> {
        self.get(Route::WikiList, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn pool_list(&mut self, params: &PoolListParams) -> Result<Value, ApiError> {
        self.get(Route::PoolList, params).await
    }

    /// # Errors
    /// [`ApiError::Auth`] without credentials.
    pub async fn favorite_add(&mut self, post_id: u64) -> Result<Value, ApiError> {
        let params = Params::new().with("post_id", post_id);
        self.client.call(Route::FavoriteAdd, params).await
    }

    /// # Errors
    /// [`ApiError::Auth`] without credentials.
    pub async fn favorite_remove(&mut self, post_id: u64) -> Result<Value, ApiError> {
        self.client
            .call_with_id(Route::FavoriteRemove, post_id, Params::new())
            .await
    }

    /// The logged in user's profile, blacklist included.
    ///
    /// # Errors
    /// [`ApiError::Auth`] without credentials.
    pub async fn profile(&mut self) -> Result<Value, ApiError> {
        self.client.call(Route::Profile, Params::new()).await
    }
}
