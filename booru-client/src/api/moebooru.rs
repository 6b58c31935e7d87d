//! Moebooru (`konachan`, `yande.re`) endpoints.
//!
//! Reads are anonymous. Every call that modifies something needs a username and password,
//! which are sent hashed with the site's template.
use booru_common::Dialect;
use serde_json::Value;

use super::{dialect_api, require_text, tag_string, validate_score, ApiParams};
use crate::error::ApiError;
use crate::request::{FileUpload, Params};
use crate::routes::Route;
use crate::transport::Transport;

dialect_api!(
    /// Client for Moebooru based sites.
    MoebooruApi,
    Dialect::Moebooru
);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListParams {
    /// Any tag combination the site's search box accepts, meta-tags included.
    pub tags: Option<String>,
    /// At most 100.
    pub limit: Option<u32>,
    pub page: Option<u32>,
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
            .with_opt("page", self.page)
    }
}

/// Either `file` or `source` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostCreateParams {
    /// Space delimited.
    pub tags: String,
    pub file: Option<FileUpload>,
    /// The site downloads the file from this URL.
    pub source: Option<String>,
    /// `safe`, `questionable` or `explicit`.
    pub rating: Option<String>,
    pub is_rating_locked: Option<bool>,
    pub is_note_locked: Option<bool>,
    pub parent_id: Option<u64>,
    /// The post is destroyed if the uploaded file doesn't match.
    pub md5: Option<String>,
}

impl ApiParams for PostCreateParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with("post[tags]", &self.tags)
            .with_opt("post[file]", self.file.clone())
            .with_opt("post[source]", self.source.as_ref())
            .with_opt("post[rating]", self.rating.as_ref())
            .with_opt("post[is_rating_locked]", self.is_rating_locked)
            .with_opt("post[is_note_locked]", self.is_note_locked)
            .with_opt("post[parent_id]", self.parent_id)
            .with_opt("md5", self.md5.as_ref())
    }
}

/// Only `id` is required, unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostUpdateParams {
    pub id: u64,
    pub tags: Option<String>,
    pub file: Option<FileUpload>,
    pub source: Option<String>,
    pub rating: Option<String>,
    pub is_rating_locked: Option<bool>,
    pub is_note_locked: Option<bool>,
    pub parent_id: Option<u64>,
}

impl ApiParams for PostUpdateParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with("id", self.id)
            .with_opt("post[tags]", self.tags.as_ref())
            .with_opt("post[file]", self.file.clone())
            .with_opt("post[source]", self.source.as_ref())
            .with_opt("post[rating]", self.rating.as_ref())
            .with_opt("post[is_rating_locked]", self.is_rating_locked)
            .with_opt("post[is_note_locked]", self.is_note_locked)
            .with_opt("post[parent_id]", self.parent_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagListParams {
    pub name: Option<String>,
    pub id: Option<u64>,
    /// `0` returns every tag.
    pub limit: Option<u32>,
    pub page: Option<u32>,
    /// `date`, `name` or `count`.
    pub order: Option<String>,
    pub after_id: Option<u64>,
}

impl ApiParams for TagListParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("name", self.name.as_ref())
            .with_opt("id", self.id)
            .with_opt("limit", self.limit)
            .with_opt("page", self.page)
            .with_opt("order", self.order.as_ref())
            .with_opt("after_id", self.after_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagUpdateParams {
    pub name: String,
    /// `0` general, `1` artist, `3` copyright, `4` character.
    pub tag_type: Option<u8>,
    pub is_ambiguous: Option<bool>,
}

impl ApiParams for TagUpdateParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with("name", &self.name)
            .with_opt("tag[tag_type]", self.tag_type)
            .with_opt("tag[is_ambiguous]", self.is_ambiguous)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRelatedParams {
    pub tags: String,
    /// `general`, `artist`, `copyright` or `character`.
    pub tag_type: Option<String>,
}

impl ApiParams for TagRelatedParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with("tags", &self.tags)
            .with_opt("type", self.tag_type.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistListParams {
    /// Full name or a fragment of it.
    pub name: Option<String>,
    /// `date` or `name`.
    pub order: Option<String>,
    pub page: Option<u32>,
}

impl ApiParams for ArtistListParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("name", self.name.as_ref())
            .with_opt("order", self.order.as_ref())
            .with_opt("page", self.page)
    }
}

/// Fields of an artist. `name` is required when creating one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistParams {
    pub name: Option<String>,
    /// Whitespace delimited.
    pub urls: Option<String>,
    /// Name of the artist this one is an alias for.
    pub alias: Option<String>,
    /// Name of the group or circle the artist belongs to.
    pub group: Option<String>,
}

impl ApiParams for ArtistParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("artist[name]", self.name.as_ref())
            .with_opt("artist[urls]", self.urls.as_ref())
            .with_opt("artist[alias]", self.alias.as_ref())
            .with_opt("artist[group]", self.group.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentCreateParams {
    pub post_id: u64,
    pub body: String,
    pub anonymous: Option<bool>,
}

impl ApiParams for CommentCreateParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with("comment[post_id]", self.post_id)
            .with("comment[body]", &self.body)
            .with_opt("comment[anonymous]", self.anonymous)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiListParams {
    pub query: Option<String>,
    /// `title` or `date`.
    pub order: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl ApiParams for WikiListParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("query", self.query.as_ref())
            .with_opt("order", self.order.as_ref())
            .with_opt("limit", self.limit)
            .with_opt("page", self.page)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiUpdateParams {
    /// Current title of the page.
    pub title: String,
    pub new_title: Option<String>,
    pub body: Option<String>,
}

impl ApiParams for WikiUpdateParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with("title", &self.title)
            .with_opt("wiki_page[title]", self.new_title.as_ref())
            .with_opt("wiki_page[body]", self.body.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteHistoryParams {
    pub post_id: Option<u64>,
    pub id: Option<u64>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl ApiParams for NoteHistoryParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("post_id", self.post_id)
            .with_opt("id", self.id)
            .with_opt("limit", self.limit)
            .with_opt("page", self.page)
    }
}

/// Creates a note, or updates note `id` when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteParams {
    pub id: Option<u64>,
    pub post_id: Option<u64>,
    pub x: Option<u32>,
    pub y: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub is_active: Option<bool>,
    pub body: Option<String>,
}

impl ApiParams for NoteParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("id", self.id)
            .with_opt("note[post]", self.post_id)
            .with_opt("note[x]", self.x)
            .with_opt("note[y]", self.y)
            .with_opt("note[width]", self.width)
            .with_opt("note[height]", self.height)
            .with_opt("note[body]", self.body.as_ref())
            .with_opt("note[is_active]", self.is_active)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSearchParams {
    pub id: Option<u64>,
    pub name: Option<String>,
}

impl ApiParams for UserSearchParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("id", self.id)
            .with_opt("name", self.name.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolListParams {
    /// Searched in pool titles.
    pub query: Option<String>,
    pub page: Option<u32>,
}

impl ApiParams for PoolListParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("query", self.query.as_ref())
            .with_opt("page", self.page)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolUpdateParams {
    pub id: u64,
    pub name: Option<String>,
    pub is_public: Option<bool>,
    pub description: Option<String>,
}

impl ApiParams for PoolUpdateParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with("id", self.id)
            .with_opt("pool[name]", self.name.as_ref())
            .with_opt("pool[is_public]", self.is_public)
            .with_opt("pool[description]", self.description.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolCreateParams {
    pub name: String,
    pub description: String,
    pub is_public: bool,
}

impl ApiParams for PoolCreateParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with("pool[name]", &self.name)
            .with("pool[description]", &self.description)
            .with("pool[is_public]", self.is_public)
    }
}

fn by_id(id: u64) -> Params {
    Params::new().with("id", id)
}

fn by_title(title: &str) -> Params {
    Params::new().with("title", title)
}

impl<T: Transport> MoebooruApi<T> {
    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn post_list(&mut self, params: &PostListParams) -> Result<Value, ApiError> {
        self.get(Route::PostList, params).await
    }

    /// Uploads a post, either from `file` or from a `source` URL.
    ///
    /// # Errors
    /// [`ApiError::InvalidParameter`] if neither is set, before anything is sent.
    pub async fn post_create(&mut self, params: &PostCreateParams) -> Result<Value, ApiError> {
        if params.file.is_none() && params.source.is_none() {
            return Err(ApiError::invalid_param("Either 'file' or 'source' is required"));
        }
        self.get(Route::PostCreate, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn post_update(&mut self, params: &PostUpdateParams) -> Result<Value, ApiError> {
        self.get(Route::PostUpdate, params).await
    }

    /// Only the uploader or a moderator can destroy a post.
    ///
    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn post_destroy(&mut self, id: u64) -> Result<Value, ApiError> {
        self.client.call(Route::PostDestroy, by_id(id)).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn post_revert_tags(&mut self, id: u64, history_id: u64) -> Result<Value, ApiError> {
        let params = by_id(id).with("history_id", history_id);
        self.client.call(Route::PostRevertTags, params).await
    }

    /// Votes `score` for a post: `0` removes the vote, `1` good, `2` great, `3` favorite.
    ///
    /// # Errors
    /// [`ApiError::InvalidParameter`] for scores outside of `0..=3`, before anything is sent.
    pub async fn post_vote(&mut self, id: u64, score: i32) -> Result<Value, ApiError> {
        let score = validate_score(score)?;
        let params = by_id(id).with("score", score);
        self.client.call(Route::PostVote, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn tag_list(&mut self, params: &TagListParams) -> Result<Value, ApiError> {
        self.get(Route::TagList, params).await
    }

    /// # Errors
    /// [`ApiError::InvalidParameter`] for an empty tag name.
    pub async fn tag_update(&mut self, params: &TagUpdateParams) -> Result<Value, ApiError> {
        require_text("name", &params.name)?;
        self.get(Route::TagUpdate, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn tag_related(&mut self, params: &TagRelatedParams) -> Result<Value, ApiError> {
        self.get(Route::TagRelated, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn artist_list(&mut self, params: &ArtistListParams) -> Result<Value, ApiError> {
        self.get(Route::ArtistList, params).await
    }

    /// # Errors
    /// [`ApiError::InvalidParameter`] if the artist has no name.
    pub async fn artist_create(&mut self, params: &ArtistParams) -> Result<Value, ApiError> {
        require_text("name", params.name.as_deref().unwrap_or_default())?;
        self.get(Route::ArtistCreate, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn artist_update(&mut self, id: u64, params: &ArtistParams) -> Result<Value, ApiError> {
        let params = by_id(id).into_iter().chain(params.to_params()).collect();
        self.client.call(Route::ArtistUpdate, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn artist_destroy(&mut self, id: u64) -> Result<Value, ApiError> {
        self.client.call(Route::ArtistDestroy, by_id(id)).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn comment_show(&mut self, id: u64) -> Result<Value, ApiError> {
        self.client.call(Route::CommentShow, by_id(id)).await
    }

    /// # Errors
    /// [`ApiError::InvalidParameter`] for an empty body.
    pub async fn comment_create(
        &mut self,
        params: &CommentCreateParams,
    ) -> Result<Value, ApiError> {
        require_text("body", &params.body)?;
        self.get(Route::CommentCreate, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn comment_destroy(&mut self, id: u64) -> Result<Value, ApiError> {
        self.client.call(Route::CommentDestroy, by_id(id)).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn wiki_list(&mut self, params: &WikiListParams) -> Result<Value, ApiError> {
        self.get(Route::WikiList, params).await
    }

    /// # Errors
    /// [`ApiError::InvalidParameter`] for an empty title.
    pub async fn wiki_create(&mut self, title: &str, body: &str) -> Result<Value, ApiError> {
        require_text("title", title)?;
        let params = Params::new()
            .with("wiki_page[title]", title)
            .with("wiki_page[body]", body);
        self.client.call(Route::WikiCreate, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn wiki_update(&mut self, params: &WikiUpdateParams) -> Result<Value, ApiError> {
        self.get(Route::WikiUpdate, params).await
    }

    /// Fetches a page, at a given `version` if set.
    ///
    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn wiki_show(&mut self, title: &str, version: Option<u32>) -> Result<Value, ApiError> {
        let params = by_title(title).with_opt("version", version);
        self.client.call(Route::WikiShow, params).await
    }

    /// Moderators only.
    ///
    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn wiki_destroy(&mut self, title: &str) -> Result<Value, ApiError> {
        self.client.call(Route::WikiDestroy, by_title(title)).await
    }

    /// Moderators only.
    ///
    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn wiki_lock(&mut self, title: &str) -> Result<Value, ApiError> {
        self.client.call(Route::WikiLock, by_title(title)).await
    }

    /// Moderators only.
    ///
    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn wiki_unlock(&mut self, title: &str) -> Result<Value, ApiError> {
        self.client.call(Route::WikiUnlock, by_title(title)).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn wiki_revert(&mut self, title: &str, version: u32) -> Result<Value, ApiError> {
        let params = by_title(title).with("version", version);
        self.client.call(Route::WikiRevert, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn wiki_history(&mut self, title: &str) -> Result<Value, ApiError> {
        self.client.call(Route::WikiHistory, by_title(title)).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn note_list(&mut self, post_id: Option<u64>) -> Result<Value, ApiError> {
        let params = Params::new().with_opt("post_id", post_id);
        self.client.call(Route::NoteList, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn note_search(&mut self, query: &str) -> Result<Value, ApiError> {
        let params = Params::new().with("query", query);
        self.client.call(Route::NoteSearch, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn note_history(&mut self, params: &NoteHistoryParams) -> Result<Value, ApiError> {
        self.get(Route::NoteHistory, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn note_revert(&mut self, id: u64, version: u32) -> Result<Value, ApiError> {
        let params = by_id(id).with("version", version);
        self.client.call(Route::NoteRevert, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn note_create_update(&mut self, params: &NoteParams) -> Result<Value, ApiError> {
        self.get(Route::NoteCreateUpdate, params).await
    }

    /// Lists every user when no parameter is set.
    ///
    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn user_search(&mut self, params: &UserSearchParams) -> Result<Value, ApiError> {
        self.get(Route::UserSearch, params).await
    }

    /// Lists the replies to `parent_id`, or every topic.
    ///
    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn forum_list(&mut self, parent_id: Option<u64>) -> Result<Value, ApiError> {
        let params = Params::new().with_opt("parent_id", parent_id);
        self.client.call(Route::ForumList, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn pool_list(&mut self, params: &PoolListParams) -> Result<Value, ApiError> {
        self.get(Route::PoolList, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn pool_posts(&mut self, id: u64, page: Option<u32>) -> Result<Value, ApiError> {
        let params = by_id(id).with_opt("page", page);
        self.client.call(Route::PoolPosts, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn pool_update(&mut self, params: &PoolUpdateParams) -> Result<Value, ApiError> {
        self.get(Route::PoolUpdate, params).await
    }

    /// # Errors
    /// [`ApiError::InvalidParameter`] for an empty pool name.
    pub async fn pool_create(&mut self, params: &PoolCreateParams) -> Result<Value, ApiError> {
        require_text("name", &params.name)?;
        self.get(Route::PoolCreate, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn pool_destroy(&mut self, id: u64) -> Result<Value, ApiError> {
        self.client.call(Route::PoolDestroy, by_id(id)).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn pool_add_post(&mut self, pool_id: u64, post_id: u64) -> Result<Value, ApiError> {
        let params = Params::new()
            .with("pool_id", pool_id)
            .with("post_id", post_id);
        self.client.call(Route::PoolAddPost, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn pool_remove_post(
        &mut self,
        pool_id: u64,
        post_id: u64,
    ) -> Result<Value, ApiError> {
        let params = Params::new()
            .with("pool_id", pool_id)
            .with("post_id", post_id);
        self.client.call(Route::PoolRemovePost, params).await
    }

    /// Names of the users who favorited a post.
    ///
    /// # Errors
    /// [`ApiError::Decode`] if the answer has no `favorited_users` string.
    pub async fn favorite_list_users(&mut self, id: u64) -> Result<Vec<String>, ApiError> {
        let value = self.client.call(Route::FavoriteListUsers, by_id(id)).await?;

        let Some(users) = value.get("favorited_users").and_then(Value::as_str) else {
            return Err(ApiError::Decode {
                message: "missing field `favorited_users`".to_string(),
                line: None,
                column: None,
            });
        };

        Ok(users
            .split(',')
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::client::ClientBuilder;
    use crate::request::{HttpMethod, RequestBody};
    use crate::test_support::RecordingTransport;

    fn anonymous() -> (MoebooruApi<RecordingTransport>, RecordingTransport) {
        let transport = RecordingTransport::new();
        let client = ClientBuilder::new(Dialect::Moebooru)
            .site_name("konachan")
            .build_with_transport(transport.clone())
            .unwrap();
        (MoebooruApi::from_client(client).unwrap(), transport)
    }

    fn logged_in() -> (MoebooruApi<RecordingTransport>, RecordingTransport) {
        let transport = RecordingTransport::new();
        let client = MoebooruApi::builder()
            .site_name("yandere")
            .username("user")
            .password("pw")
            .build_with_transport(transport.clone())
            .unwrap();
        (MoebooruApi::from_client(client).unwrap(), transport)
    }

    fn form(transport: &RecordingTransport) -> Vec<(String, String)> {
        match transport.last_request().body {
            RequestBody::Form(fields) => fields,
            other => panic!("expected a form, got {other:?}"),
        }
    }

    #[test]
    fn wrapper_rejects_other_dialects() {
        let client = ClientBuilder::new(Dialect::Danbooru)
            .site_name("danbooru")
            .build_with_transport(RecordingTransport::new())
            .unwrap();
        assert!(matches!(
            MoebooruApi::from_client(client),
            Err(ApiError::Config { .. })
        ));
    }

    #[tokio::test]
    async fn post_list_sends_only_set_fields() {
        let (mut api, transport) = anonymous();
        let params = PostListParams {
            tags: Some("cat".to_string()),
            limit: Some(5),
            ..Default::default()
        };

        api.post_list(&params).await.unwrap();

        let sent = transport.last_request();
        assert_eq!(sent.url.path(), "/post.json");
        assert_eq!(
            sent.query_pairs(),
            vec![
                ("tags".to_string(), "cat".to_string()),
                ("limit".to_string(), "5".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn vote_score_is_validated_before_sending() {
        let (mut api, transport) = logged_in();

        for score in [-1, 4] {
            assert!(matches!(
                api.post_vote(1, score).await,
                Err(ApiError::InvalidParameter { .. })
            ));
        }
        assert_eq!(transport.calls(), 0);

        api.post_vote(1, 3).await.unwrap();
        let fields = form(&transport);
        assert!(fields.contains(&("score".to_string(), "3".to_string())));
        assert!(fields.contains(&("login".to_string(), "user".to_string())));
        assert_eq!(transport.last_request().method, HttpMethod::Post);
    }

    #[tokio::test]
    async fn post_create_needs_a_file_or_source() {
        let (mut api, transport) = logged_in();

        let result = api
            .post_create(&PostCreateParams {
                tags: "cat".to_string(),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(ApiError::InvalidParameter { .. })));
        assert_eq!(transport.calls(), 0);

        api.post_create(&PostCreateParams {
            tags: "cat".to_string(),
            file: Some(FileUpload::new("cat.png", vec![137, 80, 78, 71])),
            rating: Some("safe".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

        let RequestBody::Multipart { fields, files } = transport.last_request().body else {
            panic!("expected a multipart body");
        };
        assert!(fields.contains(&("post[tags]".to_string(), "cat".to_string())));
        assert!(fields.contains(&("post[rating]".to_string(), "safe".to_string())));
        assert!(fields.iter().any(|(k, _)| k == "password_hash"));
        assert_eq!(files[0].0, "post[file]");
    }

    #[tokio::test]
    async fn comment_and_tag_validation() {
        let (mut api, transport) = logged_in();

        let empty_comment = CommentCreateParams {
            post_id: 1,
            body: " ".to_string(),
            anonymous: None,
        };
        assert!(matches!(
            api.comment_create(&empty_comment).await,
            Err(ApiError::InvalidParameter { .. })
        ));
        assert!(matches!(
            api.tag_update(&TagUpdateParams::default()).await,
            Err(ApiError::InvalidParameter { .. })
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn writes_without_login_fail_fast() {
        let (mut api, transport) = anonymous();
        assert!(matches!(
            api.wiki_lock("Help").await,
            Err(ApiError::Auth { .. })
        ));
        assert!(matches!(
            api.pool_destroy(3).await,
            Err(ApiError::Auth { .. })
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn artist_update_merges_id_and_fields() {
        let (mut api, transport) = logged_in();
        let params = ArtistParams {
            urls: Some("https://example.org".to_string()),
            ..Default::default()
        };

        api.artist_update(12, &params).await.unwrap();

        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Put);
        let fields = form(&transport);
        assert_eq!(fields[0], ("id".to_string(), "12".to_string()));
        assert_eq!(
            fields[1],
            ("artist[urls]".to_string(), "https://example.org".to_string())
        );
    }

    #[tokio::test]
    async fn favorite_users_are_split() {
        let (mut api, transport) = anonymous();
        transport
            .respond(200, r#"{"favorited_users": "alice,bob, carol"}"#)
            .respond(200, r#"{"favorited_users": ""}"#)
            .respond(200, "{}");

        assert_eq!(
            api.favorite_list_users(5).await.unwrap(),
            vec!["alice", "bob", "carol"]
        );
        assert!(api.favorite_list_users(5).await.unwrap().is_empty());
        assert!(matches!(
            api.favorite_list_users(5).await,
            Err(ApiError::Decode { .. })
        ));
        assert_eq!(
            transport.last_request().url.as_str(),
            "https://konachan.com/favorite/list_users.json?id=5"
        );
    }

    #[tokio::test]
    async fn legacy_versions_use_index_paths() {
        let transport = RecordingTransport::new();
        let client = MoebooruApi::builder()
            .site_url("http://old.booru.example")
            .api_version("1.13.0+update.1")
            .build_with_transport(transport.clone())
            .unwrap();
        let mut api = MoebooruApi::from_client(client).unwrap();

        api.wiki_list(&WikiListParams::default()).await.unwrap();
        assert_eq!(transport.last_request().url.path(), "/wiki/index.json");

        api.wiki_history("Help").await.unwrap();
        assert_eq!(transport.last_request().url.path(), "/wiki/history.json");
    }
}
