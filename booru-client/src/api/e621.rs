//! e621 and e926 endpoints. The API is only used for reading.
use booru_common::Dialect;
use serde_json::Value;

use super::{dialect_api, tag_string, ApiParams};
use crate::error::ApiError;
use crate::request::Params;
use crate::routes::Route;
use crate::transport::Transport;

dialect_api!(
    /// Client for e621 and its safe mirror.
    E621Api,
    Dialect::E621
);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListParams {
    pub tags: Option<String>,
    /// At most 320.
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

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagListParams {
    pub name_matches: Option<String>,
    pub category: Option<u8>,
    /// `date`, `count` or `name`.
    pub order: Option<String>,
    pub hide_empty: Option<bool>,
    pub has_wiki: Option<bool>,
    pub has_artist: Option<bool>,
}

impl ApiParams for TagListParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("search[name_matches]", self.name_matches.as_ref())
            .with_opt("search[category]", self.category)
            .with_opt("search[order]", self.order.as_ref())
            .with_opt("search[hide_empty]", self.hide_empty)
            .with_opt("search[has_wiki]", self.has_wiki)
            .with_opt("search[has_artist]", self.has_artist)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistListParams {
    pub name: Option<String>,
    pub id: Option<u64>,
    pub creator_name: Option<String>,
    pub creator_id: Option<u64>,
    pub any_name_matches: Option<String>,
    pub is_active: Option<bool>,
    pub is_banned: Option<bool>,
    /// Only artists without posts.
    pub empty_only: Option<bool>,
    /// `name` or `updated_at`.
    pub order: Option<String>,
}

impl ApiParams for ArtistListParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("search[name]", self.name.as_ref())
            .with_opt("search[id]", self.id)
            .with_opt("search[creator_name]", self.creator_name.as_ref())
            .with_opt("search[creator_id]", self.creator_id)
            .with_opt("search[any_name_matches]", self.any_name_matches.as_ref())
            .with_opt("search[is_active]", self.is_active)
            .with_opt("search[is_banned]", self.is_banned)
            .with_opt("search[empty_only]", self.empty_only)
            .with_opt("search[order]", self.order.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiListParams {
    pub title: Option<String>,
    pub creator_id: Option<u64>,
    pub body_matches: Option<String>,
    pub other_names_match: Option<String>,
    pub creator_name: Option<String>,
    /// `yes` or `no`.
    pub hide_deleted: Option<String>,
    /// `yes` or `no`.
    pub other_names_present: Option<String>,
    /// `date` or `title`.
    pub order: Option<String>,
}

impl ApiParams for WikiListParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("search[title]", self.title.as_ref())
            .with_opt("search[creator_id]", self.creator_id)
            .with_opt("search[body_matches]", self.body_matches.as_ref())
            .with_opt("search[other_names_match]", self.other_names_match.as_ref())
            .with_opt("search[creator_name]", self.creator_name.as_ref())
            .with_opt("search[hide_deleted]", self.hide_deleted.as_ref())
            .with_opt(
                "search[other_names_present]",
                self.other_names_present.as_ref(),
            )
            .with_opt("search[order]", self.order.as_ref())
    }
}

impl<T: Transport> E621Api<T> {
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
    pub async fn wiki_list(&mut self, params: &WikiListParams) -> Result<Value, ApiError> {
        self.get(Route::WikiList, params).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::RecordingTransport;

    fn api() -> (E621Api<RecordingTransport>, RecordingTransport) {
        let transport = RecordingTransport::new();
        let client = E621Api::builder()
            .site_name("e926")
            .build_with_transport(transport.clone())
            .unwrap();
        (E621Api::from_client(client).unwrap(), transport)
    }

    #[tokio::test]
    async fn list_routes_use_plural_paths() {
        let (mut e926, transport) = api();

        e926.post_list(&PostListParams {
            tags: Some("fox".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(
            transport.last_request().url.as_str(),
            "https://e926.net/posts.json?tags=fox"
        );

        e926.artist_list(&ArtistListParams {
            is_active: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(
            transport.last_request().query_pairs(),
            vec![("search[is_active]".to_string(), "true".to_string())]
        );

        e926.wiki_list(&WikiListParams::default()).await.unwrap();
        assert_eq!(transport.last_request().url.path(), "/wiki_pages.json");
    }

    #[tokio::test]
    async fn writes_are_unsupported() {
        let (mut e926, transport) = api();
        let result = e926
            .client_mut()
            .call(Route::PostVote, Params::new())
            .await;
        assert!(matches!(
            result,
            Err(ApiError::UnsupportedOperation { .. })
        ));
        assert_eq!(transport.calls(), 0);
    }
}
