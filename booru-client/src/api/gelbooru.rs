//! Gelbooru `dapi` endpoints. Read only, some sites (`rule34`) answer in XML.
use booru_common::Dialect;
use serde_json::Value;

use super::{dialect_api, tag_string, ApiParams};
use crate::error::ApiError;
use crate::request::Params;
use crate::routes::Route;
use crate::transport::Transport;

dialect_api!(
    /// Client for Gelbooru based sites.
    GelbooruApi,
    Dialect::Gelbooru
);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListParams {
    pub tags: Option<String>,
    pub limit: Option<u32>,
    /// 1-based page, sent as the 0-based `pid` the API expects.
    pub page: Option<u32>,
    pub id: Option<u64>,
}

impl PostListParams {
    /// Searches for posts carrying every tag of `tags`.
    #[must_use]
    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = Some(tag_string(tags));
        self
    }

    fn validated(&self) -> Result<Params, ApiError> {
        let pid = match self.page {
            Some(0) => return Err(ApiError::invalid_param("'page' starts at 1")),
            Some(page) => Some(page - 1),
            None => None,
        };

        Ok(Params::new()
            .with_opt("tags", self.tags.as_ref())
            .with_opt("limit", self.limit)
            .with_opt("pid", pid)
            .with_opt("id", self.id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagListParams {
    /// Part of a name, with SQL `LIKE` wildcards.
    pub name_pattern: Option<String>,
    pub name: Option<String>,
    /// `ASC` or `DESC`.
    pub order: Option<String>,
    /// `name`, `date` or `count`.
    pub orderby: Option<String>,
    pub limit: Option<u32>,
}

impl ApiParams for TagListParams {
    fn to_params(&self) -> Params {
        Params::new()
            .with_opt("name_pattern", self.name_pattern.as_ref())
            .with_opt("name", self.name.as_ref())
            .with_opt("order", self.order.as_ref())
            .with_opt("orderby", self.orderby.as_ref())
            .with_opt("limit", self.limit)
    }
}

impl<T: Transport> GelbooruApi<T> {
    /// # Errors
    /// [`ApiError::InvalidParameter`] for `page` 0, before anything is sent.
    pub async fn post_list(&mut self, params: &PostListParams) -> Result<Value, ApiError> {
        let params = params.validated()?;
        self.client.call(Route::PostList, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn tag_list(&mut self, params: &TagListParams) -> Result<Value, ApiError> {
        self.get(Route::TagList, params).await
    }

    /// # Errors
    /// See [`BooruClient::call`](crate::BooruClient::call).
    pub async fn comment_list(&mut self, post_id: u64) -> Result<Value, ApiError> {
        let params = Params::new().with("post_id", post_id);
        self.client.call(Route::CommentList, params).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::RecordingTransport;
    use serde_json::json;

    fn api(site: &str) -> (GelbooruApi<RecordingTransport>, RecordingTransport) {
        let transport = RecordingTransport::new();
        let client = GelbooruApi::builder()
            .site_name(site)
            .build_with_transport(transport.clone())
            .unwrap();
        (GelbooruApi::from_client(client).unwrap(), transport)
    }

    #[tokio::test]
    async fn page_becomes_pid() {
        let (mut gelbooru, transport) = api("gelbooru");
        gelbooru
            .post_list(&PostListParams {
                tags: Some("cat".to_string()),
                page: Some(3),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            transport.last_request().url.as_str(),
            "https://gelbooru.com/index.php?page=dapi&s=post&q=index&json=1&tags=cat&pid=2"
        );

        let result = gelbooru
            .post_list(&PostListParams {
                page: Some(0),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(ApiError::InvalidParameter { .. })));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn tag_lists_become_one_search() {
        let (mut gelbooru, transport) = api("gelbooru");
        let params = PostListParams::default().with_tags(&["cat", "rating:general"]);
        gelbooru.post_list(&params).await.unwrap();

        assert!(transport
            .last_request()
            .query_pairs()
            .contains(&("tags".to_string(), "cat rating:general".to_string())));
    }

    #[tokio::test]
    async fn xml_sites_are_decoded() {
        let (mut rule34, transport) = api("rule34");
        transport.respond(
            200,
            r#"<?xml version="1.0" encoding="UTF-8"?><tags type="array"><tag type="0" count="12" name="cat" id="1"/></tags>"#,
        );

        let tags = rule34
            .tag_list(&TagListParams {
                name: Some("cat".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            tags,
            json!({"tags": {"type": "array", "tag": {"type": "0", "count": "12", "name": "cat", "id": "1"}}})
        );
        assert_eq!(
            transport.last_request().url.as_str(),
            "https://api.rule34.xxx/index.php?page=dapi&s=tag&q=index&name=cat"
        );
    }
}
