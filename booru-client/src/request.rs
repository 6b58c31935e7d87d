//! Building blocks of a call: parameters, HTTP method and the fully resolved request handed to
//! a [`Transport`](crate::transport::Transport).
use booru_common::{Dialect, ResponseFormat};
use log::debug;
use reqwest::multipart::Part;
use std::fmt::{Debug, Display};
use std::path::Path;
use url::Url;

use crate::auth::AuthAttachment;
use crate::dialect::{DialectConfig, PathStyle};
use crate::error::ApiError;
use crate::registry::SiteConfig;
use crate::routes::{Route, ID_PLACEHOLDER};

/// API version assumed for Moebooru sites unless told otherwise.
pub const DEFAULT_API_VERSION: &str = "1.13.0+update.3";

/// Moebooru versions that serve top level routes from `/<route>/index.json`.
pub const LEGACY_API_VERSIONS: [&str; 3] = ["1.13.0", "1.13.0+update.1", "1.13.0+update.2"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[inline]
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    #[must_use]
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file sent as a multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .field("mime", &self.mime)
            .finish()
    }
}

impl FileUpload {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime: None,
        }
    }

    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Reads the whole file into memory.
    ///
    /// # Errors
    /// Returns [`ApiError::Io`] if the file can't be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "file".to_string(), |n| n.to_string_lossy().to_string());

        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self::new(file_name, bytes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Unsigned(u64),
    Bool(bool),
    File(FileUpload),
}

impl ParamValue {
    /// The value as sent in a query string or form. Files have no text form.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Int(n) => Some(n.to_string()),
            Self::Unsigned(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::File(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Unsigned(value.into())
    }
}

impl From<u8> for ParamValue {
    fn from(value: u8) -> Self {
        Self::Unsigned(value.into())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<FileUpload> for ParamValue {
    fn from(value: FileUpload) -> Self {
        Self::File(value)
    }
}

/// Ordered request parameters. Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, ParamValue)>);

impl Params {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Same as [`with`](Self::with), skipping `None` values.
    #[must_use]
    pub fn with_opt<V: Into<ParamValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    #[must_use]
    pub fn has_file(&self) -> bool {
        self.0.iter().any(|(_, v)| v.is_file())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Params {
    type Item = (String, ParamValue);
    type IntoIter = std::vec::IntoIter<(String, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// One logical call, before it is bound to a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub route: Route,
    pub params: Params,
    pub method: HttpMethod,
    pub requires_auth: bool,
    /// Substituted into paths addressing a single resource (`posts/{id}.json`).
    pub resource_id: Option<String>,
}

impl RequestSpec {
    /// Looks up the method and auth requirement of `route` on `dialect`.
    ///
    /// # Errors
    /// Returns [`ApiError::UnsupportedOperation`] if the dialect has no such route.
    pub fn for_route(route: Route, dialect: Dialect, params: Params) -> Result<Self, ApiError> {
        let endpoint = route.require_endpoint(dialect)?;
        Ok(Self {
            route,
            params,
            method: endpoint.method,
            requires_auth: endpoint.requires_auth,
            resource_id: None,
        })
    }

    #[must_use]
    pub fn with_resource_id(mut self, id: impl Display) -> Self {
        self.resource_id = Some(id.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Form(Vec<(String, String)>),
    Multipart {
        fields: Vec<(String, String)>,
        files: Vec<(String, FileUpload)>,
    },
}

#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub route: Route,
    pub method: HttpMethod,
    pub url: Url,
    pub body: RequestBody,
    pub basic_auth: Option<BasicAuth>,
}

impl PreparedRequest {
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

/// Turns [`RequestSpec`]s into [`PreparedRequest`]s for one site.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    dialect: Dialect,
    config: DialectConfig,
    legacy_paths: bool,
}

impl RequestBuilder {
    /// # Errors
    /// Returns [`ApiError::Config`] if the site's base URL doesn't parse.
    pub fn new(site: &SiteConfig, api_version: Option<&str>) -> Result<Self, ApiError> {
        Url::parse(&site.base_url)
            .map_err(|e| ApiError::config(format!("Invalid URL '{}': {e}", site.base_url)))?;

        let api_version = api_version.unwrap_or(DEFAULT_API_VERSION);

        Ok(Self {
            base_url: site.base_url.trim_end_matches('/').to_string(),
            dialect: site.dialect,
            config: DialectConfig::for_dialect(site.dialect).with_format(site.format),
            legacy_paths: site.dialect == Dialect::Moebooru
                && LEGACY_API_VERSIONS.contains(&api_version),
        })
    }

    #[must_use]
    pub const fn dialect_config(&self) -> DialectConfig {
        self.config
    }

    /// Resolves the URL, places the parameters and applies `auth`.
    ///
    /// # Errors
    /// Returns [`ApiError::UnsupportedOperation`] for mutating calls on read only dialects and
    /// [`ApiError::InvalidParameter`] when a resource id is missing or a file is sent with `GET`.
    pub fn build(
        &self,
        spec: RequestSpec,
        auth: AuthAttachment,
    ) -> Result<PreparedRequest, ApiError> {
        let RequestSpec {
            route,
            mut params,
            method,
            resource_id,
            ..
        } = spec;

        if self.config.read_only && method.is_mutating() {
            return Err(ApiError::UnsupportedOperation {
                route: route.name().to_string(),
                dialect: self.dialect,
            });
        }

        let endpoint = route.require_endpoint(self.dialect)?;
        let path = Self::fill_path(route, endpoint.path, resource_id.as_deref())?;
        let (mut url, mut query) = self.route_url(&path)?;

        let mut basic_auth = None;
        match auth {
            AuthAttachment::None => {}
            AuthAttachment::BasicAuth { username, api_key } => {
                basic_auth = Some(BasicAuth {
                    username,
                    password: api_key,
                });
            }
            AuthAttachment::LoginFields {
                login,
                password_hash,
            } => {
                params.insert("login", login);
                params.insert("password_hash", password_hash);
            }
        }

        let body = if method.is_mutating() {
            Self::body(params)?
        } else {
            for (key, value) in params {
                let Some(text) = value.as_text() else {
                    return Err(ApiError::invalid_param(format!(
                        "File parameter '{key}' can't be sent with GET"
                    )));
                };
                query.push((key, text));
            }
            RequestBody::Empty
        };

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        debug!("Prepared {method} {route} -> {url}");

        Ok(PreparedRequest {
            route,
            method,
            url,
            body,
            basic_auth,
        })
    }

    fn fill_path(
        route: Route,
        path: &'static str,
        resource_id: Option<&str>,
    ) -> Result<String, ApiError> {
        if !path.contains(ID_PLACEHOLDER) {
            return Ok(path.to_string());
        }

        match resource_id.filter(|id| !id.is_empty()) {
            Some(id) if !id.contains(['/', '?', '#']) => Ok(path.replace(ID_PLACEHOLDER, id)),
            Some(id) => Err(ApiError::invalid_param(format!(
                "'{id}' is not a valid resource id for {route}"
            ))),
            None => Err(ApiError::invalid_param(format!(
                "{route} requires a resource id"
            ))),
        }
    }

    /// Full URL of a route plus the query pairs the addressing scheme itself needs.
    fn route_url(&self, path: &str) -> Result<(Url, Vec<(String, String)>), ApiError> {
        let (raw, query) = match self.config.paths {
            PathStyle::Literal => (format!("{}/{path}", self.base_url), Vec::new()),
            PathStyle::Moebooru => {
                let raw = if self.legacy_paths && !path.contains('/') {
                    format!("{}/{path}/index.json", self.base_url)
                } else {
                    format!("{}/{path}.json", self.base_url)
                };
                (raw, Vec::new())
            }
            PathStyle::Dapi => {
                let mut query = vec![
                    ("page".to_string(), "dapi".to_string()),
                    ("s".to_string(), path.to_string()),
                    ("q".to_string(), "index".to_string()),
                ];
                if self.config.format == ResponseFormat::Json {
                    query.push(("json".to_string(), "1".to_string()));
                }
                (format!("{}/index.php", self.base_url), query)
            }
        };

        let url = Url::parse(&raw)
            .map_err(|e| ApiError::config(format!("Invalid URL '{raw}': {e}")))?;
        Ok((url, query))
    }

    fn body(params: Params) -> Result<RequestBody, ApiError> {
        if params.is_empty() {
            return Ok(RequestBody::Empty);
        }

        let mut fields = Vec::with_capacity(params.len());
        let mut files = Vec::new();

        for (key, value) in params {
            match value {
                ParamValue::File(file) => {
                    if let Some(mime) = &file.mime {
                        Part::bytes(Vec::new()).mime_str(mime).map_err(|_| {
                            ApiError::invalid_param(format!(
                                "'{mime}' is not a valid MIME type for '{key}'"
                            ))
                        })?;
                    }
                    files.push((key, file));
                }
                other => {
                    if let Some(text) = other.as_text() {
                        fields.push((key, text));
                    }
                }
            }
        }

        if files.is_empty() {
            Ok(RequestBody::Form(fields))
        } else {
            Ok(RequestBody::Multipart { fields, files })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::registry::DEFAULT_SITES;

    fn builder(site: &str) -> RequestBuilder {
        RequestBuilder::new(DEFAULT_SITES.get(site).unwrap(), None).unwrap()
    }

    fn spec(route: Route, dialect: Dialect, params: Params) -> RequestSpec {
        RequestSpec::for_route(route, dialect, params).unwrap()
    }

    #[test]
    fn get_params_become_the_query_string() {
        let params = Params::new().with("tags", "cat").with("limit", 5);
        let req = builder("yandere")
            .build(spec(Route::PostList, Dialect::Moebooru, params), AuthAttachment::None)
            .unwrap();

        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url.path(), "/post.json");
        assert_eq!(
            req.query_pairs(),
            vec![
                ("tags".to_string(), "cat".to_string()),
                ("limit".to_string(), "5".to_string())
            ]
        );
        assert_eq!(req.body, RequestBody::Empty);
    }

    #[test]
    fn empty_query_leaves_no_question_mark() {
        let req = builder("danbooru")
            .build(
                spec(Route::PostList, Dialect::Danbooru, Params::new()),
                AuthAttachment::None,
            )
            .unwrap();
        assert_eq!(req.url.as_str(), "https://danbooru.donmai.us/posts.json");
    }

    #[test]
    fn legacy_moebooru_versions_use_index_paths() {
        let site = DEFAULT_SITES.get("konachan").unwrap();
        let legacy = RequestBuilder::new(site, Some("1.13.0")).unwrap();
        let current = RequestBuilder::new(site, None).unwrap();

        let top_level = spec(Route::PostList, Dialect::Moebooru, Params::new());
        let nested = spec(Route::TagRelated, Dialect::Moebooru, Params::new());

        let path = |b: &RequestBuilder, s: &RequestSpec| {
            b.build(s.clone(), AuthAttachment::None)
                .unwrap()
                .url
                .path()
                .to_string()
        };

        assert_eq!(path(&legacy, &top_level), "/post/index.json");
        assert_eq!(path(&legacy, &nested), "/tag/related.json");
        assert_eq!(path(&current, &top_level), "/post.json");
        assert_eq!(path(&current, &nested), "/tag/related.json");
    }

    #[test]
    fn dapi_addressing_depends_on_format() {
        let params = Params::new().with("tags", "cat");

        let json = builder("gelbooru")
            .build(
                spec(Route::PostList, Dialect::Gelbooru, params.clone()),
                AuthAttachment::None,
            )
            .unwrap();
        assert_eq!(
            json.url.as_str(),
            "https://gelbooru.com/index.php?page=dapi&s=post&q=index&json=1&tags=cat"
        );

        let xml = builder("rule34")
            .build(
                spec(Route::PostList, Dialect::Gelbooru, params),
                AuthAttachment::None,
            )
            .unwrap();
        assert_eq!(
            xml.url.as_str(),
            "https://api.rule34.xxx/index.php?page=dapi&s=post&q=index&tags=cat"
        );
    }

    #[test]
    fn resource_ids_fill_the_path() {
        let b = builder("danbooru");
        let req = b
            .build(
                spec(Route::PostShow, Dialect::Danbooru, Params::new()).with_resource_id(42),
                AuthAttachment::None,
            )
            .unwrap();
        assert_eq!(req.url.path(), "/posts/42.json");

        let missing = b.build(
            spec(Route::PostShow, Dialect::Danbooru, Params::new()),
            AuthAttachment::None,
        );
        assert!(matches!(missing, Err(ApiError::InvalidParameter { .. })));

        let sneaky = b.build(
            spec(Route::PostShow, Dialect::Danbooru, Params::new()).with_resource_id("1/../2"),
            AuthAttachment::None,
        );
        assert!(matches!(sneaky, Err(ApiError::InvalidParameter { .. })));
    }

    #[test]
    fn mutating_calls_carry_a_form_with_login_fields() {
        let params = Params::new().with("id", 7_u64).with("score", 3_u8);
        let req = builder("yandere")
            .build(
                spec(Route::PostVote, Dialect::Moebooru, params),
                AuthAttachment::LoginFields {
                    login: "user".to_string(),
                    password_hash: "abc".to_string(),
                },
            )
            .unwrap();

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url.query(), None);
        assert_eq!(
            req.body,
            RequestBody::Form(vec![
                ("id".to_string(), "7".to_string()),
                ("score".to_string(), "3".to_string()),
                ("login".to_string(), "user".to_string()),
                ("password_hash".to_string(), "abc".to_string()),
            ])
        );
    }

    #[test]
    fn files_switch_to_multipart() {
        let params = Params::new()
            .with("post[tags]", "cat")
            .with("post[file]", FileUpload::new("cat.png", vec![1, 2, 3]));
        let req = builder("konachan")
            .build(
                spec(Route::PostCreate, Dialect::Moebooru, params),
                AuthAttachment::None,
            )
            .unwrap();

        let RequestBody::Multipart { fields, files } = req.body else {
            panic!("expected a multipart body");
        };
        assert_eq!(fields, vec![("post[tags]".to_string(), "cat".to_string())]);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "post[file]");
        assert_eq!(files[0].1.file_name, "cat.png");
    }

    #[test]
    fn bad_upload_mime_is_rejected_before_sending() {
        let file = FileUpload::new("cat.png", vec![1]).with_mime("not a mime");
        let params = Params::new().with("post[file]", file);
        let result = builder("konachan").build(
            spec(Route::PostCreate, Dialect::Moebooru, params),
            AuthAttachment::None,
        );
        assert!(matches!(result, Err(ApiError::InvalidParameter { .. })));

        let file = FileUpload::new("cat.png", vec![1]).with_mime("image/png");
        let params = Params::new().with("post[file]", file);
        let req = builder("konachan")
            .build(
                spec(Route::PostCreate, Dialect::Moebooru, params),
                AuthAttachment::None,
            )
            .unwrap();
        assert!(matches!(req.body, RequestBody::Multipart { .. }));
    }

    #[test]
    fn token_auth_becomes_basic_auth() {
        let req = builder("danbooru")
            .build(
                spec(Route::Profile, Dialect::Danbooru, Params::new()),
                AuthAttachment::BasicAuth {
                    username: "user".to_string(),
                    api_key: "key".to_string(),
                },
            )
            .unwrap();

        let auth = req.basic_auth.unwrap();
        assert_eq!(auth.username, "user");
        assert_eq!(auth.password, "key");
        assert!(!format!("{auth:?}").contains("key\""));
        assert_eq!(req.url.query(), None);
    }

    #[test]
    fn read_only_dialects_reject_mutating_specs() {
        let forged = RequestSpec {
            route: Route::PostList,
            params: Params::new(),
            method: HttpMethod::Post,
            requires_auth: false,
            resource_id: None,
        };
        let result = builder("e621").build(forged, AuthAttachment::None);
        assert!(matches!(
            result,
            Err(ApiError::UnsupportedOperation {
                dialect: Dialect::E621,
                ..
            })
        ));
    }

    #[test]
    fn params_replace_and_skip_none() {
        let mut params = Params::new()
            .with("tags", "dog")
            .with_opt("limit", None::<u32>)
            .with_opt("page", Some(2_u32))
            .with("tags", "cat");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("tags"), Some(&ParamValue::from("cat")));
        assert_eq!(params.get("limit"), None);
        assert_eq!(params.remove("page"), Some(ParamValue::Unsigned(2)));
        assert!(!params.has_file());
        assert_eq!(ParamValue::Bool(true).as_text().as_deref(), Some("true"));
    }
}
