//! The dialect-parameterized client every typed API wraps.
use booru_common::Dialect;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Display;
use std::time::Duration;

use crate::auth::{Authenticator, Credentials};
use crate::error::ApiError;
use crate::registry::{SiteConfig, SiteRegistry, DEFAULT_SITES};
use crate::request::{Params, PreparedRequest, RequestBuilder, RequestSpec};
use crate::resolver;
use crate::response;
use crate::routes::Route;
use crate::session::{ClientSession, LastCall};
use crate::transport::{ReqwestTransport, SendError, Transport, DEFAULT_TIMEOUT};

/// A configured connection to one site.
///
/// Every call awaits exactly one request. Methods take `&mut self` since they update
/// [`last_call`](Self::last_call) and the cached Moebooru password hash, so share a client
/// between tasks behind a lock or build one per task.
#[derive(Debug)]
pub struct BooruClient<T: Transport = ReqwestTransport> {
    session: ClientSession,
    requests: RequestBuilder,
    transport: T,
}

impl BooruClient<ReqwestTransport> {
    #[must_use]
    pub fn builder(dialect: Dialect) -> ClientBuilder {
        ClientBuilder::new(dialect)
    }

    /// Anonymous client for a registered site.
    ///
    /// # Errors
    /// See [`ClientBuilder::build`].
    pub fn new(dialect: Dialect, site_name: &str) -> Result<Self, ApiError> {
        ClientBuilder::new(dialect).site_name(site_name).build()
    }
}

impl<T: Transport> BooruClient<T> {
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.session.site.dialect
    }

    #[must_use]
    pub const fn site(&self) -> &SiteConfig {
        self.session.site()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.session.site.base_url
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.session.username()
    }

    /// Route, URL, status and headers of the most recent call that reached the transport.
    #[must_use]
    pub const fn last_call(&self) -> Option<&LastCall> {
        self.session.last_call()
    }

    /// The Moebooru password hash, once an authenticated call computed it.
    #[must_use]
    pub fn password_hash(&self) -> Option<&str> {
        self.session.auth.password_hash()
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Starts a [`RequestSpec`] for `route` on this client's dialect.
    ///
    /// # Errors
    /// Returns [`ApiError::UnsupportedOperation`] if the dialect has no such route.
    pub fn spec(&self, route: Route, params: Params) -> Result<RequestSpec, ApiError> {
        RequestSpec::for_route(route, self.dialect(), params)
    }

    /// Resolves and authenticates a call without sending it.
    ///
    /// # Errors
    /// Fails with [`ApiError::UnsupportedOperation`] for mutating calls on read only dialects,
    /// with [`ApiError::Auth`] when credentials are needed and missing, and with
    /// [`ApiError::InvalidParameter`] when the parameters can't be placed.
    pub fn prepare(&mut self, spec: RequestSpec) -> Result<PreparedRequest, ApiError> {
        if self.requests.dialect_config().read_only && spec.method.is_mutating() {
            return Err(ApiError::UnsupportedOperation {
                route: spec.route.name().to_string(),
                dialect: self.dialect(),
            });
        }

        let auth = self
            .session
            .auth
            .authorize(spec.requires_auth, spec.method)?;
        self.requests.build(spec, auth)
    }

    /// Sends a call and decodes its body.
    ///
    /// # Errors
    /// Any [`ApiError`]. Nothing is sent if the call fails before reaching the transport.
    pub async fn execute(&mut self, spec: RequestSpec) -> Result<Value, ApiError> {
        let request = self.prepare(spec)?;
        self.dispatch(request).await
    }

    /// Same as [`execute`](Self::execute), deserializing the body into `D`.
    ///
    /// # Errors
    /// See [`execute`](Self::execute). A body that doesn't match `D` is an
    /// [`ApiError::Decode`].
    pub async fn execute_as<D: DeserializeOwned>(
        &mut self,
        spec: RequestSpec,
    ) -> Result<D, ApiError> {
        response::decode_as(self.execute(spec).await?)
    }

    /// Calls `route` with `params`, using the method and auth requirement of the dialect's route
    /// table.
    ///
    /// # Errors
    /// See [`execute`](Self::execute).
    pub async fn call(&mut self, route: Route, params: Params) -> Result<Value, ApiError> {
        let spec = self.spec(route, params)?;
        self.execute(spec).await
    }

    /// Calls a route addressing a single resource (`posts/{id}.json`).
    ///
    /// # Errors
    /// See [`execute`](Self::execute).
    pub async fn call_with_id(
        &mut self,
        route: Route,
        id: impl Display,
        params: Params,
    ) -> Result<Value, ApiError> {
        let spec = self.spec(route, params)?.with_resource_id(id);
        self.execute(spec).await
    }

    async fn dispatch(&mut self, request: PreparedRequest) -> Result<Value, ApiError> {
        let route = request.route;
        let method = request.method;
        let url = request.url.to_string();

        match self.transport.send(request).await {
            Ok(raw) => {
                self.session.record(LastCall::answered(
                    route,
                    method,
                    raw.url.clone(),
                    raw.status,
                    raw.headers.clone(),
                ));
                response::normalize(&raw, self.requests.dialect_config().format)
            }
            Err(SendError { error, head }) => {
                warn!("{method} {url} failed: {error}");
                let call = match head {
                    Some(head) => {
                        LastCall::answered(route, method, head.url, head.status, head.headers)
                    }
                    None => LastCall::unanswered(route, method, url),
                };
                self.session.record(call);
                Err(error)
            }
        }
    }
}

/// Configures and builds a [`BooruClient`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    dialect: Dialect,
    site_name: Option<String>,
    site_url: Option<String>,
    credentials: Credentials,
    api_version: Option<String>,
    timeout: Duration,
    registry: Option<SiteRegistry>,
}

impl ClientBuilder {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            site_name: None,
            site_url: None,
            credentials: Credentials::default(),
            api_version: None,
            timeout: DEFAULT_TIMEOUT,
            registry: None,
        }
    }

    /// A site from the registry. Mutually exclusive with [`site_url`](Self::site_url).
    #[must_use]
    pub fn site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = Some(name.into());
        self
    }

    /// Any site speaking the dialect. Mutually exclusive with [`site_name`](Self::site_name).
    #[must_use]
    pub fn site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.credentials.username = Some(username.into());
        self
    }

    /// Used by the token dialects.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.credentials.api_key = Some(api_key.into());
        self
    }

    /// Used by Moebooru, hashed with the site's template.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.credentials.password = Some(password.into());
        self
    }

    /// Overrides the site's hash template. Must contain a `{0}` placeholder.
    #[must_use]
    pub fn hash_template(mut self, template: impl Into<String>) -> Self {
        self.credentials.hash_template = Some(template.into());
        self
    }

    /// Moebooru API version, see [`LEGACY_API_VERSIONS`](crate::request::LEGACY_API_VERSIONS).
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolves site names against `registry` instead of the built-in one.
    #[must_use]
    pub fn registry(mut self, registry: SiteRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// # Errors
    /// Returns [`ApiError::Config`] if the site can't be resolved and
    /// [`ApiError::Connection`] if the HTTP client can't be built.
    pub fn build(self) -> Result<BooruClient, ApiError> {
        let transport = ReqwestTransport::new(self.dialect, self.timeout)?;
        self.build_with_transport(transport)
    }

    /// Builds a client sending its requests through `transport`.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the site can't be resolved.
    pub fn build_with_transport<T: Transport>(
        self,
        transport: T,
    ) -> Result<BooruClient<T>, ApiError> {
        let registry = self.registry.as_ref().unwrap_or(&*DEFAULT_SITES);

        let site = resolver::resolve(
            registry,
            self.dialect,
            self.site_name.as_deref(),
            self.site_url.as_deref(),
        )?;

        let requests = RequestBuilder::new(&site, self.api_version.as_deref())?;
        let auth = Authenticator::new(
            requests.dialect_config().auth,
            self.credentials,
            site.auth_template.as_deref(),
        );

        debug!("Client for {site} ({}) at {}", site.dialect, site.base_url);

        Ok(BooruClient {
            session: ClientSession::new(site, auth),
            requests,
            transport,
        })
    }
}
