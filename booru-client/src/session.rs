//! Per client state: the resolved site, its credentials and a record of the last request.
use reqwest::header::HeaderMap;

use crate::auth::Authenticator;
use crate::registry::SiteConfig;
use crate::request::HttpMethod;
use crate::routes::Route;
use crate::status::{self, StatusInfo};

/// What was sent by the most recent call and what came back.
#[derive(Debug, Clone)]
pub struct LastCall {
    pub route: Route,
    pub method: HttpMethod,
    pub url: String,
    /// `None` when no response was received.
    pub status_code: Option<u16>,
    pub status: Option<StatusInfo>,
    pub headers: HeaderMap,
}

impl LastCall {
    #[must_use]
    pub fn answered(
        route: Route,
        method: HttpMethod,
        url: String,
        status_code: u16,
        headers: HeaderMap,
    ) -> Self {
        Self {
            route,
            method,
            url,
            status_code: Some(status_code),
            status: Some(status::describe(status_code)),
            headers,
        }
    }

    /// A request that never got an answer (timeout or connection failure).
    #[must_use]
    pub fn unanswered(route: Route, method: HttpMethod, url: String) -> Self {
        Self {
            route,
            method,
            url,
            status_code: None,
            status: None,
            headers: HeaderMap::new(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code.is_some_and(status::is_success)
    }
}

#[derive(Debug, Clone)]
pub struct ClientSession {
    pub(crate) site: SiteConfig,
    pub(crate) auth: Authenticator,
    pub(crate) last_call: Option<LastCall>,
}

impl ClientSession {
    #[must_use]
    pub const fn new(site: SiteConfig, auth: Authenticator) -> Self {
        Self {
            site,
            auth,
            last_call: None,
        }
    }

    #[must_use]
    pub const fn site(&self) -> &SiteConfig {
        &self.site
    }

    #[must_use]
    pub const fn last_call(&self) -> Option<&LastCall> {
        self.last_call.as_ref()
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.auth.username()
    }

    pub(crate) fn record(&mut self, call: LastCall) {
        self.last_call = Some(call);
    }
}
