//! The seam between request building and the network.
//!
//! [`BooruClient`](crate::BooruClient) only ever talks to a [`Transport`]. The default one is
//! backed by `reqwest`, tests plug in a recording stub.
use booru_common::{client, Dialect};
use log::{debug, warn};
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;
use crate::request::{FileUpload, PreparedRequest, RequestBody};

/// Applied to every request unless the client is built with another one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// What came back from the server, before any classification or decoding.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    /// Final URL, after redirects.
    pub url: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Status line and headers of a response whose body never arrived.
#[derive(Debug, Clone, Default)]
pub struct ResponseHead {
    pub status: u16,
    pub url: String,
    pub headers: HeaderMap,
}

/// A failed [`Transport::send`].
///
/// `head` is set when the server answered before the failure, so the call is still recorded
/// with its status.
#[derive(Debug)]
pub struct SendError {
    pub error: ApiError,
    pub head: Option<ResponseHead>,
}

impl SendError {
    #[must_use]
    pub const fn answered(error: ApiError, head: ResponseHead) -> Self {
        Self {
            error,
            head: Some(head),
        }
    }
}

impl From<ApiError> for SendError {
    fn from(error: ApiError) -> Self {
        Self { error, head: None }
    }
}

/// Sends a [`PreparedRequest`] and hands back the raw response.
///
/// Implementations must not retry and must map a timeout to [`ApiError::Timeout`].
pub trait Transport {
    fn send(
        &self,
        request: PreparedRequest,
    ) -> impl Future<Output = Result<RawResponse, SendError>> + Send;
}

/// [`Transport`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client with the dialect's user agent and `timeout`.
    ///
    /// # Errors
    /// Fails if the TLS backend can't be initialized.
    pub fn new(dialect: Dialect, timeout: Duration) -> Result<Self, ApiError> {
        let client = client!(dialect, timeout)?;
        Ok(Self { client })
    }

    /// Uses an already configured client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn form(
        fields: Vec<(String, String)>,
        files: Vec<(String, FileUpload)>,
    ) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (key, value) in fields {
            form = form.text(key, value);
        }
        for (key, file) in files {
            let mut part = Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(mime) = file.mime {
                part = part.mime_str(&mime)?;
            }
            form = form.part(key, part);
        }
        Ok(form)
    }
}

fn classify(error: reqwest::Error, url: &str) -> ApiError {
    if error.is_timeout() {
        warn!("Request to {url} timed out");
        ApiError::Timeout {
            url: url.to_string(),
        }
    } else {
        ApiError::Connection { source: error }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, SendError> {
        let url = request.url.to_string();
        let mut builder = self
            .client
            .request(request.method.as_reqwest(), request.url);

        if let Some(auth) = request.basic_auth {
            builder = builder.basic_auth(auth.username, Some(auth.password));
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart { fields, files } => {
                builder.multipart(Self::form(fields, files)?)
            }
        };

        debug!("{} {url}", request.method);

        let response = builder.send().await.map_err(|e| classify(e, &url))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response.headers().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                let head = ResponseHead {
                    status,
                    url: final_url,
                    headers,
                };
                return Err(SendError::answered(classify(e, &url), head));
            }
        };

        debug!("{status} from {final_url} ({} bytes)", body.len());

        Ok(RawResponse {
            status,
            url: final_url,
            headers,
            body,
        })
    }
}
