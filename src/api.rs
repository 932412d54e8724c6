// API client module: a small blocking HTTP client that prepares the upload
// request for the Rubberband service, sends it and hands back whatever the
// service replied.

use crate::error::TransportError;
use log::debug;
use reqwest::blocking::{multipart::Form, Client, Request};
use url::Url;

pub const API_TOKEN_HEADER: &str = "X-Api-Token";
pub const FORWARDED_EMAIL_HEADER: &str = "X-Forwarded-Email";

/// Status code and raw body of a service reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends a fully built request.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    fn send(&self, request: Request) -> Result<RawResponse, TransportError>;
}

/// Blocking reqwest client holding the API token for every request.
pub struct ApiClient {
    client: Client,
    api_key: String,
}

impl ApiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder().build().map_err(TransportError::Client)?;
        Ok(ApiClient {
            client,
            api_key: api_key.into(),
        })
    }

    /// PUT `form` to `url` on behalf of `identity`. The multipart content
    /// type, with its boundary, is set from the form.
    pub fn build_request(
        &self,
        url: Url,
        form: Form,
        identity: &str,
    ) -> Result<Request, reqwest::Error> {
        self.client
            .put(url)
            .header(API_TOKEN_HEADER, &self.api_key)
            .header(FORWARDED_EMAIL_HEADER, identity)
            .multipart(form)
            .build()
    }
}

impl Transport for ApiClient {
    fn send(&self, request: Request) -> Result<RawResponse, TransportError> {
        let url = request.url().to_string();
        debug!("{} {}", request.method(), url);
        let res = self
            .client
            .execute(request)
            .map_err(|source| TransportError::Send {
                url: url.clone(),
                source,
            })?;

        let status = res.status().as_u16();
        debug!("Service replied with {}", status);
        let body = res
            .bytes()
            .map_err(|source| TransportError::Body { url, source })?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
