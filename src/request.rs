// Request construction: puts every file into a multipart/form-data body,
// buffers it to learn its wire size and picks the sync or async endpoint.

use crate::api::ApiClient;
use crate::error::RequestError;
use log::{debug, info};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Request;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// Bodies at or above this size are always sent to the async endpoint so the
/// service does not time out while processing them.
pub const ASYNC_BODY_THRESHOLD: usize = 400_000_000;

const FILE_MIME: &str = "application/octet-stream";

/// Per-invocation upload settings taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Comma-separated tags, passed through untouched.
    pub tags: String,
    /// Expiration date, e.g. "2017-Aug-24". Not validated locally.
    pub expiration: Option<String>,
    /// Ask the service to process the upload asynchronously.
    pub asynchronous: bool,
}

/// A request with its body already buffered in memory.
#[derive(Debug)]
pub struct UploadRequest {
    pub request: Request,
    /// Encoded body size in bytes, multipart framing included.
    pub size: usize,
    /// Effective mode after applying the size threshold.
    pub asynchronous: bool,
}

impl UploadRequest {
    pub fn body_bytes(&self) -> &[u8] {
        self.request
            .body()
            .and_then(|body| body.as_bytes())
            .unwrap_or_default()
    }
}

pub struct RequestBuilder<'a> {
    client: &'a ApiClient,
    endpoint: Url,
    async_threshold: usize,
}

impl<'a> RequestBuilder<'a> {
    /// `endpoint` is the synchronous upload URL, `<base>/api/upload`.
    pub fn new(client: &'a ApiClient, endpoint: Url) -> Self {
        RequestBuilder {
            client,
            endpoint,
            async_threshold: ASYNC_BODY_THRESHOLD,
        }
    }

    pub fn async_threshold(mut self, bytes: usize) -> Self {
        self.async_threshold = bytes;
        self
    }

    /// Build the PUT for `files`, sent on behalf of `identity`.
    pub fn build(
        &self,
        files: &[PathBuf],
        options: &UploadOptions,
        identity: &str,
    ) -> Result<UploadRequest, RequestError> {
        let form = build_form(files, options)?;
        let mut request = self
            .client
            .build_request(self.endpoint.clone(), form, identity)
            .map_err(RequestError::Encode)?;

        let size = match request.body_mut() {
            Some(body) => body.buffer().map_err(RequestError::Encode)?.len(),
            None => 0,
        };

        let asynchronous = options.asynchronous || size >= self.async_threshold;
        if asynchronous && !options.asynchronous {
            info!(
                "Body is {} bytes (limit {}), switching to async upload",
                size, self.async_threshold
            );
        }
        if asynchronous {
            if let Ok(mut segments) = request.url_mut().path_segments_mut() {
                segments.pop_if_empty().push("async");
            }
        }

        Ok(UploadRequest {
            request,
            size,
            asynchronous,
        })
    }
}

/// Parts `file0..fileN` in input order, then `tags` and, when set,
/// `expirationdate`. Fails on the first file that cannot be opened.
pub fn build_form(files: &[PathBuf], options: &UploadOptions) -> Result<Form, RequestError> {
    let mut form = Form::new();

    for (index, path) in files.iter().enumerate() {
        let name = format!("file{}", index);
        let file = File::open(path).map_err(|source| RequestError::Open {
            path: path.clone(),
            source,
        })?;
        let part = Part::reader(file)
            .file_name(base_name(path))
            .mime_str(FILE_MIME)
            .map_err(RequestError::Encode)?;
        debug!("Added {} as {}", path.display(), name);
        form = form.part(name, part);
    }

    form = form.text("tags", options.tags.clone());
    if let Some(expiration) = options.expiration.as_deref().filter(|e| !e.is_empty()) {
        form = form.text("expirationdate", expiration.to_string());
    }
    Ok(form)
}

/// Final path component as the service should see it.
fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
