// The `upload` command: validate the file list, then resolve the identity,
// build the request, send it and interpret the reply.

use crate::api::{ApiClient, Transport};
use crate::config::Config;
use crate::identity::{resolve_identity, Directory};
use crate::report;
use crate::request::{RequestBuilder, UploadOptions, ASYNC_BODY_THRESHOLD};
use crate::ui;
use anyhow::{Context, Result};
use log::info;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub fn missing_files_message(count: usize) -> String {
    format!(
        "Rubberband needs output files (.set, .out, .err, .meta, .solu). You provided {}. Aborting.",
        count
    )
}

pub fn duplicate_files_message(duplicates: &[&Path]) -> String {
    let listed: Vec<String> = duplicates
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    format!(
        "Each file may only be listed once. Listed more than once:\n{}\nAborting.",
        listed.join("\n")
    )
}

/// Paths that refer to a file already seen earlier in `files`.
pub fn find_duplicates(files: &[PathBuf]) -> Vec<&Path> {
    let mut seen = HashSet::new();
    files
        .iter()
        .filter(|path| {
            let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            !seen.insert(key)
        })
        .map(PathBuf::as_path)
        .collect()
}

pub struct Uploader<'a> {
    config: &'a Config,
    directory: &'a dyn Directory,
    client: &'a ApiClient,
    transport: &'a dyn Transport,
    async_threshold: usize,
}

impl<'a> Uploader<'a> {
    /// `client` builds the request and `transport` sends it; in the binary
    /// both are the same `ApiClient`.
    pub fn new(
        config: &'a Config,
        directory: &'a dyn Directory,
        client: &'a ApiClient,
        transport: &'a dyn Transport,
    ) -> Self {
        Uploader {
            config,
            directory,
            client,
            transport,
            async_threshold: ASYNC_BODY_THRESHOLD,
        }
    }

    pub fn async_threshold(mut self, bytes: usize) -> Self {
        self.async_threshold = bytes;
        self
    }

    /// Upload `files` and return the text to show the user. Input mistakes
    /// are explained in the returned text without contacting anything;
    /// configuration, local, directory and network failures are errors.
    pub fn upload(&self, files: &[PathBuf], options: &UploadOptions) -> Result<String> {
        if files.is_empty() {
            return Ok(missing_files_message(files.len()));
        }
        let duplicates = find_duplicates(files);
        if !duplicates.is_empty() {
            return Ok(duplicate_files_message(&duplicates));
        }

        let endpoint = self.config.upload_endpoint()?;
        let identity = resolve_identity(self.config, self.directory)
            .context("Failed to resolve uploader identity")?;

        let upload = RequestBuilder::new(self.client, endpoint)
            .async_threshold(self.async_threshold)
            .build(files, options, &identity)
            .context("Failed to prepare upload")?;
        info!(
            "Uploading {} file(s), {} bytes, to {}",
            files.len(),
            upload.size,
            upload.request.url()
        );

        let response = ui::with_spinner("Uploading...", || self.transport.send(upload.request))
            .context("Upload request failed")?;
        info!("Rubberband replied with {}", response.status);

        Ok(report::interpret(response.status, &response.body))
    }
}
