// Library root
// -----------
// This crate exposes the pieces of the rubberband upload client. The binary
// (`main.rs`) parses arguments and drives an `upload::Uploader`.
//
// Module responsibilities:
// - `config`: environment-backed settings, read once at startup.
// - `identity`: resolves the email forwarded as the uploader (placeholder
//   or LDAP lookup).
// - `request`: builds the multipart body and picks the sync/async endpoint.
// - `api`: sends the request over blocking HTTP.
// - `report`: turns the service's reply into printable text.
// - `upload`: the `upload` command tying the above together.
// - `cli`, `ui`: argument definitions and terminal feedback.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod report;
pub mod request;
pub mod serde_utils;
pub mod ui;
pub mod upload;
