use rbcli::api::{ApiClient, RawResponse, Transport, API_TOKEN_HEADER, FORWARDED_EMAIL_HEADER};
use rbcli::config::Config;
use rbcli::error::{IdentityError, TransportError};
use rbcli::identity::Directory;
use rbcli::request::UploadOptions;
use rbcli::upload::Uploader;
use reqwest::blocking::Request;
use reqwest::Method;
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Records every request and answers with a canned response.
struct RecordingTransport {
    sent: RefCell<Vec<Request>>,
    status: u16,
    body: &'static str,
}

impl RecordingTransport {
    fn replying(status: u16, body: &'static str) -> Self {
        RecordingTransport {
            sent: RefCell::new(Vec::new()),
            status,
            body,
        }
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: Request) -> Result<RawResponse, TransportError> {
        self.sent.borrow_mut().push(request);
        Ok(RawResponse {
            status: self.status,
            body: self.body.as_bytes().to_vec(),
        })
    }
}

struct FixedDirectory(Vec<Vec<String>>);

impl Directory for FixedDirectory {
    fn mail_entries(&self, _username: &str) -> Result<Vec<Vec<String>>, IdentityError> {
        Ok(self.0.clone())
    }
}

fn config(use_ldap: &str) -> Config {
    Config::from_vars(vec![
        ("RUBBERBAND_URL".to_string(), "http://localhost:8080".to_string()),
        ("RUBBERBAND_API_KEY".to_string(), "token".to_string()),
        ("RBCLI_USE_LDAP".to_string(), use_ldap.to_string()),
    ])
    .unwrap()
}

fn client() -> ApiClient {
    ApiClient::new("token").unwrap()
}

fn identity(request: &Request) -> &str {
    request.headers()[FORWARDED_EMAIL_HEADER].to_str().unwrap()
}

fn body_text(request: &Request) -> String {
    let bytes = request.body().and_then(|body| body.as_bytes()).unwrap_or_default();
    String::from_utf8_lossy(bytes).into_owned()
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn uploads_bundle_and_reports_each_result() {
    let dir = TempDir::new().unwrap();
    let files = vec![
        write(&dir, "check.out", "primal bound 42"),
        write(&dir, "check.set", "limits/time = 60"),
    ];
    let transport = RecordingTransport::replying(
        200,
        r#"[{"Status":"success","Url":"http://localhost:8080/result/a","Errors":null,"Basename":"check.out"},
            {"Status":"queued","Url":"","Errors":null,"Basename":"check.set"}]"#,
    );
    let config = config("false");
    let client = client();
    let directory = FixedDirectory(Vec::new());
    let options = UploadOptions {
        tags: "nightly,mip".to_string(),
        expiration: Some("2030-Jan-01".to_string()),
        asynchronous: false,
    };

    let report = Uploader::new(&config, &directory, &client, &transport)
        .upload(&files, &options)
        .unwrap();

    assert_eq!(
        report,
        "Bundle check.out:\n\
         Files successfully uploaded. Browse them here:\n\
         http://localhost:8080/result/a\n\n\
         Bundle check.set:\n\
         Files queued for uploading. Check your inbox for more information.\n\n"
    );

    let sent = transport.sent.borrow();
    assert_eq!(sent.len(), 1);
    let request = &sent[0];
    assert_eq!(request.method(), &Method::PUT);
    assert_eq!(identity(request), "ghost");
    assert_eq!(request.headers()[API_TOKEN_HEADER], "token");
    assert_eq!(request.url().as_str(), "http://localhost:8080/api/upload");

    let body = body_text(request);
    assert!(body.contains("name=\"file0\"; filename=\"check.out\""));
    assert!(body.contains("name=\"file1\"; filename=\"check.set\""));
    assert!(!body.contains("name=\"file2\""));
    assert!(body.contains("name=\"tags\"\r\n\r\nnightly,mip\r\n"));
    assert!(body.contains("name=\"expirationdate\"\r\n\r\n2030-Jan-01\r\n"));
}

#[test]
fn async_flag_uses_async_endpoint() {
    let dir = TempDir::new().unwrap();
    let files = vec![write(&dir, "small.out", "x")];
    let transport = RecordingTransport::replying(202, r#"[{"Status":"queued"}]"#);
    let config = config("0");
    let client = client();
    let directory = FixedDirectory(Vec::new());
    let options = UploadOptions {
        asynchronous: true,
        ..Default::default()
    };

    Uploader::new(&config, &directory, &client, &transport)
        .upload(&files, &options)
        .unwrap();

    let sent = transport.sent.borrow();
    assert_eq!(sent[0].url().as_str(), "http://localhost:8080/api/upload/async");
}

#[test]
fn service_error_is_reported_not_raised() {
    let dir = TempDir::new().unwrap();
    let files = vec![write(&dir, "check.out", "x")];
    let transport = RecordingTransport::replying(401, "invalid api token");
    let config = config("false");
    let client = client();
    let directory = FixedDirectory(Vec::new());

    let report = Uploader::new(&config, &directory, &client, &transport)
        .upload(&files, &UploadOptions::default())
        .unwrap();

    assert_eq!(report, "Rubberband replied with 401:\ninvalid api token");
}

#[test]
fn empty_file_list_sends_nothing() {
    let transport = RecordingTransport::replying(200, "[]");
    let config = config("true");
    let client = client();
    let directory = FixedDirectory(Vec::new());

    let report = Uploader::new(&config, &directory, &client, &transport)
        .upload(&[], &UploadOptions::default())
        .unwrap();

    assert!(report.contains("You provided 0."));
    assert!(transport.sent.borrow().is_empty());
}

#[test]
fn ambiguous_directory_result_aborts_upload() {
    let dir = TempDir::new().unwrap();
    let files = vec![write(&dir, "check.out", "x")];
    let transport = RecordingTransport::replying(200, "[]");
    let config = config("true");
    let client = client();
    let directory = FixedDirectory(vec![
        vec!["one@example.com".to_string()],
        vec!["two@example.com".to_string()],
    ]);

    let result = Uploader::new(&config, &directory, &client, &transport)
        .upload(&files, &UploadOptions::default());

    assert!(result.is_err());
    assert!(transport.sent.borrow().is_empty());
}

#[test]
fn directory_mail_is_forwarded_lowercased() {
    let dir = TempDir::new().unwrap();
    let files = vec![write(&dir, "check.out", "x")];
    let transport = RecordingTransport::replying(200, "[]");
    let config = config("true");
    let client = client();
    let directory = FixedDirectory(vec![vec!["User@Example.COM".to_string()]]);

    Uploader::new(&config, &directory, &client, &transport)
        .upload(&files, &UploadOptions::default())
        .unwrap();

    let sent = transport.sent.borrow();
    assert_eq!(identity(&sent[0]), "user@example.com");
}

#[test]
fn null_fields_in_failed_bundle_are_reported() {
    let dir = TempDir::new().unwrap();
    let files = vec![write(&dir, "check.out", "x")];
    let transport = RecordingTransport::replying(
        200,
        r#"[{"Status":"error","Url":null,"Errors":["missing .solu file"],"Basename":null}]"#,
    );
    let config = config("false");
    let client = client();
    let directory = FixedDirectory(Vec::new());

    let report = Uploader::new(&config, &directory, &client, &transport)
        .upload(&files, &UploadOptions::default())
        .unwrap();

    assert_eq!(
        report,
        "Failed to upload.\nStatus: error\nErrors:\nmissing .solu file.\n\n"
    );
}
