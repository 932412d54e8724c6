// Turns the service's reply into the text printed for the user.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Status codes after which the body is a JSON list of bundle results.
pub const SUCCESS_CODES: [u16; 3] = [200, 201, 202];

/// Outcome for one bundle as reported by the service. Field names match in
/// any letter case and `null` reads as empty.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(try_from = "Map<String, Value>")]
pub struct BundleResult {
    pub status: String,
    pub url: String,
    pub errors: Vec<String>,
    pub basename: String,
}

#[derive(Deserialize)]
struct RawBundle {
    status: Option<String>,
    url: Option<String>,
    errors: Option<Vec<Option<String>>>,
    basename: Option<String>,
}

impl TryFrom<Map<String, Value>> for BundleResult {
    type Error = serde_json::Error;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let fields: Map<String, Value> = fields
            .into_iter()
            .map(|(name, value)| (name.to_lowercase(), value))
            .collect();
        let raw: RawBundle = serde_json::from_value(Value::Object(fields))?;

        Ok(BundleResult {
            status: raw.status.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
            errors: raw
                .errors
                .unwrap_or_default()
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect(),
            basename: raw.basename.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleStatus {
    Success,
    Found,
    Queued,
    Other,
}

impl BundleResult {
    pub fn kind(&self) -> BundleStatus {
        match self.status.to_lowercase().as_str() {
            "success" => BundleStatus::Success,
            "found" => BundleStatus::Found,
            "queued" => BundleStatus::Queued,
            _ => BundleStatus::Other,
        }
    }

    fn describe(&self) -> String {
        let mut text = String::new();
        if !self.basename.is_empty() {
            text.push_str(&format!("Bundle {}:\n", self.basename));
        }
        match self.kind() {
            BundleStatus::Success => text.push_str(&format!(
                "Files successfully uploaded. Browse them here:\n{}",
                self.url
            )),
            BundleStatus::Found => text.push_str(&format!(
                "Files ignored because they were already archived. Browse them here:\n{}",
                self.url
            )),
            BundleStatus::Queued => text.push_str(
                "Files queued for uploading. Check your inbox for more information.",
            ),
            BundleStatus::Other => {
                let errors = self.errors.join("\n");
                text.push_str(&format!(
                    "Failed to upload.\nStatus: {}\nErrors:\n{}.",
                    self.status, errors
                ))
            }
        }
        text.push_str("\n\n");
        text
    }
}

/// Build the report for a response. Only success codes are decoded as JSON;
/// anything else is echoed back verbatim.
pub fn interpret(status: u16, body: &[u8]) -> String {
    if !SUCCESS_CODES.contains(&status) {
        return format!(
            "Rubberband replied with {}:\n{}",
            status,
            String::from_utf8_lossy(body)
        );
    }

    match serde_json::from_slice::<Vec<BundleResult>>(body) {
        Ok(results) => results.iter().map(BundleResult::describe).collect(),
        Err(err) => format!(
            "Rubberband replied with {} but the response could not be read: {}\n{}",
            status,
            err,
            String::from_utf8_lossy(body)
        ),
    }
}
