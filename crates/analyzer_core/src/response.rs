use serde_json::Value;

/// The analysis payload did not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Invalid API response: body is not JSON ({0})")]
    InvalidJson(String),
    #[error("Invalid API response: 'data' object not found.{}", service_suffix(.service_message))]
    MissingData { service_message: Option<String> },
}

fn service_suffix(message: &Option<String>) -> String {
    match message {
        Some(text) => format!(" Service reported: {text}"),
        None => String::new(),
    }
}

/// Unmodified JSON body of a successful upload, guaranteed to carry a `data` object.
///
/// The body is kept verbatim so the detail view and the report download can
/// read fields the summary does not cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnalysisResponse {
    value: Value,
}

impl RawAnalysisResponse {
    pub fn from_json(value: Value) -> Result<Self, SchemaError> {
        match value.get("data") {
            Some(Value::Object(_)) => Ok(Self { value }),
            _ => Err(SchemaError::MissingData {
                service_message: error_message(&value),
            }),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, SchemaError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|err| SchemaError::InvalidJson(err.to_string()))?;
        Self::from_json(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.value
    }

    pub fn into_json(self) -> Value {
        self.value
    }

    /// A field of the nested `data` object.
    pub fn data_field(&self, key: &str) -> Option<&Value> {
        self.value.get("data").and_then(|data| data.get(key))
    }

    /// The service's own verdict; `None` when the flag is missing or not a bool.
    pub fn success(&self) -> Option<bool> {
        self.value.get("success").and_then(Value::as_bool)
    }

    pub fn report_id(&self) -> Option<String> {
        identifier(self.value.get("resume_report_id"))
    }

    pub fn resume_file_id(&self) -> Option<String> {
        identifier(self.value.get("resume_file_id"))
    }

    pub fn document_id(&self) -> Option<String> {
        identifier(self.value.get("_id"))
    }

    pub fn resume_file_name(&self) -> Option<&str> {
        self.value
            .get("resume_file_name")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
    }

    /// `error.message` of a response the service itself marked as failed.
    pub fn service_error_message(&self) -> Option<String> {
        if self.success() == Some(false) {
            error_message(&self.value)
        } else {
            None
        }
    }

    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.value).unwrap_or_else(|_| self.value.to_string())
    }
}

fn error_message(value: &Value) -> Option<String> {
    value
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

// Identifiers are strings in practice; numbers are accepted and rendered as text.
fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
