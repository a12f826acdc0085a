use serde::{Deserialize, Serialize};

pub const FAILED: &str = "Failed";
pub const SUCCESS: &str = "Success";

/// Uniform response wrapper returned for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Detail attached to an [`Envelope`] when a request is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl Envelope {
    /// Create a new [`Envelope`] holding `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }

    /// Envelope sent back when a request cannot be processed.
    pub fn failed() -> Self {
        Self::new(FAILED)
    }

    pub fn success() -> Self {
        Self::new(SUCCESS)
    }

    /// Attach a field-level error.
    pub fn with_error(
        mut self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.errors.get_or_insert_with(Vec::new).push(FieldError {
            field: field.into(),
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_serializes_message_only() {
        let json = serde_json::to_value(Envelope::failed()).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Failed" }));
    }

    #[test]
    fn test_with_error_appends() {
        let envelope = Envelope::failed()
            .with_error("body", "missing field")
            .with_error("body", "bad type");

        let errors = envelope.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].message, "bad type");
    }
}
