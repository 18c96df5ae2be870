use serde::{Deserialize, Serialize};

/// The `{success, message, data}` wrapper carried by every JSON response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Envelope<T> {
    /// Whether the request did what was asked
    pub success: bool,
    /// A human-readable message, always present on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The payload, present on success. A missing field reads as `None`
    /// without asking `T` for a default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// A successful response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Attach a message to the response.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// A failed response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, Session, UserId};

    #[test]
    fn failures_without_data_parse_for_any_payload() {
        // Session has no Default impl
        let envelope: Envelope<Session> =
            serde_json::from_str(r#"{"success":false,"message":"not authorized"}"#).unwrap();
        assert_eq!(envelope, Envelope::failure("not authorized"));
    }

    #[test]
    fn payloads_round_trip_without_null_fields() {
        let session = Session {
            user_id: UserId(uuid::Uuid::new_v4()),
            name: "Admin Pusat".into(),
            role: Role::Admin,
            office_id: None,
        };
        let json = serde_json::to_value(Envelope::ok(session.clone())).unwrap();
        assert!(json.get("message").is_none());

        let envelope: Envelope<Session> = serde_json::from_value(json).unwrap();
        assert_eq!(envelope.data, Some(session));
        assert!(envelope.success);
    }
}
