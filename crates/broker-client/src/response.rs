//! Interpretation of user-info responses from the SSO server.

use broker_config_and_utils::UserModelMapping;
use serde_json::{Map, Value};
use session_sync_policy::{RemoteSessionResult, TransportCause, TransportKind, UserId};

/// Classify a user-info response.
///
/// An `error` field takes precedence over `data`. The no-session case is
/// recognised only by `no_session_marker` appearing in the error message,
/// compared case-insensitively; every other error is a server failure.
/// `data` is only read from 2xx responses.
pub fn classify_response(
    status: u16,
    body: &str,
    model: &UserModelMapping,
    no_session_marker: &str,
) -> RemoteSessionResult {
    let success = (200..300).contains(&status);

    let object = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => object,
        Ok(_) | Err(_) if success => {
            return transport(TransportKind::Malformed, "response body is not a JSON object");
        }
        _ => return transport(TransportKind::Status(status), "no JSON body"),
    };

    if let Some(message) = error_message(&object) {
        if contains_ignore_case(&message, no_session_marker) {
            return RemoteSessionResult::NoSessionError;
        }
        return transport(TransportKind::Server, message);
    }

    if !success {
        return transport(TransportKind::Status(status), "no error message");
    }

    match object.get("data") {
        None | Some(Value::Null) => RemoteSessionResult::NotFound,
        Some(Value::Object(data)) => parse_user(data, model),
        Some(_) => transport(TransportKind::Malformed, "'data' is not an object"),
    }
}

fn error_message(object: &Map<String, Value>) -> Option<String> {
    match object.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        Value::Object(inner) => Some(
            inner
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(inner.clone()).to_string()),
        ),
        other => Some(other.to_string()),
    }
}

fn parse_user(data: &Map<String, Value>, model: &UserModelMapping) -> RemoteSessionResult {
    let user_id = match data.get(&model.id_field) {
        Some(Value::String(id)) if !id.is_empty() => UserId::new(id.clone()),
        Some(Value::Number(id)) => UserId::new(id.to_string()),
        _ => {
            return transport(
                TransportKind::Malformed,
                format!("user '{}' missing or invalid", model.id_field),
            )
        }
    };

    let name = match data.get(&model.name_field).and_then(Value::as_str) {
        Some(name) => name.to_string(),
        None => {
            return transport(
                TransportKind::Malformed,
                format!("user '{}' missing", model.name_field),
            )
        }
    };

    let email = match data.get(&model.email_field).and_then(Value::as_str) {
        Some(email) => email.to_string(),
        None => {
            return transport(
                TransportKind::Malformed,
                format!("user '{}' missing", model.email_field),
            )
        }
    };

    RemoteSessionResult::Found {
        user_id,
        name,
        email,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn transport(kind: TransportKind, message: impl Into<String>) -> RemoteSessionResult {
    RemoteSessionResult::TransportError(TransportCause::new(kind, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use broker_config_and_utils::DEFAULT_NO_SESSION_MARKER;

    fn classify(status: u16, body: &str) -> RemoteSessionResult {
        classify_response(
            status,
            body,
            &UserModelMapping::default(),
            DEFAULT_NO_SESSION_MARKER,
        )
    }

    fn kind(result: RemoteSessionResult) -> TransportKind {
        match result {
            RemoteSessionResult::TransportError(cause) => cause.kind,
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn user_data_is_found() {
        let result = classify(
            200,
            r#"{"data":{"id":42,"name":"Alice","email":"a@x.com","role":"admin"}}"#,
        );
        assert_eq!(result, RemoteSessionResult::found(42_u64, "Alice", "a@x.com"));
    }

    #[test]
    fn string_ids_are_accepted() {
        let result = classify(200, r#"{"data":{"id":"u-7","name":"B","email":"b@x"}}"#);
        assert_eq!(result, RemoteSessionResult::found("u-7", "B", "b@x"));
    }

    #[test]
    fn missing_or_null_data_is_not_found() {
        assert_eq!(classify(200, "{}"), RemoteSessionResult::NotFound);
        assert_eq!(classify(200, r#"{"data":null}"#), RemoteSessionResult::NotFound);
    }

    #[test]
    fn no_session_message_matches_case_insensitively() {
        let body = r#"{"error":"There is NO Saved Session Data associated with the broker session id"}"#;
        assert_eq!(classify(200, body), RemoteSessionResult::NoSessionError);
        assert_eq!(classify(400, body), RemoteSessionResult::NoSessionError);
    }

    #[test]
    fn no_session_marker_in_error_object() {
        let body = r#"{"error":{"code":"E42","message":"no saved session data"}}"#;
        assert_eq!(classify(403, body), RemoteSessionResult::NoSessionError);
    }

    #[test]
    fn error_wins_over_data() {
        let body = r#"{"data":{"id":1,"name":"A","email":"a@x"},"error":"no saved session data"}"#;
        assert_eq!(classify(200, body), RemoteSessionResult::NoSessionError);
    }

    #[test]
    fn other_errors_are_server_failures() {
        let result = classify(500, r#"{"error":"database unavailable"}"#);
        match result {
            RemoteSessionResult::TransportError(cause) => {
                assert_eq!(cause.kind, TransportKind::Server);
                assert_eq!(cause.message, "database unavailable");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn custom_marker_is_honoured() {
        let result = classify_response(
            200,
            r#"{"error":"Broker session expired"}"#,
            &UserModelMapping::default(),
            "session EXPIRED",
        );
        assert_eq!(result, RemoteSessionResult::NoSessionError);

        // the default marker no longer matches
        let result = classify_response(
            200,
            r#"{"error":"no saved session data"}"#,
            &UserModelMapping::default(),
            "session expired",
        );
        assert_eq!(kind(result), TransportKind::Server);
    }

    #[test]
    fn unparseable_bodies() {
        assert_eq!(kind(classify(200, "<html>oops</html>")), TransportKind::Malformed);
        assert_eq!(kind(classify(200, "[1,2]")), TransportKind::Malformed);
        assert_eq!(kind(classify(502, "")), TransportKind::Status(502));
        assert_eq!(kind(classify(503, "Service Unavailable")), TransportKind::Status(503));
    }

    #[test]
    fn non_success_without_data_or_error() {
        assert_eq!(kind(classify(500, "{}")), TransportKind::Status(500));
    }

    #[test]
    fn user_data_on_error_status_is_ignored() {
        let body = r#"{"data":{"id":1,"name":"A","email":"a@x"}}"#;
        assert_eq!(kind(classify(503, body)), TransportKind::Status(503));
        assert_eq!(kind(classify(302, body)), TransportKind::Status(302));
        assert_eq!(kind(classify(500, r#"{"data":null}"#)), TransportKind::Status(500));
    }

    #[test]
    fn incomplete_user_is_malformed() {
        assert_eq!(
            kind(classify(200, r#"{"data":{"id":1,"name":"A"}}"#)),
            TransportKind::Malformed
        );
        assert_eq!(
            kind(classify(200, r#"{"data":{"name":"A","email":"a@x"}}"#)),
            TransportKind::Malformed
        );
        assert_eq!(kind(classify(200, r#"{"data":[]}"#)), TransportKind::Malformed);
    }

    #[test]
    fn model_mapping_renames_fields() {
        let model = UserModelMapping {
            id_field: "uid".to_string(),
            name_field: "display_name".to_string(),
            email_field: "mail".to_string(),
        };
        let result = classify_response(
            200,
            r#"{"data":{"uid":9,"display_name":"Zed","mail":"z@x"}}"#,
            &model,
            DEFAULT_NO_SESSION_MARKER,
        );
        assert_eq!(result, RemoteSessionResult::found(9_u64, "Zed", "z@x"));
    }
}
