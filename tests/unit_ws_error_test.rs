use examsock::connection::WebSocketError;
use examsock::core::ExamSockError;
use serde_json::json;

#[tokio::test]
async fn test_unauthorized_fixes_status_and_code() {
    let error = WebSocketError::unauthorized(Some("bad token".to_string()));
    assert_eq!(error.status_code, 401);
    assert_eq!(error.error_code, "UNAUTHORIZED");
    assert_eq!(error.message.as_deref(), Some("bad token"));
}

#[tokio::test]
async fn test_wire_shape_uses_camel_case_fields() {
    let error = WebSocketError::unauthorized(Some("bad token".to_string()));
    let value = serde_json::to_value(&error).unwrap();
    assert_eq!(
        value,
        json!({
            "statusCode": 401,
            "errorCode": "UNAUTHORIZED",
            "message": "bad token",
        })
    );
}

#[tokio::test]
async fn test_absent_message_serializes_as_null() {
    let error = WebSocketError::unauthorized(None);
    let value = serde_json::to_value(&error).unwrap();
    assert_eq!(value["message"], json!(null));
}

#[tokio::test]
async fn test_to_json_produces_wire_payload() {
    let error = WebSocketError::unauthorized(None);
    let payload = error.to_json().unwrap();
    assert!(payload.contains("\"statusCode\":401"));
    assert!(payload.contains("\"errorCode\":\"UNAUTHORIZED\""));
}

#[tokio::test]
async fn test_missing_principal_maps_to_unauthorized() {
    let err = ExamSockError::MissingPrincipal("S1".to_string());
    let error = WebSocketError::from(&err);
    assert_eq!(error.status_code, 401);
    assert_eq!(error.error_code, "UNAUTHORIZED");
    assert!(error.message.unwrap().contains("S1"));
}
