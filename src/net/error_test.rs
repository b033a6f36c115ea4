use super::*;

fn status(status: u16, body: &str) -> ApiError {
    ApiError::Status { status, body: body.to_owned() }
}

#[test]
fn status_codes() {
    assert_eq!(ApiError::Transport("refused".into()).status(), Some(0));
    assert_eq!(status(409, "").status(), Some(409));
    assert_eq!(ApiError::Decode("bad".into()).status(), None);
    assert_eq!(ApiError::Validation(ValidationError::PasswordMismatch).status(), None);
}

#[test]
fn server_message_from_json_body() {
    let err = status(400, r#"{"status":400,"error":"Bad Request","message":"Email déjà utilisé"}"#);
    assert_eq!(err.server_message().as_deref(), Some("Email déjà utilisé"));
}

#[test]
fn server_message_json_without_message() {
    assert_eq!(status(400, r#"{"error":"Bad Request"}"#).server_message(), None);
    assert_eq!(status(400, r#"{"message":"  "}"#).server_message(), None);
}

#[test]
fn server_message_from_text_body() {
    assert_eq!(status(400, "Token expiré").server_message().as_deref(), Some("Token expiré"));
}

#[test]
fn server_message_ignores_html_and_empty() {
    assert_eq!(status(502, "<html>Bad Gateway</html>").server_message(), None);
    assert_eq!(status(500, "   ").server_message(), None);
}

#[test]
fn server_message_only_for_status_errors() {
    assert_eq!(ApiError::Transport("refused".into()).server_message(), None);
}

#[test]
fn validation_error_displays_its_own_text() {
    let err = ApiError::from(ValidationError::PasswordMismatch);
    assert_eq!(err.to_string(), "Passwords do not match");
}
