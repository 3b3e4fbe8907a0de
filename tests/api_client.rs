mod error {
    pub use deskmail::error::*;
}

mod messages {
    pub use deskmail::api::messages::*;
}

mod models {
    pub use deskmail::api::models::*;
}

mod client_under_test {
    #![allow(dead_code)]

    include!("../src/api/client.rs");

    #[test]
    fn send_request_wire_shape_matches_gmail() {
        let request = GmailSendRequest {
            raw: "ZnJvbTpt".to_string(),
            thread_id: Some("thr-9".to_string()),
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["raw"], "ZnJvbTpt");
        assert_eq!(json["threadId"], "thr-9");
    }

    #[test]
    fn rejected_token_maps_to_credential_error() {
        let error = map_api_error(
            StatusCode::FORBIDDEN,
            r#"{"error":{"code":403,"message":"Insufficient Permission","status":"PERMISSION_DENIED"}}"#,
        );

        match error {
            AppError::Credential(message) => {
                assert!(message.contains("Insufficient Permission"));
            }
            other => panic!("expected credential error, got {other:?}"),
        }
    }

    #[test]
    fn provider_error_body_is_carried_in_send_error() {
        let error = map_api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":{"code":500,"message":"Backend Error","status":"INTERNAL"}}"#,
        );

        match error {
            AppError::Send(message) => {
                assert!(message.contains("Backend Error"));
                assert!(message.contains("status=INTERNAL"));
            }
            other => panic!("expected send error, got {other:?}"),
        }
    }
}
