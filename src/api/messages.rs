pub fn send_endpoint() -> &'static str {
    "/gmail/v1/users/me/messages/send"
}
