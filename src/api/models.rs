use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SendOutcome {
    pub id: String,
    pub thread_id: Option<String>,
    pub note: String,
}
