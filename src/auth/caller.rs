use crate::error::{AppError, AppResult};

/// The two authorization paths into the send pipeline, dispatched explicitly.
/// A trusted caller is the helpdesk backend acting on behalf of a named
/// agent; an end user is an agent operating directly. Nothing downstream
/// infers trust by comparing secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticatedCaller {
    TrustedSystem { acting_user: String },
    EndUser { user_id: String },
}

impl AuthenticatedCaller {
    pub fn resolve(service: bool, user: Option<String>) -> AppResult<Self> {
        let user = user
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        match (service, user) {
            (true, Some(acting_user)) => Ok(Self::TrustedSystem { acting_user }),
            (true, None) => Err(AppError::Unauthenticated(
                "service callers must name the user they act for; pass --user".to_string(),
            )),
            (false, Some(user_id)) => Ok(Self::EndUser { user_id }),
            (false, None) => Err(AppError::Unauthenticated(
                "no acting user; pass --user (optionally with --service)".to_string(),
            )),
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            Self::TrustedSystem { acting_user } => acting_user,
            Self::EndUser { user_id } => user_id,
        }
    }
}
