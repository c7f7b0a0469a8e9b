//! Client-related types shared between the HTTP client and the console
//!
//! Request bodies for the credential flows.

use serde::{Deserialize, Serialize};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Customer / admin login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Self-service sign up
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    #[serde(default)]
    pub is_employee: bool,
}

/// Legacy sign-up body (`cus_name` / `mobile` backends)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacySignupRequest {
    pub cus_name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
}

impl From<&SignupRequest> for LegacySignupRequest {
    fn from(req: &SignupRequest) -> Self {
        Self {
            cus_name: req.name.clone(),
            email: req.email.clone(),
            password: req.password.clone(),
            mobile: req.phone.clone(),
        }
    }
}

/// Request a password reset link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Complete a password reset with the emailed token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_wire_names() {
        let req = SignupRequest {
            name: "Jane".into(),
            email: "j@x.com".into(),
            password: "pw".into(),
            phone: "555".into(),
            is_employee: false,
        };
        let modern = serde_json::to_value(&req).unwrap();
        assert_eq!(modern["isEmployee"], false);

        let legacy = serde_json::to_value(LegacySignupRequest::from(&req)).unwrap();
        assert_eq!(legacy["cus_name"], "Jane");
        assert_eq!(legacy["mobile"], "555");
    }

    #[test]
    fn test_reset_uses_new_password_key() {
        let req = ResetPasswordRequest {
            token: "t".into(),
            new_password: "n".into(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"token":"t","newPassword":"n"}"#);
    }
}
