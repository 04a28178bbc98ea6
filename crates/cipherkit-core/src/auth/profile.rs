//! Signed-in user profile, as returned by the directory `/me` endpoint.

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, ErrorCode, Result};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(default)]
    pub user_principal_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_location: Option<String>,
}

impl UserProfile {
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(json).map_err(|e| {
            CryptoError::with_source(
                ErrorCode::InvalidInput,
                "parse_profile",
                "profile is not valid JSON",
                e,
            )
        })?;
        profile.validate()?;
        Ok(profile)
    }

    /// `id` and `userPrincipalName` must be present and non-blank.
    pub fn validate(&self) -> Result<()> {
        const OP: &str = "validate_profile";
        if self.id.trim().is_empty() {
            return Err(CryptoError::invalid_input(OP, "profile id is empty"));
        }
        if self.user_principal_name.trim().is_empty() {
            return Err(CryptoError::invalid_input(
                OP,
                "profile userPrincipalName is empty",
            ));
        }
        Ok(())
    }

    /// `mail` when set, otherwise the principal name.
    pub fn preferred_email(&self) -> &str {
        self.mail
            .as_deref()
            .filter(|mail| !mail.trim().is_empty())
            .unwrap_or(&self.user_principal_name)
    }

    pub fn display_name_or_principal(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.user_principal_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ME: &str = r#"{
        "id": "6f1c0d2e-0000-0000-0000-000000000001",
        "displayName": "Dana Reyes",
        "mail": null,
        "userPrincipalName": "dreyes@example.com",
        "jobTitle": "Underwriter",
        "officeLocation": "Building 2"
    }"#;

    #[test]
    fn test_parse_profile() {
        let profile = UserProfile::from_json(ME).unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Dana Reyes"));
        assert_eq!(profile.job_title.as_deref(), Some("Underwriter"));
        assert_eq!(profile.preferred_email(), "dreyes@example.com");
    }

    #[test]
    fn test_preferred_email_uses_mail() {
        let profile = UserProfile {
            mail: Some("dana@example.com".into()),
            ..UserProfile::from_json(ME).unwrap()
        };
        assert_eq!(profile.preferred_email(), "dana@example.com");
    }

    #[test]
    fn test_validate_requires_identity() {
        let missing_upn = r#"{"id": "abc"}"#;
        let err = UserProfile::from_json(missing_upn).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);

        let blank_id = UserProfile {
            id: "  ".into(),
            user_principal_name: "x@example.com".into(),
            ..UserProfile::default()
        };
        assert!(blank_id.validate().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(UserProfile::from_json(ME).unwrap()).unwrap();
        assert_eq!(json["userPrincipalName"], "dreyes@example.com");
        assert!(json.get("mail").is_none());
    }
}
