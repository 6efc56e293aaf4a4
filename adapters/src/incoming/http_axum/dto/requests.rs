use serde::{Deserialize, Serialize};
#[cfg(feature = "docs")]
use utoipa::{IntoParams, ToSchema};

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Ban a user. The executor must hold a strictly higher role than the target.",
    example = json!({
        "email": "spammer@example.com",
        "reason": "spam"
    })
))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanUserRequest {
    pub email: String,
    /// Absent and `null` both mean an empty reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Unban requests carry no reason; one supplied by the client is ignored.
#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(example = json!({ "email": "spammer@example.com" })))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnbanUserRequest {
    pub email: String,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(example = json!({ "email": "moderator@example.com" })))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleChangeRequest {
    pub email: String,
}

#[cfg_attr(feature = "docs", derive(IntoParams))]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InspectQuery {
    #[serde(default)]
    pub email: String,
}
