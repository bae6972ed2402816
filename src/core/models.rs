use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Premium,
    Standard,
    Free,
}

impl ModelTier {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "premium" => Some(Self::Premium),
            "standard" => Some(Self::Standard),
            "free" => Some(Self::Free),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Premium => "premium",
            Self::Standard => "standard",
            Self::Free => "free",
        }
    }

}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Outbound payload for `POST /rate-limit/check`.
///
/// `tenant_id` is omitted from the JSON entirely (not sent as null) when
/// absent; the service accepts both request shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub user_id: String,
    pub model_id: String,
    pub model_tier: ModelTier,
}

/// Verdict returned by the decision service. Immutable once received.
///
/// `count`/`limit`/`window_seconds` always describe the primary (binding)
/// policy. `cause` is only present on a blocked verdict, `fulfilled` only on
/// an allowed one; the order of `fulfilled` is the service's evaluation
/// order and is preserved through rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub allowed: bool,
    pub count: u64,
    pub limit: u64,
    pub window_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfilled: Option<Vec<PolicySummary>>,
}

/// A policy that was evaluated and found within its threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySummary {
    pub label: String,
    pub key: String,
    pub count: u64,
    pub limit: u64,
    pub window_seconds: u64,
}
