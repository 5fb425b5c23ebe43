//! Results of a sync cycle.

use serde::Serialize;
use session_sync_policy::SyncDecision;

/// What the host should do with the request after the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Pass the request on to the application.
    Continue,
    /// Answer with a redirect to `location` so the browser retries with the
    /// updated session and cookies.
    Redirect { location: String },
}

/// Summary of one cycle for logs and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub decision: SyncDecision,
    pub outcome: SyncOutcome,
    /// Masked broker token.
    pub token_hint: String,
    /// Whether the token was minted during this cycle.
    pub token_minted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_with_action_tag() {
        let json = serde_json::to_value(SyncOutcome::Redirect {
            location: "https://shop.example.com/cart".to_string(),
        })
        .unwrap();
        assert_eq!(json["action"], "redirect");
        assert_eq!(json["location"], "https://shop.example.com/cart");

        let json = serde_json::to_value(SyncOutcome::Continue).unwrap();
        assert_eq!(json["action"], "continue");
    }
}
