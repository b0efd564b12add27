//! Route path constants shared by the router and the API tests

/// API base path
pub const API_V1: &str = "/api/v1";

pub mod health {
    pub const HEALTH: &str = "/health";
    pub const METRICS: &str = "/metrics";
}

/// Paths relative to [`super::API_V1`]
pub mod assistant {
    pub const CHAT: &str = "/assistant/chat";
    pub const TRANSCRIPT: &str = "/messages/:id/transcript";
    pub const TRANSLATE: &str = "/translate";
    pub const TRIAGE_ASSESS: &str = "/triage/assess";
}
