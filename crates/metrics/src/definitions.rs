//! Metric name and label definitions.
//!
//! Every metric relaygate records is named here so the exported set is
//! documented in one place.

/// Membership gate
pub mod gate {
    /// Gate evaluations (label `result`: satisfied, unsatisfied)
    pub const CHECKS_TOTAL: &str = "relaygate_gate_checks_total";
    /// Individual membership lookups that failed and were treated as unsatisfied
    pub const LOOKUP_FAILURES_TOTAL: &str = "relaygate_gate_lookup_failures_total";
    /// Administrator-rights verifications (label `result`: granted, denied, failed)
    pub const ADMIN_CHECKS_TOTAL: &str = "relaygate_gate_admin_checks_total";
}

/// Approval workflow
pub mod approval {
    /// Access requests (label `outcome`: membership_required, requested, approved, rejected)
    pub const ACCESS_REQUESTS_TOTAL: &str = "relaygate_access_requests_total";
    /// Owner decisions (label `decision`: approve, reject)
    pub const DECISIONS_TOTAL: &str = "relaygate_decisions_total";
    /// Owner-only actions attempted by someone else
    pub const UNAUTHORIZED_TOTAL: &str = "relaygate_unauthorized_actions_total";
}

/// Modal input sessions and channel links
pub mod console {
    /// Menu actions selected (label `action`)
    pub const ACTIONS_SELECTED_TOTAL: &str = "relaygate_console_actions_selected_total";
    /// Session inputs consumed (labels `action`, `result`: ok, error)
    pub const INPUTS_TOTAL: &str = "relaygate_console_inputs_total";
    /// Channel links created or replaced
    pub const LINKS_REGISTERED_TOTAL: &str = "relaygate_links_registered_total";
}

/// Forward router
pub mod relay {
    /// Channel posts seen by the router (label `decision`: disabled, anonymous, unlinked, relayed)
    pub const POSTS_TOTAL: &str = "relaygate_relay_posts_total";
    /// Per-destination relay attempts
    pub const ATTEMPTS_TOTAL: &str = "relaygate_relay_attempts_total";
    /// Per-destination relay failures
    pub const FAILURES_TOTAL: &str = "relaygate_relay_failures_total";
    /// Time to relay one post to every destination
    pub const DURATION_SECONDS: &str = "relaygate_relay_duration_seconds";
}

/// State store
pub mod store {
    /// Successful state writes
    pub const WRITES_TOTAL: &str = "relaygate_store_writes_total";
    /// Failed state writes
    pub const WRITE_ERRORS_TOTAL: &str = "relaygate_store_write_errors_total";
}

/// Telegram transport
pub mod telegram {
    /// Updates received (label `kind`: message, callback_query, channel_post, other)
    pub const UPDATES_RECEIVED_TOTAL: &str = "relaygate_telegram_updates_received_total";
    /// Messages sent to users and the owner
    pub const MESSAGES_SENT_TOTAL: &str = "relaygate_telegram_messages_sent_total";
    /// Failed getUpdates calls
    pub const POLLING_ERRORS_TOTAL: &str = "relaygate_telegram_polling_errors_total";
    /// Time spent handling one update
    pub const HANDLER_DURATION_SECONDS: &str = "relaygate_telegram_handler_duration_seconds";
}

/// Common label keys
pub mod labels {
    pub const RESULT: &str = "result";
    pub const OUTCOME: &str = "outcome";
    pub const DECISION: &str = "decision";
    pub const ACTION: &str = "action";
    pub const KIND: &str = "kind";
}

/// Standard histogram buckets
pub mod buckets {
    /// Bot API round trips (in seconds)
    /// Covers 10ms to 60s
    pub const API_DURATION: &[f64] = &[
        0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
    ];
}
