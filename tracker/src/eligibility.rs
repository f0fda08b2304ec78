//! Decides whether a visit is tracked at all.
//!
//! Everything here is a pure predicate, evaluated once per session before any request is sent.

use visit_beacon_config::TrackerOptions;

/// Record id handed out by the collector when it wants the visit ignored, e.g. because the request carried the
/// site owner's own cookie.
pub const SUPPRESSED_RECORD_ID: &str = "88888888-8888-8888-8888-888888888888";

const LOCAL_HOSTS: [&str; 4] = ["", "localhost", "127.0.0.1", "::1"];

const AUTOMATED_AGENT_MARKERS: [&str; 4] = ["bot", "crawler", "spider", "crawling"];

pub fn is_local_host(hostname: &str) -> bool {
    LOCAL_HOSTS.contains(&hostname)
}

/// Best-effort guess whether the user agent belongs to a bot or crawler.
///
/// This is a heuristic to keep obvious crawlers out of the numbers. It is trivially bypassed and must not be
/// relied on as a security control.
pub fn is_automated_agent(user_agent: &str) -> bool {
    let user_agent = user_agent.to_lowercase();
    AUTOMATED_AGENT_MARKERS
        .iter()
        .any(|marker| user_agent.contains(marker))
}

pub fn is_suppressed_identifier(id: &str) -> bool {
    id == SUPPRESSED_RECORD_ID
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Eligibility {
    #[display("eligible")]
    Eligible,
    #[display("running on a local host")]
    LocalHost,
    #[display("user agent looks automated")]
    AutomatedAgent,
}

impl Eligibility {
    pub fn check(options: &TrackerOptions, hostname: &str, user_agent: &str) -> Self {
        if options.ignore_localhost && is_local_host(hostname) {
            Self::LocalHost
        } else if is_automated_agent(user_agent) {
            Self::AutomatedAgent
        } else {
            Self::Eligible
        }
    }

    pub fn is_eligible(self) -> bool {
        self == Self::Eligible
    }
}
