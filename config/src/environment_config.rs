use serde::{
    Deserialize,
    Serialize,
};
use url::Url;

/// Facts about the visiting environment, declared up front instead of read from a live page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Full URL of the visited page.
    pub location: String,
    pub referrer: Option<String>,
    /// Host name of the visited page. Derived from `location` when unset.
    pub hostname: Option<String>,
    pub user_agent: String,
    pub language: Option<String>,

    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
    pub screen_color_depth: Option<u32>,
    pub viewport_width: Option<u32>,
    pub viewport_height: Option<u32>,

    pub device_name: Option<String>,
    pub device_manufacturer: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub browser_name: Option<String>,
    pub browser_version: Option<String>,
}

impl EnvironmentConfig {
    /// The configured host name, or the host of `location`. Empty when neither is known.
    pub fn resolved_hostname(&self) -> String {
        if let Some(hostname) = &self.hostname {
            return hostname.clone();
        }

        Url::parse(&self.location)
            .ok()
            .and_then(|url| url.host_str().map(|host| host.trim_matches(['[', ']']).to_string()))
            .unwrap_or_default()
    }
}
