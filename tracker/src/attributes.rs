use crate::environment::Environment;
use serde::Serialize;

/// Facts about one visit, sent once when the record is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    site_location: String,
    site_referrer: Option<String>,
    #[serde(flatten)]
    detailed: Option<DetailedAttributes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAttributes {
    site_language: Option<String>,
    screen_width: Option<u32>,
    screen_height: Option<u32>,
    screen_color_depth: Option<u32>,
    device_name: Option<String>,
    device_manufacturer: Option<String>,
    os_name: Option<String>,
    os_version: Option<String>,
    browser_name: Option<String>,
    browser_version: Option<String>,
    browser_width: Option<u32>,
    browser_height: Option<u32>,
}

impl Attributes {
    /// Minimal attributes only (page and referrer).
    pub fn minimal(env: &dyn Environment) -> Self {
        Self {
            site_location: env.location(),
            site_referrer: env.referrer(),
            detailed: None,
        }
    }

    /// Minimal attributes plus locale, screen, platform and viewport.
    pub fn detailed(env: &dyn Environment) -> Self {
        let screen = env.screen();
        let viewport = env.viewport();
        let platform = env.platform();

        Self {
            detailed: Some(DetailedAttributes {
                site_language: env.language(),
                screen_width: screen.width,
                screen_height: screen.height,
                screen_color_depth: screen.color_depth,
                device_name: platform.device_name,
                device_manufacturer: platform.device_manufacturer,
                os_name: platform.os_name,
                os_version: platform.os_version,
                browser_name: platform.browser_name,
                browser_version: platform.browser_version,
                browser_width: viewport.width,
                browser_height: viewport.height,
            }),
            ..Self::minimal(env)
        }
    }

    pub fn collect(env: &dyn Environment, detailed: bool) -> Self {
        if detailed {
            Self::detailed(env)
        } else {
            Self::minimal(env)
        }
    }

    pub fn is_detailed(&self) -> bool {
        self.detailed.is_some()
    }
}

/// Key/value pair attached to an event action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionAttributes {
    pub key: String,
    pub value: Option<f64>,
}

impl ActionAttributes {
    pub fn new(key: impl ToString, value: impl Into<Option<f64>>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}
