use visit_beacon_config::EnvironmentConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Screen {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub color_depth: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Device, operating system and browser identity of the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Platform {
    pub device_name: Option<String>,
    pub device_manufacturer: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub browser_name: Option<String>,
    pub browser_version: Option<String>,
}

/// Source of the facts describing the current visit.
///
/// The tracker never reads global state itself, everything it knows about the page and the visitor comes
/// through this trait.
pub trait Environment: Send + Sync {
    /// Full URL of the visited page.
    fn location(&self) -> String;
    fn referrer(&self) -> Option<String>;
    fn hostname(&self) -> String;
    fn user_agent(&self) -> String;
    /// Locale of the visitor, e.g. `en-US`.
    fn language(&self) -> Option<String>;
    fn screen(&self) -> Screen;
    fn viewport(&self) -> Viewport;
    fn platform(&self) -> Platform;
}

impl Environment for EnvironmentConfig {
    fn location(&self) -> String {
        self.location.clone()
    }

    fn referrer(&self) -> Option<String> {
        self.referrer.clone().filter(|referrer| !referrer.is_empty())
    }

    fn hostname(&self) -> String {
        self.resolved_hostname()
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn language(&self) -> Option<String> {
        self.language.clone()
    }

    fn screen(&self) -> Screen {
        Screen {
            width: self.screen_width,
            height: self.screen_height,
            color_depth: self.screen_color_depth,
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
        }
    }

    fn platform(&self) -> Platform {
        Platform {
            device_name: self.device_name.clone(),
            device_manufacturer: self.device_manufacturer.clone(),
            os_name: self.os_name.clone(),
            os_version: self.os_version.clone(),
            browser_name: self.browser_name.clone(),
            browser_version: self.browser_version.clone(),
        }
    }
}
