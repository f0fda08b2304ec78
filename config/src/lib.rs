#[macro_use]
extern crate tracing;

mod app_config;
mod args;
pub mod element;
mod environment_config;
mod tracker_options;

use app_config::AppConfig;
pub use app_config::get_config_dir;
pub use args::Args;
pub use element::ElementAttributes;
pub use environment_config::EnvironmentConfig;
use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};
pub use tracker_options::TrackerOptions;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten, skip_serializing)]
    pub app_config: AppConfig,
    /// Attributes of the marked element. `None` means the element is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementAttributes>,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    /// Cookies (`name=value`) attached to every request to the collector.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cookies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_seconds: Option<u64>,
}

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

impl Default for Config {
    fn default() -> Self {
        serde_yml::from_str(DEFAULT_CONFIG).expect("Failed to parse default config")
    }
}

impl Config {
    pub fn new(args: Args) -> Result<Self, config::ConfigError> {
        Self::with_config_dir(get_config_dir(), args)
    }

    /// Layers, lowest precedence first: embedded defaults, `config.yaml` in `config_dir`,
    /// `VISIT_BEACON__*` environment variables, command line arguments.
    pub fn with_config_dir(config_dir: impl Into<PathBuf>, args: Args) -> Result<Self, config::ConfigError> {
        let config_dir = config_dir.into();
        let config_file = config_dir.join("config.yaml");
        debug!(?config_file, "loading configuration");

        let cfg: Self = config::Config::builder()
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml))
            .add_source(
                config::File::from(config_file)
                    .format(config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(app_config::PROJECT_NAME)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .add_source(args)
            .build()?
            .try_deserialize()?;

        Ok(cfg)
    }

    pub fn config_dir(&self) -> &Path {
        &self.app_config.config_dir
    }
}
