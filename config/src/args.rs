use clap::Parser;

/// Register a page visit with a collector and keep it alive until interrupted.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version = version(), about, long_about = None)]
pub struct Args {
    /// Base URL of the collector, overrides `data-beacon-server`.
    #[clap(long, value_name = "URL", env = "VISIT_BEACON_SERVER")]
    pub server: Option<String>,

    /// Domain identifier known to the collector, overrides `data-beacon-domain-id`.
    #[clap(long, value_name = "ID", env = "VISIT_BEACON_DOMAIN_ID")]
    pub domain_id: Option<String>,

    /// JSON options blob, e.g. `{"detailed": true}`, overrides `data-beacon-opts`.
    #[clap(long, value_name = "JSON", env = "VISIT_BEACON_OPTS")]
    pub opts: Option<String>,

    /// Resume an existing record instead of creating a new one.
    #[clap(long, value_name = "ID")]
    pub record_id: Option<String>,

    /// URL of the visited page.
    #[clap(long, value_name = "URL")]
    pub location: Option<String>,

    /// Referrer of the visited page.
    #[clap(long, value_name = "URL")]
    pub referrer: Option<String>,

    /// User agent reported for the visit.
    #[clap(long, value_name = "AGENT")]
    pub user_agent: Option<String>,

    /// Stop the heartbeat after this many seconds instead of waiting for Ctrl-C.
    #[clap(long, value_name = "SECONDS")]
    pub run_seconds: Option<u64>,
}

mod config_ext {
    use super::*;
    use crate::element::{
        DOMAIN_ID_ATTRIBUTE,
        OPTIONS_ATTRIBUTE,
        SERVER_ATTRIBUTE,
    };
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(server) = &self.server {
                cache.insert(format!("element.{SERVER_ATTRIBUTE}"), server.clone().into());
            }
            if let Some(domain_id) = &self.domain_id {
                cache.insert(format!("element.{DOMAIN_ID_ATTRIBUTE}"), domain_id.clone().into());
            }
            if let Some(opts) = &self.opts {
                cache.insert(format!("element.{OPTIONS_ATTRIBUTE}"), opts.clone().into());
            }
            if let Some(record_id) = &self.record_id {
                cache.insert("record_id".to_string(), record_id.clone().into());
            }
            if let Some(location) = &self.location {
                cache.insert("environment.location".to_string(), location.clone().into());
            }
            if let Some(referrer) = &self.referrer {
                cache.insert("environment.referrer".to_string(), referrer.clone().into());
            }
            if let Some(user_agent) = &self.user_agent {
                cache.insert("environment.user_agent".to_string(), user_agent.clone().into());
            }
            if let Some(run_seconds) = self.run_seconds {
                cache.insert("run_seconds".to_string(), run_seconds.into());
            }
            Ok(cache)
        }
    }
}

pub fn version() -> String {
    let author = clap::crate_authors!();
    let config_dir_path = crate::get_config_dir().display().to_string();

    format!(
        "{}

Authors: {author}

Config directory: {config_dir_path}",
        clap::crate_version!()
    )
}
