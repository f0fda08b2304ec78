use serde::{
    Deserialize,
    Serialize,
};

/// Options controlling what the tracker collects and when it stays silent.
///
/// Unset fields fall back to their defaults, so `{}` is a valid options blob.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerOptions {
    /// Collect the detailed attribute tier (locale, screen, platform, viewport).
    pub detailed: bool,
    /// Skip tracking entirely when running on a local host.
    #[serde(alias = "ignore_localhost")]
    pub ignore_localhost: bool,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            detailed: false,
            ignore_localhost: true,
        }
    }
}

impl TrackerOptions {
    /// Parse a JSON options blob. An empty string yields the defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_apply_to_unset_fields() {
        assert_eq!(TrackerOptions::from_json("{}").unwrap(), TrackerOptions::default());
        assert_eq!(TrackerOptions::from_json("").unwrap(), TrackerOptions::default());

        let options = TrackerOptions::from_json(r#"{ "detailed": true }"#).unwrap();
        assert!(options.detailed);
        assert!(options.ignore_localhost);
    }

    #[test]
    fn accepts_camel_and_snake_case() {
        let camel = TrackerOptions::from_json(r#"{ "ignoreLocalhost": false }"#).unwrap();
        let snake = TrackerOptions::from_json(r#"{ "ignore_localhost": false }"#).unwrap();
        assert!(!camel.ignore_localhost);
        assert_eq!(camel, snake);
    }

    #[test]
    fn rejects_malformed_blob() {
        assert!(TrackerOptions::from_json("{ detailed: yes").is_err());
        assert!(TrackerOptions::from_json(r#"{ "detailed": "yes" }"#).is_err());
    }
}
