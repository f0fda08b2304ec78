//! Declarative configuration carried by the marked element of a page.

use std::collections::BTreeMap;

/// Attribute name -> value, as found on the marked element.
pub type ElementAttributes = BTreeMap<String, String>;

pub const SERVER_ATTRIBUTE: &str = "data-beacon-server";
pub const DOMAIN_ID_ATTRIBUTE: &str = "data-beacon-domain-id";
/// JSON encoded [`crate::TrackerOptions`].
pub const OPTIONS_ATTRIBUTE: &str = "data-beacon-opts";
