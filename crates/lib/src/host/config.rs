//! Declarative host configuration.
//!
//! Self-hosted forges are usually configured rather than compiled in. A
//! [`HostConfig`] carries the same information as the
//! [`HostDefinition`] builder in a serde-friendly shape:
//!
//! ```json
//! {
//!   "domain": "git.example.com:8443",
//!   "protocols": ["https", "git+ssh"],
//!   "pattern": "^/~([^/]+)/([^/]+?)(?:\\.git)?$",
//!   "templates": { "bugs": "https://{domain}/{user}/{project}/tickets" },
//!   "unsupported": ["edit"]
//! }
//! ```
//!
//! Fields that are left out keep the generic defaults of [`HostDefinition::new`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{HostDefinition, HostError, Target};
use crate::template::HashFormat;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
  /// Canonical domain, optionally with `:port`.
  pub domain: String,
  /// Accepted schemes; the generic set when absent.
  pub protocols: Option<Vec<String>>,
  /// Path regex, see [`super::PathMatcher::Regex`]; `/user/project` when absent.
  pub pattern: Option<String>,
  /// Template overrides keyed by render target.
  pub templates: BTreeMap<Target, String>,
  /// Targets this host cannot render.
  pub unsupported: Vec<Target>,
  /// Path segment names; an empty string removes the segment.
  pub treepath: Option<String>,
  pub blobpath: Option<String>,
  pub editpath: Option<String>,
  pub hash_format: HashFormat,
  pub bare_shorthand: bool,
  pub ownerless: bool,
}

impl HostConfig {
  pub fn new(domain: &str) -> Self {
    Self {
      domain: domain.to_string(),
      ..Default::default()
    }
  }

  /// Build the definition for host `id`.
  pub fn into_definition(self, id: &str) -> Result<HostDefinition, HostError> {
    let mut host = HostDefinition::new(id, &self.domain)
      .with_hash_format(self.hash_format)
      .with_bare_shorthand(self.bare_shorthand)
      .with_ownerless(self.ownerless);

    if let Some(protocols) = &self.protocols {
      host = host.with_protocols(protocols);
    }
    if let Some(pattern) = &self.pattern {
      host = host.with_pattern(pattern)?;
    }
    if let Some(treepath) = &self.treepath {
      host = host.with_treepath(non_empty(treepath));
    }
    if let Some(blobpath) = &self.blobpath {
      host = host.with_blobpath(non_empty(blobpath));
    }
    if let Some(editpath) = &self.editpath {
      host = host.with_editpath(non_empty(editpath));
    }
    for (target, source) in &self.templates {
      host = host.with_template(*target, source)?;
    }
    for target in &self.unsupported {
      host = host.without_template(*target);
    }

    host.validate()?;
    Ok(host)
  }
}

fn non_empty(value: &str) -> Option<&str> {
  Some(value).filter(|v| !v.is_empty())
}
