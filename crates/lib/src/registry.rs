//! The table of known hosts.
//!
//! A [`HostRegistry`] owns the host definitions the resolver consults. There
//! is no process-wide table: callers create one (usually with
//! [`HostRegistry::default`], which holds the built-in hosts), extend it, and
//! pass it to [`crate::resolve`]. Mutation needs `&mut self`; callers that
//! share a registry across threads wrap it in a lock.
//!
//! Definitions are stored behind [`Arc`] so every resolved repository can
//! keep a handle on its host after the registry changes.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::consts::WWW_PREFIX;
use crate::host::config::HostConfig;
use crate::host::{HostDefinition, HostError, builtin};
use crate::repo::{HostedRepo, RenderOptions};
use crate::scheme::SCHEMES;

/// Errors raised while registering hosts.
#[derive(Debug, Error)]
pub enum RegistryError {
  /// Another host already matches this domain, or the same host with or
  /// without a port.
  #[error("domain '{domain}' is already claimed by host '{owner}'")]
  DuplicateDomain { domain: String, owner: String },

  /// Another host already resolves bare `user/project` input.
  #[error("bare shorthand is already claimed by host '{0}'")]
  DuplicateShorthand(String),

  /// The definition itself is invalid.
  #[error(transparent)]
  Host(#[from] HostError),

  /// The JSON host table could not be read.
  #[error("invalid host configuration: {0}")]
  Config(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct HostRegistry {
  hosts: BTreeMap<String, Arc<HostDefinition>>,
  /// Normalized domain to host id.
  domains: HashMap<String, String>,
}

impl Default for HostRegistry {
  /// A registry holding the built-in hosts.
  fn default() -> Self {
    let mut registry = Self::empty();
    for host in builtin::all() {
      registry.register(host).expect("built-in hosts do not conflict");
    }
    registry
  }
}

impl HostRegistry {
  /// A registry without any hosts.
  pub fn empty() -> Self {
    Self {
      hosts: BTreeMap::new(),
      domains: HashMap::new(),
    }
  }

  /// Built-in hosts plus the hosts in a JSON object keyed by host id.
  ///
  /// Entries with a built-in id replace that host.
  ///
  /// ```
  /// use repolink_lib::HostRegistry;
  ///
  /// let registry = HostRegistry::from_json(r#"{ "forge": { "domain": "git.example.com" } }"#).unwrap();
  /// assert!(registry.get("forge").is_some());
  /// assert!(registry.get("github").is_some());
  /// ```
  pub fn from_json(json: &str) -> Result<Self, RegistryError> {
    let configs: BTreeMap<String, HostConfig> = serde_json::from_str(json)?;
    let mut registry = Self::default();
    for (id, config) in configs {
      registry.register_config(&id, config)?;
    }
    Ok(registry)
  }

  /// Add a host, replacing any host with the same id.
  pub fn register(&mut self, host: HostDefinition) -> Result<(), RegistryError> {
    host.validate()?;

    let domain = normalize_domain(host.domain());
    if let Some(owner) = self.domain_owner(&domain, host.id()) {
      return Err(RegistryError::DuplicateDomain {
        domain,
        owner: owner.to_string(),
      });
    }
    if host.bare_shorthand() {
      if let Some(owner) = self.bare_shorthand_host().filter(|owner| owner.id() != host.id()) {
        return Err(RegistryError::DuplicateShorthand(owner.id().to_string()));
      }
    }

    self.unregister(host.id());
    debug!(host = host.id(), domain = %domain, "registered host");
    self.domains.insert(domain, host.id().to_string());
    self.hosts.insert(host.id().to_string(), Arc::new(host));
    Ok(())
  }

  /// Another host whose domain matches inputs that `domain` would match.
  fn domain_owner(&self, domain: &str, id: &str) -> Option<&str> {
    self
      .domains
      .iter()
      .find(|(claimed, owner)| owner.as_str() != id && domains_overlap(claimed, domain))
      .map(|(_, owner)| owner.as_str())
  }

  pub fn register_config(&mut self, id: &str, config: HostConfig) -> Result<(), RegistryError> {
    let host = config.into_definition(id)?;
    self.register(host)
  }

  /// Remove a host, returning its definition.
  pub fn unregister(&mut self, id: &str) -> Option<Arc<HostDefinition>> {
    let host = self.hosts.remove(id)?;
    self.domains.remove(&normalize_domain(host.domain()));
    debug!(host = id, "unregistered host");
    Some(host)
  }

  pub fn get(&self, id: &str) -> Option<&Arc<HostDefinition>> {
    self.hosts.get(id)
  }

  /// Find a host by domain.
  ///
  /// Matching ignores case and a `www.` prefix, and tries `host:port` before
  /// the bare host.
  pub fn by_domain(&self, domain: &str) -> Option<&Arc<HostDefinition>> {
    let normalized = normalize_domain(domain);
    self
      .domains
      .get(&normalized)
      .or_else(|| {
        let (host, _port) = normalized.rsplit_once(':')?;
        self.domains.get(host)
      })
      .and_then(|id| self.hosts.get(id))
  }

  /// Find a host by its shortcut prefix, with or without the trailing `:`.
  pub fn by_shortcut(&self, prefix: &str) -> Option<&Arc<HostDefinition>> {
    self.hosts.get(prefix.strip_suffix(':').unwrap_or(prefix))
  }

  /// The host that resolves bare `user/project` input, if any.
  pub fn bare_shorthand_host(&self) -> Option<&Arc<HostDefinition>> {
    self.hosts.values().find(|host| host.bare_shorthand())
  }

  /// All hosts, ordered by id.
  pub fn hosts(&self) -> impl Iterator<Item = &Arc<HostDefinition>> {
    self.hosts.values()
  }

  pub fn len(&self) -> usize {
    self.hosts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.hosts.is_empty()
  }

  /// Every scheme and shortcut prefix the parser should leave alone, with trailing `:`.
  pub fn known_protocols(&self) -> Vec<String> {
    SCHEMES
      .iter()
      .map(|scheme| format!("{}:", scheme.name))
      .chain(self.hosts.values().map(|host| host.shortcut_prefix()))
      .collect()
  }

  /// Whether `name` (without `:`) is a scheme or shortcut prefix.
  pub fn is_known_protocol(&self, name: &str) -> bool {
    SCHEMES.iter().any(|scheme| scheme.name == name) || self.hosts.contains_key(name)
  }

  /// Shorthand for [`crate::resolve::resolve`].
  pub fn resolve(&self, input: &str) -> Option<HostedRepo> {
    crate::resolve::resolve(self, input)
  }

  /// Shorthand for [`crate::resolve::resolve_with`].
  pub fn resolve_with(&self, input: &str, options: RenderOptions) -> Option<HostedRepo> {
    crate::resolve::resolve_with(self, input, options)
  }
}

/// Equal, or equal once the port of one of them is dropped.
fn domains_overlap(a: &str, b: &str) -> bool {
  a == b || without_port(a) == b || a == without_port(b)
}

fn without_port(domain: &str) -> &str {
  match domain.rsplit_once(':') {
    Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => host,
    _ => domain,
  }
}

/// Lower-case a domain and drop a leading `www.`.
pub(crate) fn normalize_domain(domain: &str) -> String {
  let lower = domain.to_ascii_lowercase();
  match lower.strip_prefix(WWW_PREFIX) {
    Some(rest) => rest.to_string(),
    None => lower,
  }
}
