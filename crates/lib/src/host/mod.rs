//! Host definitions.
//!
//! A [`HostDefinition`] is the complete, data-only description of one hosting
//! service: where it lives, which URL schemes it accepts, how a URL path maps
//! to `user/project`, and which [`Template`] renders each URL form. The five
//! well-known services are defined in [`builtin`]; self-hosted instances can
//! be described in code with the `with_*` builder methods or declaratively
//! through [`config::HostConfig`].
//!
//! # Example
//!
//! ```
//! use repolink_lib::host::{HostDefinition, Target};
//!
//! let host = HostDefinition::new("forge", "git.example.com:8443")
//!   .with_protocols(["https", "git+ssh"])
//!   .with_template(Target::Bugs, "https://{domain}/{user}/{project}/tickets")
//!   .unwrap();
//! assert_eq!(host.shortcut_prefix(), "forge:");
//! assert!(host.accepts("https"));
//! ```

pub mod builtin;
pub mod config;

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::GIT_SUFFIX;
use crate::parse::ParsedUrl;
use crate::scheme;
pub use crate::template::HashFormat;
use crate::template::{Template, TemplateError};

/// A URL form a host can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
  Ssh,
  #[serde(rename = "sshurl")]
  SshUrl,
  Https,
  Git,
  Shortcut,
  Path,
  Browse,
  /// Browse a directory or file through the tree view.
  BrowseTree,
  /// Browse a single file through the blob view.
  BrowseBlob,
  Docs,
  Bugs,
  /// Raw file content.
  File,
  Tarball,
  Edit,
}

impl Target {
  pub const ALL: [Target; 14] = [
    Target::Ssh,
    Target::SshUrl,
    Target::Https,
    Target::Git,
    Target::Shortcut,
    Target::Path,
    Target::Browse,
    Target::BrowseTree,
    Target::BrowseBlob,
    Target::Docs,
    Target::Bugs,
    Target::File,
    Target::Tarball,
    Target::Edit,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Target::Ssh => "ssh",
      Target::SshUrl => "sshurl",
      Target::Https => "https",
      Target::Git => "git",
      Target::Shortcut => "shortcut",
      Target::Path => "path",
      Target::Browse => "browse",
      Target::BrowseTree => "browse_tree",
      Target::BrowseBlob => "browse_blob",
      Target::Docs => "docs",
      Target::Bugs => "bugs",
      Target::File => "file",
      Target::Tarball => "tarball",
      Target::Edit => "edit",
    }
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Errors raised while building or validating a host definition.
#[derive(Debug, Error)]
pub enum HostError {
  /// The id is not a lower-case scheme name, or it shadows a URL scheme, so
  /// `id:` cannot work as a shortcut prefix.
  #[error("invalid host id '{0}'")]
  InvalidId(String),

  /// The domain is empty.
  #[error("host '{0}' has an empty domain")]
  EmptyDomain(String),

  /// A protocol that is not in the scheme table.
  #[error("host '{host}' accepts unknown protocol '{protocol}'")]
  UnknownProtocol { host: String, protocol: String },

  /// A template string failed to parse.
  #[error("invalid {target} template: {source}")]
  InvalidTemplate {
    target: Target,
    #[source]
    source: TemplateError,
  },

  /// A path pattern is not a valid regular expression.
  #[error("invalid path pattern '{pattern}': {source}")]
  InvalidPattern {
    pattern: String,
    #[source]
    source: regex::Error,
  },

  /// A path pattern without a capture group for the project.
  #[error("path pattern '{0}' has no project capture group")]
  PatternWithoutProject(String),
}

/// The repository coordinates extracted from a URL, still percent-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
  pub user: Option<String>,
  pub project: String,
  pub committish: Option<String>,
}

impl Segments {
  /// Build segments from raw path parts, stripping a `.git` suffix.
  ///
  /// Returns `None` when the project is empty.
  pub fn new(user: Option<&str>, project: &str, committish: Option<&str>) -> Option<Self> {
    let project = project.strip_suffix(GIT_SUFFIX).unwrap_or(project);
    if project.is_empty() {
      return None;
    }
    Some(Segments {
      user: user.filter(|user| !user.is_empty()).map(str::to_string),
      project: project.to_string(),
      committish: committish.filter(|c| !c.is_empty()).map(str::to_string),
    })
  }
}

/// A host-specific function from a parsed URL to repository coordinates.
pub type ExtractFn = fn(&ParsedUrl) -> Option<Segments>;

/// How a host maps a URL path onto `user/project`.
#[derive(Debug, Clone)]
pub enum PathMatcher {
  /// Match the URL path against a regex.
  ///
  /// Named groups `user`, `project` and `committish` are used when present.
  /// Otherwise two groups capture user and project, and a single group
  /// captures an ownerless project. The committish defaults to the fragment.
  Regex { pattern: Regex },
  /// Delegate to a function.
  Extract(ExtractFn),
}

impl PathMatcher {
  pub fn regex(pattern: &str) -> Result<Self, HostError> {
    let compiled = Regex::new(pattern).map_err(|source| HostError::InvalidPattern {
      pattern: pattern.to_string(),
      source,
    })?;
    let has_project = compiled.capture_names().flatten().any(|name| name == "project");
    if !has_project && compiled.captures_len() < 2 {
      return Err(HostError::PatternWithoutProject(pattern.to_string()));
    }
    Ok(PathMatcher::Regex { pattern: compiled })
  }

  pub fn extract(&self, url: &ParsedUrl) -> Option<Segments> {
    match self {
      PathMatcher::Regex { pattern } => {
        let caps = pattern.captures(&url.path)?;
        let named = |name: &str| caps.name(name).map(|m| m.as_str());

        let (user, project) = if pattern.capture_names().flatten().any(|name| name == "project") {
          (named("user"), named("project")?)
        } else if pattern.captures_len() == 2 {
          (None, caps.get(1)?.as_str())
        } else {
          (caps.get(1).map(|m| m.as_str()), caps.get(2)?.as_str())
        };
        let committish = named("committish").or(url.fragment.as_deref());
        Segments::new(user, project, committish)
      }
      PathMatcher::Extract(extract) => extract(url),
    }
  }
}

impl Default for PathMatcher {
  fn default() -> Self {
    PathMatcher::Extract(owner_project)
  }
}

/// `/user/project[.git]`; anything after the project is ignored.
pub fn owner_project(url: &ParsedUrl) -> Option<Segments> {
  let parts = split_path(&url.path, 3);
  let user = part(&parts, 1)?;
  let project = part(&parts, 2)?;
  Segments::new(Some(user), project, url.fragment.as_deref())
}

/// Split a path on `/`, keeping at most `limit` pieces (the leading empty one included).
pub(crate) fn split_path(path: &str, limit: usize) -> Vec<&str> {
  path.split('/').take(limit).collect()
}

/// A non-empty piece of a split path.
pub(crate) fn part<'a>(parts: &[&'a str], index: usize) -> Option<&'a str> {
  parts.get(index).copied().filter(|part| !part.is_empty())
}

const DEFAULT_PROTOCOLS: [&str; 4] = ["git+ssh", "git+https", "ssh", "https"];

const DEFAULT_TEMPLATES: [(Target, &str); 12] = [
  (Target::Ssh, "git@{domain}:{user}/{project}.git{#committish}"),
  (Target::SshUrl, "git+ssh://git@{domain}/{user}/{project}.git{#committish}"),
  (Target::Https, "git+https://[{auth}@]{domain}/{user}/{project}.git{#committish}"),
  (Target::Shortcut, "{type}:{user}/{project}{#committish}"),
  (Target::Path, "{user}/{project}{#committish}"),
  (Target::Browse, "https://{domain}/{user}/{project}[/{treepath}/{committish}]"),
  (
    Target::BrowseTree,
    "https://{domain}/{user}/{project}/{treepath}/{committish=master}/{path}[#{fragment}]",
  ),
  (
    Target::BrowseBlob,
    "https://{domain}/{user}/{project}/{blobpath}/{committish=master}/{path}[#{fragment}]",
  ),
  (Target::Docs, "https://{domain}/{user}/{project}[/{treepath}/{committish}]#readme"),
  (Target::Bugs, "https://{domain}/{user}/{project}/issues"),
  (Target::File, "https://{domain}/{user}/{project}/raw/{committish=master}/{path}"),
  (
    Target::Edit,
    "https://{domain}/{user}/{project}[/{editpath}/{committish=master}/{path}]",
  ),
];

fn default_templates() -> BTreeMap<Target, Template> {
  DEFAULT_TEMPLATES
    .iter()
    .map(|(target, source)| (*target, Template::parse(source).expect("default templates are valid")))
    .collect()
}

/// Everything the resolver and renderer need to know about one hosting service.
#[derive(Debug, Clone)]
pub struct HostDefinition {
  id: String,
  domain: String,
  protocols: Vec<String>,
  matcher: PathMatcher,
  templates: BTreeMap<Target, Template>,
  treepath: Option<String>,
  blobpath: Option<String>,
  editpath: Option<String>,
  hash_format: HashFormat,
  bare_shorthand: bool,
  ownerless: bool,
}

impl HostDefinition {
  /// Create a host with the generic defaults.
  ///
  /// The defaults accept `git+ssh`, `git+https`, `ssh` and `https`, match
  /// `/user/project`, use `tree`/`blob`/`edit` path segments and render every
  /// form except `git` and `tarball`.
  pub fn new(id: &str, domain: &str) -> Self {
    Self {
      id: id.to_string(),
      domain: domain.to_ascii_lowercase(),
      protocols: DEFAULT_PROTOCOLS.iter().map(|p| p.to_string()).collect(),
      matcher: PathMatcher::default(),
      templates: default_templates(),
      treepath: Some("tree".to_string()),
      blobpath: Some("blob".to_string()),
      editpath: Some("edit".to_string()),
      hash_format: HashFormat::default(),
      bare_shorthand: false,
      ownerless: false,
    }
  }

  /// Replace the accepted protocols. A trailing `:` is ignored.
  pub fn with_protocols<I, S>(mut self, protocols: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.protocols = protocols
      .into_iter()
      .map(|p| p.as_ref().trim_end_matches(':').to_ascii_lowercase())
      .collect();
    self
  }

  pub fn with_matcher(mut self, matcher: PathMatcher) -> Self {
    self.matcher = matcher;
    self
  }

  /// Match paths with a regex, see [`PathMatcher::Regex`].
  pub fn with_pattern(self, pattern: &str) -> Result<Self, HostError> {
    Ok(self.with_matcher(PathMatcher::regex(pattern)?))
  }

  /// Set the template for `target`, replacing any default.
  pub fn with_template(mut self, target: Target, source: &str) -> Result<Self, HostError> {
    let template = Template::parse(source).map_err(|source| HostError::InvalidTemplate { target, source })?;
    self.templates.insert(target, template);
    Ok(self)
  }

  /// Mark `target` as unsupported.
  pub fn without_template(mut self, target: Target) -> Self {
    self.templates.remove(&target);
    self
  }

  pub fn with_treepath(mut self, treepath: Option<&str>) -> Self {
    self.treepath = treepath.map(str::to_string);
    self
  }

  pub fn with_blobpath(mut self, blobpath: Option<&str>) -> Self {
    self.blobpath = blobpath.map(str::to_string);
    self
  }

  pub fn with_editpath(mut self, editpath: Option<&str>) -> Self {
    self.editpath = editpath.map(str::to_string);
    self
  }

  pub fn with_hash_format(mut self, hash_format: HashFormat) -> Self {
    self.hash_format = hash_format;
    self
  }

  /// Let `user/project` without any prefix resolve to this host.
  pub fn with_bare_shorthand(mut self, enabled: bool) -> Self {
    self.bare_shorthand = enabled;
    self
  }

  /// Allow shortcuts without a user (`gist:feedbeef`).
  pub fn with_ownerless(mut self, enabled: bool) -> Self {
    self.ownerless = enabled;
    self
  }

  /// Check the invariants the registry relies on.
  pub fn validate(&self) -> Result<(), HostError> {
    if !is_scheme_name(&self.id) || scheme::lookup(&self.id).is_some() {
      return Err(HostError::InvalidId(self.id.clone()));
    }
    if self.domain.is_empty() {
      return Err(HostError::EmptyDomain(self.id.clone()));
    }
    if let Some(protocol) = self.protocols.iter().find(|p| scheme::lookup(p).is_none()) {
      return Err(HostError::UnknownProtocol {
        host: self.id.clone(),
        protocol: protocol.clone(),
      });
    }
    Ok(())
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  /// Canonical domain, lower-cased, with a port when one was given.
  pub fn domain(&self) -> &str {
    &self.domain
  }

  pub fn protocols(&self) -> &[String] {
    &self.protocols
  }

  /// Whether URLs with `scheme` (no trailing `:`) may resolve to this host.
  pub fn accepts(&self, scheme: &str) -> bool {
    self.protocols.iter().any(|p| p == scheme)
  }

  /// `id:`, the prefix of this host's shortcuts.
  pub fn shortcut_prefix(&self) -> String {
    format!("{}:", self.id)
  }

  pub fn matcher(&self) -> &PathMatcher {
    &self.matcher
  }

  pub fn template(&self, target: Target) -> Option<&Template> {
    self.templates.get(&target)
  }

  pub fn treepath(&self) -> Option<&str> {
    self.treepath.as_deref()
  }

  pub fn blobpath(&self) -> Option<&str> {
    self.blobpath.as_deref()
  }

  pub fn editpath(&self) -> Option<&str> {
    self.editpath.as_deref()
  }

  pub fn hash_format(&self) -> HashFormat {
    self.hash_format
  }

  pub fn bare_shorthand(&self) -> bool {
    self.bare_shorthand
  }

  pub fn ownerless(&self) -> bool {
    self.ownerless
  }
}

/// `[a-z][a-z0-9+.-]*`, the URL scheme grammar in the case parsers report it.
fn is_scheme_name(id: &str) -> bool {
  let mut chars = id.chars();
  chars.next().is_some_and(|c| c.is_ascii_lowercase())
    && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '.' | '-'))
}
