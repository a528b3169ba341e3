//! Resolved repositories and their URL renderings.

use std::fmt;
use std::sync::Arc;

use crate::consts::GIT_PLUS_PREFIX;
use crate::host::{HostDefinition, Target};
use crate::scheme::Representation;
use crate::template::Fields;

/// Options that adjust a rendering.
///
/// Options layer: those given at resolve time override the record, and those
/// given per call override both. Unset fields fall through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
  /// Leave the committish out (tarball links always keep it).
  pub no_committish: Option<bool>,
  /// Strip a leading `git+` from the rendered URL.
  pub no_git_plus: Option<bool>,
  /// Render with this committish instead of the record's.
  pub committish: Option<String>,
}

impl RenderOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_no_committish(mut self, enabled: bool) -> Self {
    self.no_committish = Some(enabled);
    self
  }

  pub fn with_no_git_plus(mut self, enabled: bool) -> Self {
    self.no_git_plus = Some(enabled);
    self
  }

  pub fn with_committish(mut self, committish: &str) -> Self {
    self.committish = Some(committish.to_string());
    self
  }

  /// `overrides` layered on top of `self`.
  pub fn layer(&self, overrides: &RenderOptions) -> RenderOptions {
    RenderOptions {
      no_committish: overrides.no_committish.or(self.no_committish),
      no_git_plus: overrides.no_git_plus.or(self.no_git_plus),
      committish: overrides.committish.clone().or_else(|| self.committish.clone()),
    }
  }
}

/// A repository on a known host.
///
/// `user`, `project` and `committish` are stored decoded; `auth` is kept in
/// its percent-encoded form so it can be spliced back into a URL.
#[derive(Debug, Clone)]
pub struct HostedRepo {
  host: Arc<HostDefinition>,
  user: Option<String>,
  project: String,
  auth: Option<String>,
  committish: Option<String>,
  default: Representation,
  options: RenderOptions,
}

impl HostedRepo {
  pub fn new(host: Arc<HostDefinition>, user: Option<&str>, project: &str) -> Self {
    Self {
      host,
      user: user.map(str::to_string),
      project: project.to_string(),
      auth: None,
      committish: None,
      default: Representation::Shortcut,
      options: RenderOptions::default(),
    }
  }

  pub fn with_auth(mut self, auth: Option<&str>) -> Self {
    self.auth = auth.map(str::to_string);
    self
  }

  pub fn with_committish(mut self, committish: Option<&str>) -> Self {
    self.committish = committish.map(str::to_string);
    self
  }

  pub fn with_default(mut self, default: Representation) -> Self {
    self.default = default;
    self
  }

  /// Options applied to every rendering of this record.
  pub fn with_options(mut self, options: RenderOptions) -> Self {
    self.options = options;
    self
  }

  /// The host id, e.g. `github`.
  pub fn kind(&self) -> &str {
    self.host.id()
  }

  pub fn domain(&self) -> &str {
    self.host.domain()
  }

  pub fn user(&self) -> Option<&str> {
    self.user.as_deref()
  }

  pub fn project(&self) -> &str {
    &self.project
  }

  pub fn auth(&self) -> Option<&str> {
    self.auth.as_deref()
  }

  pub fn committish(&self) -> Option<&str> {
    self.committish.as_deref()
  }

  pub fn host(&self) -> &Arc<HostDefinition> {
    &self.host
  }

  pub fn options(&self) -> &RenderOptions {
    &self.options
  }

  /// The form the input was written in.
  pub fn default_representation(&self) -> Representation {
    self.default
  }

  /// `#committish`, or an empty string.
  pub fn hash(&self) -> String {
    match &self.committish {
      Some(committish) => format!("#{}", committish),
      None => String::new(),
    }
  }

  /// Render `target`, or `None` when the host has no template for it.
  pub fn render(&self, target: Target, options: &RenderOptions) -> Option<String> {
    self.render_path(target, "", None, options)
  }

  /// Render `target` for a file path and optional fragment.
  ///
  /// Leading slashes of `path` are ignored.
  pub fn render_path(
    &self,
    target: Target,
    path: &str,
    fragment: Option<&str>,
    options: &RenderOptions,
  ) -> Option<String> {
    let template = self.host.template(target)?;
    let options = self.options.layer(options);

    let mut committish = options.committish.as_deref().or(self.committish.as_deref());
    if options.no_committish.unwrap_or(false) && target != Target::Tarball {
      committish = None;
    }

    let fields = Fields {
      kind: self.host.id(),
      domain: self.host.domain(),
      auth: self.auth.as_deref(),
      user: self.user.as_deref(),
      project: &self.project,
      committish,
      path: path.trim_start_matches('/'),
      fragment,
      treepath: self.host.treepath(),
      blobpath: self.host.blobpath(),
      editpath: self.host.editpath(),
      hash_format: self.host.hash_format(),
    };
    let rendered = template.render(&fields);

    if options.no_git_plus.unwrap_or(false) {
      if let Some(stripped) = rendered.strip_prefix(GIT_PLUS_PREFIX) {
        return Some(stripped.to_string());
      }
    }
    Some(rendered)
  }

  pub fn ssh(&self) -> Option<String> {
    self.render(Target::Ssh, &RenderOptions::default())
  }

  pub fn sshurl(&self) -> Option<String> {
    self.render(Target::SshUrl, &RenderOptions::default())
  }

  pub fn https(&self) -> Option<String> {
    self.render(Target::Https, &RenderOptions::default())
  }

  pub fn git(&self) -> Option<String> {
    self.render(Target::Git, &RenderOptions::default())
  }

  pub fn shortcut(&self) -> Option<String> {
    self.render(Target::Shortcut, &RenderOptions::default())
  }

  pub fn path(&self) -> Option<String> {
    self.render(Target::Path, &RenderOptions::default())
  }

  pub fn browse(&self) -> Option<String> {
    self.render(Target::Browse, &RenderOptions::default())
  }

  /// Browse a path through the tree view, e.g. `browse_path("lib", None)`.
  pub fn browse_path(&self, path: &str, fragment: Option<&str>) -> Option<String> {
    self.render_path(Target::BrowseTree, path, fragment, &RenderOptions::default())
  }

  /// Browse a file through the blob view, e.g. `browse_file("README.md", Some("L10"))`.
  pub fn browse_file(&self, path: &str, fragment: Option<&str>) -> Option<String> {
    self.render_path(Target::BrowseBlob, path, fragment, &RenderOptions::default())
  }

  pub fn docs(&self) -> Option<String> {
    self.render(Target::Docs, &RenderOptions::default())
  }

  pub fn bugs(&self) -> Option<String> {
    self.render(Target::Bugs, &RenderOptions::default())
  }

  /// Raw content of `path`.
  pub fn file(&self, path: &str) -> Option<String> {
    self.render_path(Target::File, path, None, &RenderOptions::default())
  }

  pub fn tarball(&self) -> Option<String> {
    self.render(Target::Tarball, &RenderOptions::default())
  }

  pub fn edit(&self, path: &str) -> Option<String> {
    self.render_path(Target::Edit, path, None, &RenderOptions::default())
  }

  /// Render the form the input was written in.
  ///
  /// Insecure `http` and `git+http` forms, and forms the host cannot render,
  /// are upgraded to the `git+ssh` URL.
  pub fn render_default(&self, options: &RenderOptions) -> Option<String> {
    let preferred = match self.default {
      Representation::Shortcut => Target::Shortcut,
      Representation::Https => Target::Https,
      Representation::Git => Target::Git,
      Representation::SshUrl | Representation::Http | Representation::GitHttp => Target::SshUrl,
    };
    [preferred, Target::SshUrl, Target::Https, Target::Shortcut]
      .into_iter()
      .find_map(|target| self.render(target, options))
  }
}

impl PartialEq for HostedRepo {
  fn eq(&self, other: &Self) -> bool {
    self.host.id() == other.host.id()
      && self.user == other.user
      && self.project == other.project
      && self.auth == other.auth
      && self.committish == other.committish
      && self.default == other.default
      && self.options == other.options
  }
}

impl Eq for HostedRepo {}

impl fmt::Display for HostedRepo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.render_default(&RenderOptions::default()) {
      Some(rendered) => f.write_str(&rendered),
      None => Ok(()),
    }
  }
}
