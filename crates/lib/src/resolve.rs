//! Resolution of repository identifiers.
//!
//! [`resolve`] turns any of the common ways of naming a hosted repository
//! into a [`HostedRepo`]:
//!
//! | Form | Example |
//! |------|---------|
//! | Bare shorthand | `npm/cli#v7` |
//! | Shortcut | `gitlab:group/sub/project`, `gist:feedbeef` |
//! | SSH connect string | `git@github.com:npm/cli.git` |
//! | URL | `git+https://user@bitbucket.org/foo/bar.git#main` |
//!
//! Anything that does not name exactly one registered host resolves to
//! `None`; there is no error case.
//!
//! # Example
//!
//! ```
//! use repolink_lib::{HostRegistry, resolve};
//!
//! let registry = HostRegistry::default();
//! let repo = resolve(&registry, "git@github.com:npm/cli.git#v7").unwrap();
//! assert_eq!(repo.kind(), "github");
//! assert_eq!(repo.user(), Some("npm"));
//! assert_eq!(repo.committish(), Some("v7"));
//! assert_eq!(repo.https().unwrap(), "git+https://github.com/npm/cli.git#v7");
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::consts::GIT_SUFFIX;
use crate::encoding;
use crate::host::HostDefinition;
use crate::parse::{ParsedUrl, parse_url_with_protocols};
use crate::registry::{HostRegistry, normalize_domain};
use crate::repo::{HostedRepo, RenderOptions};
use crate::scheme::{self, Representation};

/// Resolve `input` against the hosts in `registry`.
pub fn resolve(registry: &HostRegistry, input: &str) -> Option<HostedRepo> {
  resolve_with(registry, input, RenderOptions::default())
}

/// Resolve `input` and attach `options` to the result for later renderings.
pub fn resolve_with(registry: &HostRegistry, input: &str, options: RenderOptions) -> Option<HostedRepo> {
  if input.is_empty() {
    return None;
  }

  let input = expand_shorthand(registry, input);
  let Some(parsed) = parse_url_with_protocols(&input, |name| registry.is_known_protocol(name)) else {
    trace!(input = %input, "unparseable input");
    return None;
  };

  let mut matches: Vec<HostedRepo> = registry.hosts().filter_map(|host| match_host(host, &parsed)).collect();
  match matches.len() {
    0 => {
      trace!(input = %input, "no host matched");
      None
    }
    1 => matches.pop().map(|repo| repo.with_options(options)),
    count => {
      let hosts: Vec<&str> = matches.iter().map(HostedRepo::kind).collect();
      warn!(input = %input, count, ?hosts, "input matches several hosts");
      None
    }
  }
}

/// Prefix bare `user/project` input with the shortcut of the host that claims it.
fn expand_shorthand<'a>(registry: &HostRegistry, input: &'a str) -> Cow<'a, str> {
  match registry.bare_shorthand_host() {
    Some(host) if is_bare_shorthand(input) => Cow::Owned(format!("{}{}", host.shortcut_prefix(), input)),
    _ => Cow::Borrowed(input),
  }
}

/// `user/project[#committish]` with nothing that could make it a URL or a path.
///
/// Before the first `#` there must be exactly one `/` (not the first
/// character and not the last), and no whitespace, `@`, `:` or `%`. Inputs
/// starting with `.` are relative paths; a leading `-` reads as an option.
pub fn is_bare_shorthand(input: &str) -> bool {
  let head = input.split_once('#').map_or(input, |(head, _)| head);

  let single_slash = head.find('/').is_some_and(|slash| slash > 0) && head.matches('/').count() == 1;
  let clean = !head.contains(|c: char| c.is_whitespace() || matches!(c, '@' | ':' | '%'));

  single_slash && clean && !head.ends_with('/') && !head.starts_with(['.', '-'])
}

fn match_host(host: &Arc<HostDefinition>, parsed: &ParsedUrl) -> Option<HostedRepo> {
  if parsed.scheme == host.id() {
    return match_shortcut(host, parsed);
  }

  let name = normalize_domain(&parsed.host);
  let domain = normalize_domain(host.domain());
  let with_port = match &parsed.port {
    Some(port) => format!("{}:{}", name, port),
    None => name.clone(),
  };
  if with_port != domain && name != domain {
    return None;
  }
  if !host.accepts(&parsed.scheme) {
    trace!(host = host.id(), scheme = %parsed.scheme, "scheme not accepted");
    return None;
  }

  let Some(segments) = host.matcher().extract(parsed) else {
    trace!(host = host.id(), path = %parsed.path, "path not recognized");
    return None;
  };
  let user = decode_optional(segments.user.as_deref())?;
  let project = decode(&segments.project)?;
  let committish = decode_optional(segments.committish.as_deref())?;

  let info = scheme::lookup(&parsed.scheme)?;
  let auth = if info.respects_auth {
    credentials(parsed)
  } else {
    None
  };

  build(host, user, project, committish, info.representation).map(|repo| repo.with_auth(auth.as_deref()))
}

/// `id:[auth@][user/]project[.git][#committish]`. Credentials are never kept.
fn match_shortcut(host: &Arc<HostDefinition>, parsed: &ParsedUrl) -> Option<HostedRepo> {
  let mut path = parsed.path.as_str();
  path = path.strip_prefix('/').unwrap_or(path);
  if let Some((_auth, rest)) = path.split_once('@') {
    path = rest;
  }

  let (user, project) = match path.rsplit_once('/') {
    Some((user, project)) => (Some(decode(user)?), project),
    None => (None, path),
  };
  let project = decode(project)?;
  let project = project.strip_suffix(GIT_SUFFIX).unwrap_or(&project).to_string();
  let committish = decode_optional(parsed.fragment.as_deref())?;

  build(host, user, project, committish, Representation::Shortcut)
}

fn build(
  host: &Arc<HostDefinition>,
  user: Option<String>,
  project: String,
  committish: Option<String>,
  default: Representation,
) -> Option<HostedRepo> {
  let user = user.filter(|user| !user.is_empty());
  if project.is_empty() {
    trace!(host = host.id(), "empty project");
    return None;
  }
  if user.is_none() && !host.ownerless() {
    trace!(host = host.id(), "missing user");
    return None;
  }

  let committish = committish.filter(|c| !c.is_empty());
  Some(
    HostedRepo::new(Arc::clone(host), user.as_deref(), &project)
      .with_committish(committish.as_deref())
      .with_default(default),
  )
}

/// `username[:password]`, still encoded, when either part is present.
fn credentials(parsed: &ParsedUrl) -> Option<String> {
  let password = parsed.password.as_deref().filter(|p| !p.is_empty());
  if parsed.username.is_empty() && password.is_none() {
    return None;
  }
  Some(match password {
    Some(password) => format!("{}:{}", parsed.username, password),
    None => parsed.username.clone(),
  })
}

/// `Some(None)` for an absent value, `None` for a malformed one.
fn decode_optional(value: Option<&str>) -> Option<Option<String>> {
  match value {
    Some(value) => decode(value).map(Some),
    None => Some(None),
  }
}

fn decode(value: &str) -> Option<String> {
  let decoded = encoding::decode(value);
  if decoded.is_none() {
    trace!(value, "malformed percent-encoding");
  }
  decoded
}
