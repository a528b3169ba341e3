//! Package manifest support.
//!
//! Package manifests (`package.json` and friends) carry a `repository` field
//! that is either a string or an object:
//!
//! ```json
//! { "repository": { "type": "git", "url": "git+https://github.com/npm/cli.git", "directory": "workspaces/arborist" } }
//! ```
//!
//! [`from_manifest`] resolves that field against a [`HostRegistry`] and falls
//! back to a plain `https` URL for hosts the registry does not know.

mod types;

pub use types::{ManifestError, ManifestRepository};

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::consts::GIT_PLUS_PREFIX;
use crate::parse::parse_url;
use crate::registry::HostRegistry;

/// Resolve the `repository` field of `manifest`.
///
/// Returns `Ok(None)` when the manifest has no repository.
///
/// # Example
///
/// ```
/// use repolink_lib::HostRegistry;
/// use repolink_lib::manifest::{ManifestRepository, from_manifest};
///
/// let manifest = serde_json::json!({ "repository": "https://example.com/code/tool.git" });
/// let repository = from_manifest(&HostRegistry::default(), &manifest).unwrap();
/// assert_eq!(repository, Some(ManifestRepository::Url("https://example.com/code/tool.git".to_string())));
/// ```
pub fn from_manifest(registry: &HostRegistry, manifest: &Value) -> Result<Option<ManifestRepository>, ManifestError> {
  let Some(repository) = manifest.as_object().and_then(|fields| fields.get("repository")) else {
    return Ok(None);
  };

  let (url, directory) = match repository {
    Value::Null => return Ok(None),
    Value::String(url) => (url.as_str(), None),
    Value::Object(fields) => {
      let url = fields
        .get("url")
        .and_then(Value::as_str)
        .ok_or_else(|| ManifestError::InvalidRepository("object has no string 'url'".to_string()))?;
      (url, fields.get("directory").and_then(Value::as_str))
    }
    other => {
      return Err(ManifestError::InvalidRepository(format!(
        "expected a string or an object, found {}",
        json_kind(other)
      )));
    }
  };

  let url = url.strip_prefix(GIT_PLUS_PREFIX).unwrap_or(url);
  if let Some(repo) = registry.resolve(url) {
    return Ok(Some(ManifestRepository::Hosted {
      repo,
      directory: directory.map(str::to_string),
    }));
  }

  match web_url(url) {
    Some(web) => {
      debug!(repository = url, url = %web, "repository is not on a known host");
      Ok(Some(ManifestRepository::Url(web)))
    }
    None => {
      debug!(repository = url, "repository has no web location");
      Ok(Some(ManifestRepository::Unresolvable))
    }
  }
}

/// `https://host[:port]/path[?query]` for any input with a host.
///
/// Credentials and the fragment are dropped.
fn web_url(input: &str) -> Option<String> {
  let parsed = parse_url(input)?;
  if parsed.host.is_empty() {
    return None;
  }
  let path = if parsed.path.is_empty() { "/" } else { parsed.path.as_str() };
  let mut url = Url::parse(&format!("https://{}{}", parsed.host_with_port(), path)).ok()?;
  url.set_query(parsed.query.as_deref());
  Some(url.into())
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
