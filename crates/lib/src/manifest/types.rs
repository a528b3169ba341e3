use thiserror::Error;

use crate::repo::HostedRepo;

/// Where a manifest's `repository` field points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestRepository {
  /// A repository on a registered host, optionally a sub-directory of it.
  Hosted {
    repo: HostedRepo,
    directory: Option<String>,
  },
  /// Some other web location, normalized to `https`.
  Url(String),
  /// A value that names no web location (`file:` URLs, bare fragments).
  Unresolvable,
}

impl ManifestRepository {
  /// The hosted repository, if any.
  pub fn repo(&self) -> Option<&HostedRepo> {
    match self {
      ManifestRepository::Hosted { repo, .. } => Some(repo),
      _ => None,
    }
  }

  /// A link a person can open: the repository page, its directory view, or
  /// the normalized URL.
  pub fn browse(&self) -> Option<String> {
    match self {
      ManifestRepository::Hosted {
        repo,
        directory: Some(directory),
      } if !directory.is_empty() => repo.browse_path(directory, None),
      ManifestRepository::Hosted { repo, .. } => repo.browse(),
      ManifestRepository::Url(url) => Some(url.clone()),
      ManifestRepository::Unresolvable => None,
    }
  }
}

/// Errors raised for malformed manifests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
  /// `repository` is neither a string nor an object with a string `url`.
  #[error("invalid repository field: {0}")]
  InvalidRepository(String),
}
