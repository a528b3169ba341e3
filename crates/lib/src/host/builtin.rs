//! The built-in hosts: github, bitbucket, gitlab, gist and sourcehut.
//!
//! Older hosts fall back to `master` when a link needs a ref and none was
//! given; sourcehut falls back to `HEAD`.

use super::{HostDefinition, PathMatcher, Segments, Target, part, split_path};
use crate::parse::ParsedUrl;
use crate::template::HashFormat;

/// All built-in hosts, in registration order.
pub fn all() -> Vec<HostDefinition> {
  vec![github(), bitbucket(), gitlab(), gist(), sourcehut()]
}

fn with_templates(mut host: HostDefinition, templates: &[(Target, &str)]) -> HostDefinition {
  for (target, source) in templates {
    host = host
      .with_template(*target, source)
      .expect("built-in templates are valid");
  }
  host
}

pub fn github() -> HostDefinition {
  let host = HostDefinition::new("github", "github.com")
    .with_protocols(["git", "http", "git+ssh", "git+https", "ssh", "https"])
    .with_matcher(PathMatcher::Extract(github_extract))
    .with_bare_shorthand(true);

  with_templates(
    host,
    &[
      (
        Target::File,
        "https://[{auth}@]raw.githubusercontent.com/{user}/{project}/{committish=master}/{path}",
      ),
      (Target::Git, "git://[{auth}@]{domain}/{user}/{project}.git{#committish}"),
      (
        Target::Tarball,
        "https://codeload.{domain}/{user}/{project}/tar.gz/{committish=master}",
      ),
    ],
  )
}

/// `/user/project[.git]`, or `/user/project/tree/<ref>`; other views are rejected.
fn github_extract(url: &ParsedUrl) -> Option<Segments> {
  let parts = split_path(&url.path, 5);
  let view = part(&parts, 3);
  if view.is_some_and(|view| view != "tree") {
    return None;
  }
  let committish = match view {
    Some(_) => part(&parts, 4),
    None => url.fragment.as_deref(),
  };
  Segments::new(Some(part(&parts, 1)?), part(&parts, 2)?, committish)
}

pub fn bitbucket() -> HostDefinition {
  let host = HostDefinition::new("bitbucket", "bitbucket.org")
    .with_matcher(PathMatcher::Extract(bitbucket_extract))
    .with_treepath(Some("src"))
    .with_blobpath(Some("src"))
    .with_editpath(Some("?mode=edit"));

  with_templates(
    host,
    &[
      (
        Target::Edit,
        "https://{domain}/{user}/{project}[/{treepath}/{committish=master}/{path}{editpath}]",
      ),
      (
        Target::Tarball,
        "https://{domain}/{user}/{project}/get/{committish=master}.tar.gz",
      ),
    ],
  )
}

fn bitbucket_extract(url: &ParsedUrl) -> Option<Segments> {
  let parts = split_path(&url.path, 4);
  if part(&parts, 3) == Some("get") {
    return None;
  }
  Segments::new(Some(part(&parts, 1)?), part(&parts, 2)?, url.fragment.as_deref())
}

pub fn gitlab() -> HostDefinition {
  let host = HostDefinition::new("gitlab", "gitlab.com")
    .with_matcher(PathMatcher::Extract(gitlab_extract))
    .with_blobpath(Some("tree"))
    .with_editpath(Some("-/edit"));

  with_templates(
    host,
    &[(
      Target::Tarball,
      "https://{domain}/{user}/{project}/repository/archive.tar.gz?ref={committish=master}",
    )],
  )
}

/// The last segment is the project; everything before it is the (sub)group path.
fn gitlab_extract(url: &ParsedUrl) -> Option<Segments> {
  let path = url.path.as_str();
  if path.contains("/-/") || path.contains("/archive.tar.gz") {
    return None;
  }
  let path = path.strip_prefix('/').unwrap_or(path);
  let (user, project) = path.rsplit_once('/')?;
  if user.is_empty() {
    return None;
  }
  Segments::new(Some(user), project, url.fragment.as_deref())
}

pub fn gist() -> HostDefinition {
  let host = HostDefinition::new("gist", "gist.github.com")
    .with_protocols(["git", "git+ssh", "git+https", "ssh", "https"])
    .with_matcher(PathMatcher::Extract(gist_extract))
    .with_hash_format(HashFormat::GistFile)
    .with_ownerless(true);

  with_templates(
    host,
    &[
      (Target::Ssh, "git@{domain}:{project}.git{#committish}"),
      (Target::SshUrl, "git+ssh://git@{domain}/{project}.git{#committish}"),
      (Target::Https, "git+https://{domain}/{project}.git{#committish}"),
      (Target::Git, "git://{domain}/{project}.git{#committish}"),
      (Target::Shortcut, "{type}:{project}{#committish}"),
      (Target::Path, "{project}{#committish}"),
      (Target::Browse, "https://{domain}/{project}[/{committish}]"),
      (Target::BrowseTree, "https://{domain}/{project}[/{committish}][#{pathfragment}]"),
      (Target::BrowseBlob, "https://{domain}/{project}[/{committish}][#{pathfragment}]"),
      (Target::Docs, "https://{domain}/{project}[/{committish}]"),
      (Target::Bugs, "https://{domain}/{project}"),
      (
        Target::File,
        "https://gist.githubusercontent.com/[{user}/]{project}/raw[/{committish}]/{path}",
      ),
      (
        Target::Tarball,
        "https://codeload.github.com/gist/{project}/tar.gz/{committish=master}",
      ),
      (Target::Edit, "https://{domain}/[{user}/]{project}[/{committish}]/{editpath}"),
    ],
  )
}

/// `/[user/]id`; raw file URLs are rejected.
fn gist_extract(url: &ParsedUrl) -> Option<Segments> {
  let parts = split_path(&url.path, 4);
  if part(&parts, 3) == Some("raw") {
    return None;
  }
  let (user, project) = match (part(&parts, 1), part(&parts, 2)) {
    (user, Some(project)) => (user, project),
    (Some(project), None) => (None, project),
    (None, None) => return None,
  };
  Segments::new(user, project, url.fragment.as_deref())
}

pub fn sourcehut() -> HostDefinition {
  let host = HostDefinition::new("sourcehut", "git.sr.ht")
    .with_protocols(["git+ssh", "https"])
    .with_matcher(PathMatcher::Extract(sourcehut_extract))
    .with_blobpath(Some("tree"))
    .with_editpath(None)
    .without_template(Target::Bugs);

  with_templates(
    host,
    &[
      (
        Target::BrowseTree,
        "https://{domain}/{user}/{project}/{treepath}/{committish=HEAD}/{path}[#{fragment}]",
      ),
      (
        Target::BrowseBlob,
        "https://{domain}/{user}/{project}/{blobpath}/{committish=HEAD}/{path}[#{fragment}]",
      ),
      (Target::File, "https://{domain}/{user}/{project}/blob/{committish=HEAD}/{path}"),
      (Target::Https, "https://{domain}/{user}/{project}.git{#committish}"),
      (
        Target::Tarball,
        "https://{domain}/{user}/{project}/archive/{committish=HEAD}.tar.gz",
      ),
    ],
  )
}

fn sourcehut_extract(url: &ParsedUrl) -> Option<Segments> {
  let parts = split_path(&url.path, 4);
  if part(&parts, 3) == Some("archive") {
    return None;
  }
  Segments::new(Some(part(&parts, 1)?), part(&parts, 2)?, url.fragment.as_deref())
}
