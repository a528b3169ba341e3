//! URL templates.
//!
//! A template is literal text interleaved with placeholders drawn from the
//! fixed [`Placeholder`] set. Each placeholder has one encoding rule, so a
//! template can never splice an unencoded field into a URL.
//!
//! # Syntax
//!
//! | Form | Meaning |
//! |------|---------|
//! | `{user}` | field value, encoded per placeholder |
//! | `{committish=master}` | field value, or the literal fallback when empty |
//! | `{#committish}` | `#` followed by the committish, or nothing |
//! | `[/{treepath}/{committish}]` | rendered only if every field inside is non-empty |
//!
//! Groups do not nest. `{`, `}`, `[` and `]` are reserved.
//!
//! # Example
//!
//! ```
//! use repolink_lib::template::{Fields, Template};
//!
//! let template: Template = "https://{domain}/{user}/{project}[/tree/{committish}]".parse().unwrap();
//! let fields = Fields::new("github", "github.com", "npm", "cli");
//! assert_eq!(template.render(&fields), "https://github.com/npm/cli");
//!
//! let fields = fields.with_committish(Some("fix/bug"));
//! assert_eq!(template.render(&fields), "https://github.com/npm/cli/tree/fix%2Fbug");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoding;

/// The closed set of values a template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
  /// Host id, raw.
  Type,
  /// Host domain, raw.
  Domain,
  /// Credentials, already percent-encoded.
  Auth,
  /// Path-encoded; may contain `/` (gitlab subgroups).
  User,
  /// Path-encoded.
  Project,
  /// Component-encoded, so `/` becomes `%2F`.
  Committish,
  /// `#` + fragment-encoded committish, or empty.
  HashCommittish,
  /// Path-encoded file path without leading slashes.
  Path,
  TreePath,
  BlobPath,
  EditPath,
  /// The fragment argument in the host's [`HashFormat`].
  Fragment,
  /// The file path in the host's [`HashFormat`].
  PathFragment,
}

impl Placeholder {
  pub const ALL: [Placeholder; 13] = [
    Placeholder::Type,
    Placeholder::Domain,
    Placeholder::Auth,
    Placeholder::User,
    Placeholder::Project,
    Placeholder::Committish,
    Placeholder::HashCommittish,
    Placeholder::Path,
    Placeholder::TreePath,
    Placeholder::BlobPath,
    Placeholder::EditPath,
    Placeholder::Fragment,
    Placeholder::PathFragment,
  ];

  pub fn name(&self) -> &'static str {
    match self {
      Placeholder::Type => "type",
      Placeholder::Domain => "domain",
      Placeholder::Auth => "auth",
      Placeholder::User => "user",
      Placeholder::Project => "project",
      Placeholder::Committish => "committish",
      Placeholder::HashCommittish => "#committish",
      Placeholder::Path => "path",
      Placeholder::TreePath => "treepath",
      Placeholder::BlobPath => "blobpath",
      Placeholder::EditPath => "editpath",
      Placeholder::Fragment => "fragment",
      Placeholder::PathFragment => "pathfragment",
    }
  }

  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|p| p.name() == name)
  }
}

/// How a host turns a path or line reference into a URL anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashFormat {
  /// `L100` becomes `l100`, `lib/index.js` becomes `libindex-js`.
  #[default]
  Anchor,
  /// Like [`HashFormat::Anchor`] with a `file-` prefix, as gists label files.
  GistFile,
}

impl HashFormat {
  pub fn apply(&self, value: &str) -> String {
    match self {
      HashFormat::Anchor => anchor(value),
      HashFormat::GistFile if value.is_empty() => String::new(),
      HashFormat::GistFile => format!("file-{}", anchor(value)),
    }
  }
}

fn anchor(value: &str) -> String {
  let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
  let lower = value.to_lowercase();
  let trimmed = lower.trim_matches(|c: char| !is_word(c));

  let mut out = String::with_capacity(trimmed.len());
  let mut gap = false;
  for c in trimmed.chars().filter(|&c| c != '/') {
    if is_word(c) {
      if gap {
        out.push('-');
        gap = false;
      }
      out.push(c);
    } else {
      gap = true;
    }
  }
  out
}

/// Errors raised while parsing a template string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
  /// A `{name}` that is not one of the known placeholders.
  #[error("unknown placeholder '{{{0}}}'")]
  UnknownPlaceholder(String),

  /// A `{` or `[` without its closing counterpart.
  #[error("unclosed '{0}' in template")]
  Unclosed(char),

  /// A `}` or `]` without an opening counterpart.
  #[error("unexpected '{0}' in template")]
  Unexpected(char),

  /// A `[` inside another optional group.
  #[error("optional groups cannot nest")]
  NestedGroup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
  Literal(String),
  Field {
    placeholder: Placeholder,
    fallback: Option<String>,
  },
  Optional(Vec<Segment>),
}

/// A parsed URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  source: String,
  segments: Vec<Segment>,
}

impl Template {
  pub fn parse(source: &str) -> Result<Self, TemplateError> {
    let mut segments = Vec::new();
    let mut group: Option<Vec<Segment>> = None;
    let mut literal = String::new();
    let mut chars = source.chars();

    while let Some(c) = chars.next() {
      match c {
        '{' => {
          let mut body = String::new();
          loop {
            match chars.next() {
              Some('}') => break,
              Some(c) => body.push(c),
              None => return Err(TemplateError::Unclosed('{')),
            }
          }
          let (name, fallback) = match body.split_once('=') {
            Some((name, fallback)) => (name, Some(fallback.to_string())),
            None => (body.as_str(), None),
          };
          let placeholder =
            Placeholder::from_name(name).ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;

          let target = group.as_mut().unwrap_or(&mut segments);
          flush(&mut literal, target);
          target.push(Segment::Field { placeholder, fallback });
        }
        '[' => {
          if group.is_some() {
            return Err(TemplateError::NestedGroup);
          }
          flush(&mut literal, &mut segments);
          group = Some(Vec::new());
        }
        ']' => {
          let mut inner = group.take().ok_or(TemplateError::Unexpected(']'))?;
          flush(&mut literal, &mut inner);
          segments.push(Segment::Optional(inner));
        }
        '}' => return Err(TemplateError::Unexpected('}')),
        c => literal.push(c),
      }
    }

    if group.is_some() {
      return Err(TemplateError::Unclosed('['));
    }
    flush(&mut literal, &mut segments);

    Ok(Template {
      source: source.to_string(),
      segments,
    })
  }

  /// The template text this was parsed from.
  pub fn as_str(&self) -> &str {
    &self.source
  }

  /// Whether the template references `placeholder` anywhere.
  pub fn uses(&self, placeholder: Placeholder) -> bool {
    fn walk(segments: &[Segment], wanted: Placeholder) -> bool {
      segments.iter().any(|segment| match segment {
        Segment::Literal(_) => false,
        Segment::Field { placeholder, .. } => *placeholder == wanted,
        Segment::Optional(inner) => walk(inner, wanted),
      })
    }
    walk(&self.segments, placeholder)
  }

  pub fn render(&self, fields: &Fields<'_>) -> String {
    let mut out = String::new();
    for segment in &self.segments {
      match segment {
        Segment::Optional(inner) => {
          if let Some(rendered) = render_group(inner, fields) {
            out.push_str(&rendered);
          }
        }
        segment => {
          if let Some(value) = render_segment(segment, fields) {
            out.push_str(&value);
          }
        }
      }
    }
    out
  }
}

fn flush(literal: &mut String, target: &mut Vec<Segment>) {
  if !literal.is_empty() {
    target.push(Segment::Literal(std::mem::take(literal)));
  }
}

/// Render a group, or `None` when any field inside it is empty.
fn render_group(segments: &[Segment], fields: &Fields<'_>) -> Option<String> {
  let mut out = String::new();
  for segment in segments {
    out.push_str(&render_segment(segment, fields)?);
  }
  Some(out)
}

/// Render one non-group segment; `None` marks an empty field.
fn render_segment<'a>(segment: &'a Segment, fields: &Fields<'a>) -> Option<Cow<'a, str>> {
  match segment {
    Segment::Literal(text) => Some(Cow::Borrowed(text)),
    Segment::Field { placeholder, fallback } => fields
      .value(*placeholder)
      .filter(|value| !value.is_empty())
      .or_else(|| fallback.as_deref().map(Cow::Borrowed)),
    Segment::Optional(inner) => render_group(inner, fields).map(Cow::Owned),
  }
}

impl FromStr for Template {
  type Err = TemplateError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Template::parse(s)
  }
}

impl fmt::Display for Template {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.source)
  }
}

/// The values a template is filled with, before encoding.
#[derive(Debug, Clone, Default)]
pub struct Fields<'a> {
  pub kind: &'a str,
  pub domain: &'a str,
  pub auth: Option<&'a str>,
  pub user: Option<&'a str>,
  pub project: &'a str,
  pub committish: Option<&'a str>,
  pub path: &'a str,
  pub fragment: Option<&'a str>,
  pub treepath: Option<&'a str>,
  pub blobpath: Option<&'a str>,
  pub editpath: Option<&'a str>,
  pub hash_format: HashFormat,
}

impl<'a> Fields<'a> {
  pub fn new(kind: &'a str, domain: &'a str, user: &'a str, project: &'a str) -> Self {
    Fields {
      kind,
      domain,
      user: Some(user),
      project,
      ..Default::default()
    }
  }

  pub fn with_committish(mut self, committish: Option<&'a str>) -> Self {
    self.committish = committish;
    self
  }

  pub fn with_path(mut self, path: &'a str) -> Self {
    self.path = path;
    self
  }

  pub fn with_fragment(mut self, fragment: Option<&'a str>) -> Self {
    self.fragment = fragment;
    self
  }

  fn value(&self, placeholder: Placeholder) -> Option<Cow<'a, str>> {
    match placeholder {
      Placeholder::Type => Some(Cow::Borrowed(self.kind)),
      Placeholder::Domain => Some(Cow::Borrowed(self.domain)),
      Placeholder::Auth => self.auth.map(Cow::Borrowed),
      Placeholder::User => self.user.map(encoding::path),
      Placeholder::Project => Some(encoding::path(self.project)),
      Placeholder::Committish => self.committish.map(encoding::component),
      Placeholder::HashCommittish => self
        .committish
        .filter(|c| !c.is_empty())
        .map(|c| Cow::Owned(format!("#{}", encoding::fragment(c)))),
      Placeholder::Path => Some(encoding::path(self.path)),
      Placeholder::TreePath => self.treepath.map(Cow::Borrowed),
      Placeholder::BlobPath => self.blobpath.map(Cow::Borrowed),
      Placeholder::EditPath => self.editpath.map(Cow::Borrowed),
      Placeholder::Fragment => self.fragment.map(|f| Cow::Owned(self.hash_format.apply(f))),
      Placeholder::PathFragment => Some(Cow::Owned(self.hash_format.apply(self.path))),
    }
  }
}
