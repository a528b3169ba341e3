//! The lax URL grammar.
//!
//! ```text
//! [scheme:][//][auth@]host[:port][/path][?query][#fragment]
//! ```
//!
//! Every part is optional and nothing is validated, so any string decomposes.
//! This is the last resort after the WHATWG parser has rejected an input; it
//! exists so that the resolver can always inspect a host and path.

use std::sync::LazyLock;

use regex::Regex;

use super::ParsedUrl;

static LAX_URL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?s)^(?:([A-Za-z][A-Za-z0-9+.\-]*):)?(?://)?(?:([^@/#\s]*)@)?([^/:?#]*)(?::([0-9]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$",
  )
  .expect("lax url regex is valid")
});

/// Decompose `input` with the lax grammar.
pub fn parse(input: &str) -> Option<ParsedUrl> {
  let caps = LAX_URL.captures(input)?;
  let text = |i: usize| caps.get(i).map(|m| m.as_str());

  let (username, password) = match text(2) {
    Some(auth) => match auth.split_once(':') {
      Some((user, pass)) => (user.to_string(), Some(pass.to_string())),
      None => (auth.to_string(), None),
    },
    None => (String::new(), None),
  };

  let mut path = text(5).unwrap_or_default().to_string();
  if !path.is_empty() && !path.starts_with('/') {
    path.insert(0, '/');
  }

  Some(ParsedUrl {
    scheme: text(1).unwrap_or_default().to_ascii_lowercase(),
    username,
    password,
    host: text(3).unwrap_or_default().to_string(),
    port: text(4).filter(|port| !port.is_empty()).map(str::to_string),
    path,
    query: text(6).map(str::to_string),
    fragment: text(7).map(str::to_string),
    loose: true,
  })
}
