//! URL schemes understood by the resolver.
//!
//! Every scheme a host may accept is listed in [`SCHEMES`] together with the
//! rendering it implies and whether credentials written in the URL are kept.
//! SSH schemes accept `user@` syntactically (git needs it to tell an scp-style
//! connect string from a path) but the value is always dropped.

use std::fmt;

/// The rendering implied by the form an input was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
  Shortcut,
  Https,
  Git,
  SshUrl,
  Http,
  GitHttp,
}

impl Representation {
  pub fn as_str(&self) -> &'static str {
    match self {
      Representation::Shortcut => "shortcut",
      Representation::Https => "https",
      Representation::Git => "git",
      Representation::SshUrl => "sshurl",
      Representation::Http => "http",
      Representation::GitHttp => "git+http",
    }
  }

  /// Whether rendering this representation verbatim would produce an insecure URL.
  pub fn is_insecure(&self) -> bool {
    matches!(self, Representation::Http | Representation::GitHttp)
  }
}

impl fmt::Display for Representation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How the resolver treats one URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeInfo {
  /// Scheme name without the trailing `:`.
  pub name: &'static str,
  pub representation: Representation,
  /// Whether `user:password@` from the input is kept on the resolved repo.
  pub respects_auth: bool,
}

pub const SCHEMES: &[SchemeInfo] = &[
  SchemeInfo {
    name: "git+ssh",
    representation: Representation::SshUrl,
    respects_auth: false,
  },
  SchemeInfo {
    name: "ssh",
    representation: Representation::SshUrl,
    respects_auth: false,
  },
  SchemeInfo {
    name: "git+https",
    representation: Representation::Https,
    respects_auth: true,
  },
  SchemeInfo {
    name: "git",
    representation: Representation::Git,
    respects_auth: true,
  },
  SchemeInfo {
    name: "http",
    representation: Representation::Http,
    respects_auth: true,
  },
  SchemeInfo {
    name: "https",
    representation: Representation::Https,
    respects_auth: true,
  },
  SchemeInfo {
    name: "git+http",
    representation: Representation::GitHttp,
    respects_auth: true,
  },
];

/// Look up a scheme by name (without the trailing `:`).
pub fn lookup(name: &str) -> Option<&'static SchemeInfo> {
  SCHEMES.iter().find(|scheme| scheme.name == name)
}
