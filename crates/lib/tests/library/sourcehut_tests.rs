//! Tests for sourcehut resolution and rendering.

use repolink_lib::Representation;

use super::common::{resolve, try_resolve};

#[test]
fn every_form_resolves() {
  let cases = [
    ("sourcehut:~foo/bar", Representation::Shortcut),
    ("sourcehut:~foo/bar.git", Representation::Shortcut),
    ("git@git.sr.ht:~foo/bar", Representation::SshUrl),
    ("git@git.sr.ht:~foo/bar.git", Representation::SshUrl),
    ("git+ssh://git@git.sr.ht:~foo/bar", Representation::SshUrl),
    ("git+ssh://git@git.sr.ht:~foo/bar.git", Representation::SshUrl),
    ("https://git.sr.ht/~foo/bar", Representation::Https),
    ("https://git.sr.ht/~foo/bar.git", Representation::Https),
  ];
  for (input, default) in cases {
    for hash in ["", "#branch"] {
      let input = format!("{}{}", input, hash);
      let repo = resolve(&input);
      assert_eq!(repo.kind(), "sourcehut", "{}", input);
      assert_eq!(repo.user(), Some("~foo"), "{}", input);
      assert_eq!(repo.project(), "bar", "{}", input);
      assert_eq!(repo.default_representation(), default, "{}", input);
      assert_eq!(repo.auth(), None, "{}", input);
      assert_eq!(repo.committish(), hash.strip_prefix('#'), "{}", input);
    }
  }
}

#[test]
fn invalid_inputs_do_not_resolve() {
  for input in [
    "https://git.sr.ht/~foo",
    "git://git@git.sr.ht:~foo/bar",
    "ssh://git.sr.ht:~foo/bar",
    "https://git.sr.ht/~foo/bar/archive/HEAD.tar.gz",
  ] {
    assert!(try_resolve(input).is_none(), "{}", input);
  }
}

#[test]
fn stringify_follows_input_form() {
  let sshurl = resolve("git+ssh://git.sr.ht/~foo/bar");
  assert_eq!(sshurl.default_representation(), Representation::SshUrl);
  assert_eq!(sshurl.to_string(), sshurl.sshurl().unwrap());

  let https = resolve("https://git.sr.ht/~foo/bar");
  assert_eq!(https.to_string(), https.https().unwrap());
  assert_eq!(https.to_string(), "https://git.sr.ht/~foo/bar.git");

  let shortcut = resolve("sourcehut:~foo/bar");
  assert_eq!(shortcut.to_string(), "sourcehut:~foo/bar");
}

#[test]
fn links_fall_back_to_head() {
  let repo = resolve("sourcehut:~foo/bar");
  assert_eq!(repo.https().unwrap(), "https://git.sr.ht/~foo/bar.git");
  assert_eq!(repo.sshurl().unwrap(), "git+ssh://git@git.sr.ht/~foo/bar.git");
  assert_eq!(repo.ssh().unwrap(), "git@git.sr.ht:~foo/bar.git");
  assert_eq!(repo.browse().unwrap(), "https://git.sr.ht/~foo/bar");
  assert_eq!(repo.docs().unwrap(), "https://git.sr.ht/~foo/bar#readme");
  assert_eq!(repo.file("C").unwrap(), "https://git.sr.ht/~foo/bar/blob/HEAD/C");
  assert_eq!(repo.tarball().unwrap(), "https://git.sr.ht/~foo/bar/archive/HEAD.tar.gz");
  assert_eq!(
    repo.browse_path("src", None).unwrap(),
    "https://git.sr.ht/~foo/bar/tree/HEAD/src"
  );
  assert_eq!(
    repo.browse_file("README.md", Some("L9")).unwrap(),
    "https://git.sr.ht/~foo/bar/tree/HEAD/README.md#l9"
  );
}

#[test]
fn branch_links() {
  let repo = resolve("https://git.sr.ht/~foo/bar#branch");
  assert_eq!(repo.browse().unwrap(), "https://git.sr.ht/~foo/bar/tree/branch");
  assert_eq!(repo.file("C").unwrap(), "https://git.sr.ht/~foo/bar/blob/branch/C");
  assert_eq!(repo.tarball().unwrap(), "https://git.sr.ht/~foo/bar/archive/branch.tar.gz");
}

#[test]
fn unsupported_links() {
  let repo = resolve("sourcehut:~foo/bar");
  assert_eq!(repo.bugs(), None);
  assert_eq!(repo.git(), None);
  assert_eq!(repo.edit("C").unwrap(), "https://git.sr.ht/~foo/bar");
}
