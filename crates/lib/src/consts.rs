/// Suffix stripped from project names and appended by clone templates.
pub const GIT_SUFFIX: &str = ".git";

/// Host prefix ignored when matching a parsed host against a registered domain.
pub const WWW_PREFIX: &str = "www.";

/// Scheme prefix removed by `no_git_plus` and by the manifest adapter.
pub const GIT_PLUS_PREFIX: &str = "git+";
