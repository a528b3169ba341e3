//! Resolve hosted git repository identifiers and render canonical URLs.
//!
//! ```
//! use repolink_lib::HostRegistry;
//!
//! let registry = HostRegistry::default();
//! let repo = registry.resolve("npm/cli#v7").unwrap();
//! assert_eq!(repo.browse().unwrap(), "https://github.com/npm/cli/tree/v7");
//! assert_eq!(repo.tarball().unwrap(), "https://codeload.github.com/npm/cli/tar.gz/v7");
//! ```

pub mod consts;
pub mod encoding;
pub mod host;
pub mod manifest;
pub mod parse;
pub mod registry;
pub mod repo;
pub mod resolve;
pub mod scheme;
pub mod template;

pub use host::{HostDefinition, Target};
pub use manifest::{ManifestRepository, from_manifest};
pub use registry::HostRegistry;
pub use repo::{HostedRepo, RenderOptions};
pub use resolve::{resolve, resolve_with};
pub use scheme::Representation;
