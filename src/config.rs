use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Page size used when neither the config nor the command line sets one.
const DEFAULT_LIMIT: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// Upper bound on page size unless the config raises it.
const DEFAULT_MAX_LIMIT: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// Default location of the comment store, relative to the config root.
const DEFAULT_STORE: &str = "comments.json";

/// Raw TOML structure for `.commentnav.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct CommentnavTomlConfig {
    /// Page size when the caller does not ask for one.
    #[serde(default)]
    default_limit: Option<NonZeroUsize>,
    /// Largest page size a caller may request.
    #[serde(default)]
    max_limit: Option<NonZeroUsize>,
    /// Path of the JSON comment store, relative to the config root.
    #[serde(default)]
    store: Option<PathBuf>,
}

/// Project configuration loaded from `.commentnav.toml`.
pub struct Config {
    /// Page size when the caller does not ask for one.
    default_limit: NonZeroUsize,
    /// Requested page sizes above this are clamped down.
    max_limit: NonZeroUsize,
    /// Path of the JSON comment store.
    store: PathBuf,
}

impl Config {
    /// Default config: `comments.json` next to the config, ten per page, at most a hundred.
    fn defaults_rooted_at(root: &Path) -> Self {
        return Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
            store: root.join(DEFAULT_STORE),
        };
    }

    /// Resolve the page size for a request.
    ///
    /// The caller's choice or the configured default, clamped to `max_limit`.
    pub fn effective_limit(&self, requested: Option<NonZeroUsize>) -> NonZeroUsize {
        let wanted = requested.unwrap_or(self.default_limit);
        if wanted > self.max_limit {
            log::warn!("limit {wanted} exceeds max_limit {}, clamping", self.max_limit);
            return self.max_limit;
        }
        return wanted;
    }

    /// Load config from `.commentnav.toml` in the given root directory.
    ///
    /// Returns defaults if the file doesn't exist. Returns an error if the file
    /// exists but is malformed, never silently falling back to defaults when
    /// the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".commentnav.toml");
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no {} found, using defaults", path.display());
                return Ok(Self::defaults_rooted_at(root));
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };

        let raw: CommentnavTomlConfig = toml::from_str(&content)?;
        let max_limit = raw.max_limit.unwrap_or(DEFAULT_MAX_LIMIT);
        return Ok(Self {
            default_limit: raw.default_limit.unwrap_or(DEFAULT_LIMIT).min(max_limit),
            max_limit,
            store: root.join(raw.store.unwrap_or_else(|| PathBuf::from(DEFAULT_STORE))),
        });
    }

    /// Path of the JSON comment store.
    pub fn store_path(&self) -> &Path {
        return &self.store;
    }
}
