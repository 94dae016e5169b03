use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Port the dev server binds by default
pub const DEFAULT_PORT: u16 = 3000;
/// Import alias that points at the project source root
pub const SOURCE_ALIAS: &str = "@";
/// Source root, relative to the project root
pub const SOURCE_DIR: &str = "src";

/// Front-end framework plugins understood by the build tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plugin {
    /// Single-file component compilation
    Vue,
}

/// Dev server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the dev server binds to
    pub host: IpAddr,
    /// TCP port the dev server binds to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
        }
    }
}

/// Module resolution settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Import prefix -> absolute directory
    pub alias: BTreeMap<String, PathBuf>,
}

/// Build tool configuration, evaluated once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub plugins: Vec<Plugin>,
    pub server: ServerConfig,
    pub resolve: ResolveConfig,
}

impl BuildConfig {
    /// Defaults for a project rooted at `root`
    pub fn for_project(root: impl AsRef<Path>) -> Self {
        let mut alias = BTreeMap::new();
        alias.insert(SOURCE_ALIAS.to_string(), root.as_ref().join(SOURCE_DIR));

        Self {
            plugins: vec![Plugin::Vue],
            server: ServerConfig::default(),
            resolve: ResolveConfig { alias },
        }
    }

    /// Load config from the process environment or use defaults.
    ///
    /// Call `env::init()` first so `.env` values are visible here.
    pub fn load_or_default() -> Self {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load config from an arbitrary variable source
    pub fn load_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let cwd = std::env::current_dir().unwrap_or_else(|e| {
            tracing::warn!("Cannot read working directory ({}), using relative paths", e);
            PathBuf::new()
        });

        let root = match lookup("PROJECT_ROOT") {
            Some(root) if !root.is_empty() => cwd.join(root),
            _ => cwd,
        };

        let mut config = Self::for_project(root);

        if let Some(host) = lookup("HOST") {
            if let Ok(parsed) = host.parse() {
                config.server.host = parsed;
            } else {
                tracing::warn!("Invalid HOST '{}', using default", host);
            }
        }

        if let Some(port) = lookup("PORT") {
            if let Ok(parsed) = port.parse::<u16>() {
                if parsed > 0 {
                    config.server.port = parsed;
                } else {
                    tracing::warn!("PORT must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid PORT '{}', using default", port);
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if self.plugins.is_empty() {
            return Err(ConfigError::NoPlugins);
        }
        for (alias, target) in &self.resolve.alias {
            if alias.is_empty() {
                return Err(ConfigError::EmptyAlias);
            }
            if !target.is_absolute() {
                return Err(ConfigError::RelativeAliasTarget {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
        }
        Ok(())
    }

    /// Directory the `@` alias points at
    pub fn source_root(&self) -> Option<&Path> {
        self.resolve.alias.get(SOURCE_ALIAS).map(PathBuf::as_path)
    }

    /// Rewrite an aliased import specifier to a filesystem path.
    ///
    /// Aliases only match whole leading segments (`@/x`, not `@x`); the
    /// longest matching alias wins. Returns `None` for non-aliased imports.
    pub fn resolve_import(&self, specifier: &str) -> Option<PathBuf> {
        self.resolve
            .alias
            .iter()
            .filter_map(|(alias, target)| {
                strip_alias(specifier, alias).map(|rest| (alias.len(), target, rest))
            })
            .max_by_key(|(len, _, _)| *len)
            .map(|(_, target, rest)| {
                if rest.is_empty() {
                    target.clone()
                } else {
                    target.join(rest)
                }
            })
    }
}

fn strip_alias<'a>(specifier: &'a str, alias: &str) -> Option<&'a str> {
    if alias.is_empty() {
        return None;
    }
    let rest = specifier.strip_prefix(alias)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Port cannot be 0")]
    ZeroPort,
    #[error("At least one plugin is required")]
    NoPlugins,
    #[error("Alias name cannot be empty")]
    EmptyAlias,
    #[error("Alias '{alias}' must point at an absolute path, got '{}'", .target.display())]
    RelativeAliasTarget { alias: String, target: PathBuf },
}
