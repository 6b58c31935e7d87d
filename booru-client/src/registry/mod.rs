//! Known imageboards and the configuration needed to talk to them.
//!
//! The built-in table lives in [`DEFAULT_SITES`] and is never modified at runtime. Additional
//! sites can be declared in a `servers.toml` file (see [`serialize`]), which produces a new
//! [`SiteRegistry`] extending the built-in one.
use booru_common::{Dialect, ResponseFormat};
use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;

use crate::error::ApiError;
use crate::site_config;

pub mod macros;
pub mod serialize;

pub static DEFAULT_SITES: Lazy<SiteRegistry> = Lazy::new(|| {
    let mut hmap = HashMap::with_capacity(8);
    hmap.insert(
        "danbooru".to_string(),
        site_config!("danbooru", Dialect::Danbooru, "https://danbooru.donmai.us"),
    );
    hmap.insert(
        "safebooru".to_string(),
        site_config!("safebooru", Dialect::Danbooru, "https://safebooru.donmai.us"),
    );
    hmap.insert(
        "konachan".to_string(),
        site_config!(
            "konachan",
            Dialect::Moebooru,
            "https://konachan.com",
            Some(String::from("So-I-Heard-You-Like-Mupkids-?--{0}--")),
            ResponseFormat::Json
        ),
    );
    hmap.insert(
        "yandere".to_string(),
        site_config!(
            "yandere",
            Dialect::Moebooru,
            "https://yande.re",
            Some(String::from("choujin-steiner--{0}--")),
            ResponseFormat::Json
        ),
    );
    hmap.insert(
        "e621".to_string(),
        site_config!("e621", Dialect::E621, "https://e621.net"),
    );
    hmap.insert(
        "e926".to_string(),
        site_config!("e926", Dialect::E621, "https://e926.net"),
    );
    hmap.insert(
        "gelbooru".to_string(),
        site_config!("gelbooru", Dialect::Gelbooru, "https://gelbooru.com"),
    );
    hmap.insert(
        "rule34".to_string(),
        site_config!(
            "rule34",
            Dialect::Gelbooru,
            "https://api.rule34.xxx",
            None,
            ResponseFormat::Xml
        ),
    );
    SiteRegistry { sites: hmap }
});

/// Everything needed to reach one imageboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Registry key, or the base URL itself for sites given by URL.
    pub name: String,
    pub dialect: Dialect,
    /// Scheme and host (plus an optional path prefix), without a trailing slash.
    pub base_url: String,
    /// Template hashed together with the password by the Moebooru login scheme. The password
    /// replaces the `{0}` placeholder.
    pub auth_template: Option<String>,
    pub format: ResponseFormat,
}

impl SiteConfig {
    /// Configuration for a site outside of the registry. `base_url` must already be normalized.
    #[must_use]
    pub fn custom(dialect: Dialect, base_url: String) -> Self {
        Self {
            name: base_url.clone(),
            dialect,
            base_url,
            auth_template: None,
            format: dialect.default_format(),
        }
    }

    #[must_use]
    pub fn with_auth_template(mut self, template: impl Into<String>) -> Self {
        self.auth_template = Some(template.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }
}

impl Display for SiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Read-only lookup table of named sites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteRegistry {
    sites: HashMap<String, SiteConfig>,
}

impl SiteRegistry {
    /// A copy of the built-in table.
    #[must_use]
    pub fn builtin() -> Self {
        DEFAULT_SITES.clone()
    }

    /// The built-in table extended with the sites declared in a `servers.toml` file.
    ///
    /// A sample file is written to `path` if it doesn't exist yet.
    ///
    /// # Errors
    /// Fails if the file can't be created or read, or if any declared site is invalid.
    pub fn with_servers_file(path: &Path) -> Result<Self, ApiError> {
        let extra = serialize::read_server_cfg_file(path)?;
        Ok(Self::builtin().extended_with(extra))
    }

    /// Case-insensitive lookup by site name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SiteConfig> {
        self.sites.get(&name.trim().to_lowercase())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SiteConfig)> {
        self.sites.iter().map(|(name, site)| (name.as_str(), site))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Returns a new registry with `sites` added. Entries with an existing name replace the
    /// previous definition.
    #[must_use]
    pub fn extended_with(&self, sites: impl IntoIterator<Item = SiteConfig>) -> Self {
        let mut extended = self.clone();
        for site in sites {
            let key = site.name.to_lowercase();
            if extended.sites.contains_key(&key) {
                debug!("Overriding registered site {key}");
            }
            extended.sites.insert(key, site);
        }
        extended
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_site_has_a_normalized_base_url() {
        for (name, site) in DEFAULT_SITES.iter() {
            assert_eq!(name, site.name);
            assert!(
                site.base_url.starts_with("https://"),
                "{name} is not served over https"
            );
            assert!(!site.base_url.ends_with('/'), "{name} has a trailing slash");
        }
    }

    #[test]
    fn moebooru_sites_carry_a_hash_template() {
        for (name, site) in DEFAULT_SITES.iter() {
            if site.dialect == Dialect::Moebooru {
                let template = site.auth_template.as_deref().unwrap_or_default();
                assert!(template.contains("{0}"), "{name} template has no placeholder");
            }
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = SiteRegistry::builtin();
        assert_eq!(
            registry.get("Konachan").map(|s| s.base_url.as_str()),
            Some("https://konachan.com")
        );
        assert!(registry.get("sankaku").is_none());
    }

    #[test]
    fn rule34_answers_in_xml() {
        let site = DEFAULT_SITES.get("rule34").unwrap();
        assert_eq!(site.dialect, Dialect::Gelbooru);
        assert_eq!(site.format, ResponseFormat::Xml);
    }

    #[test]
    fn extending_never_touches_the_builtin_table() {
        let custom = SiteConfig::custom(Dialect::Moebooru, "https://booru.example.net".into());
        let extended = SiteRegistry::builtin().extended_with([SiteConfig {
            name: "Example".to_string(),
            ..custom
        }]);

        assert_eq!(extended.len(), DEFAULT_SITES.len() + 1);
        assert!(extended.contains("example"));
        assert!(!DEFAULT_SITES.contains("example"));
    }
}
