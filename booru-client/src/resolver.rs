//! Turns a site name or a user supplied URL into the [`SiteConfig`] a client talks to.
use booru_common::Dialect;
use log::debug;
use url::Url;

use crate::error::ApiError;
use crate::registry::{SiteConfig, SiteRegistry};

/// Resolves exactly one of `site_name` or `site_url` for a client of `dialect`.
///
/// Empty strings count as not supplied.
///
/// # Errors
/// Returns [`ApiError::Config`] when neither or both are supplied, when the name is not in
/// `registry` or belongs to another dialect, and when the URL is not a valid `http`/`https` URL.
pub fn resolve(
    registry: &SiteRegistry,
    dialect: Dialect,
    site_name: Option<&str>,
    site_url: Option<&str>,
) -> Result<SiteConfig, ApiError> {
    let site_name = site_name.filter(|s| !s.trim().is_empty());
    let site_url = site_url.filter(|s| !s.trim().is_empty());

    match (site_name, site_url) {
        (Some(name), None) => {
            let site = resolve_name(registry, name)?;
            if site.dialect != dialect {
                return Err(ApiError::config(format!(
                    "Site '{}' uses the {} API, not {}",
                    site.name, site.dialect, dialect
                )));
            }
            Ok(site)
        }
        (None, Some(url)) => {
            let base_url = normalize_url(url)?;
            debug!("Using custom {dialect} site at {base_url}");
            Ok(SiteConfig::custom(dialect, base_url))
        }
        (None, None) => Err(ApiError::config("site_name and site_url are both empty")),
        (Some(_), Some(_)) => Err(ApiError::config(
            "Specify either site_name or site_url, not both",
        )),
    }
}

/// Looks up a registered site by name.
///
/// # Errors
/// Returns [`ApiError::Config`] for names outside of the registry.
pub fn resolve_name(registry: &SiteRegistry, site_name: &str) -> Result<SiteConfig, ApiError> {
    registry.get(site_name).cloned().ok_or_else(|| {
        ApiError::config(format!(
            "The site name '{site_name}' is not valid, use the site_url parameter"
        ))
    })
}

/// Validates a base URL and normalizes it to lower case without trailing slashes.
///
/// # Errors
/// Returns [`ApiError::Config`] if the URL doesn't parse, has no host, or its scheme is not
/// `http` or `https`.
pub fn normalize_url(url: &str) -> Result<String, ApiError> {
    let lowered = url.trim().to_lowercase();

    let parsed = Url::parse(&lowered)
        .map_err(|e| ApiError::config(format!("Invalid URL '{url}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::config(format!(
            "Invalid URL '{url}': unsupported scheme '{}'",
            parsed.scheme()
        )));
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ApiError::config(format!("Invalid URL '{url}': missing host")));
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ApiError::config(format!(
            "Invalid URL '{url}': a base URL can't carry a query or fragment"
        )));
    }

    Ok(lowered.trim_end_matches('/').to_string())
}
