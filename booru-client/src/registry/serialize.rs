use booru_common::{Dialect, ResponseFormat};
use log::debug;
use serde::Deserialize;
use std::fs::{create_dir_all, read_to_string, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{collections::HashMap, str::FromStr};

use super::SiteConfig;
use crate::{error::ApiError, resolver::normalize_url};

const SAMPLE_SERVER_TOML: &str = include_str!("servers.toml");

pub const SERVERS_FILE_NAME: &str = "servers.toml";

#[derive(Debug, Deserialize)]
struct Config {
    #[serde(default)]
    servers: HashMap<String, Server>,
}

#[derive(Debug, Deserialize)]
struct Server {
    dialect: String,
    base_url: String,
    hash_template: Option<String>,
    format: Option<String>,
}

/// Default location of the servers file inside the [config dir](Dialect::config_dir).
///
/// # Errors
/// Fails if the config directory can't be found or created.
pub fn default_servers_path() -> Result<PathBuf, ApiError> {
    Ok(Dialect::config_dir()?.join(SERVERS_FILE_NAME))
}

/// Parses the contents of a `servers.toml` file into site configurations.
///
/// # Errors
/// Fails on invalid TOML, unknown dialects or formats, and base URLs that wouldn't resolve.
pub fn parse_servers(contents: &str) -> Result<Vec<SiteConfig>, ApiError> {
    let config: Config = toml::from_str(contents)
        .map_err(|e| ApiError::config(format!("Failed to parse servers file: {e}")))?;

    let mut sites = Vec::with_capacity(config.servers.len());

    for (id, data) in config.servers {
        let dialect = Dialect::from_str(&data.dialect)
            .map_err(|e| ApiError::config(format!("Server '{id}': {e}")))?;

        let format = match data.format.as_deref() {
            Some(fmt) => ResponseFormat::from_str(fmt)
                .map_err(|e| ApiError::config(format!("Server '{id}': {e}")))?,
            None => dialect.default_format(),
        };

        sites.push(SiteConfig {
            name: id.to_lowercase(),
            dialect,
            base_url: normalize_url(&data.base_url)?,
            auth_template: data.hash_template,
            format,
        });
    }

    debug!("Configured servers: {:?}", sites);
    Ok(sites)
}

/// Reads the servers file at `path`, writing a commented sample there first if it doesn't exist.
///
/// # Errors
/// Fails if the file can't be created or read, or if [`parse_servers`] rejects it.
pub fn read_server_cfg_file(path: &Path) -> Result<Vec<SiteConfig>, ApiError> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        let mut sample_toml = File::create(path)?;
        sample_toml.write_all(SAMPLE_SERVER_TOML.as_bytes())?;
        debug!("Wrote sample servers file to {}", path.display());
    }

    let contents = read_to_string(path)?;
    parse_servers(&contents)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::env;

    #[test]
    fn sample_file_declares_no_servers() {
        let sites = parse_servers(SAMPLE_SERVER_TOML).unwrap();
        assert!(sites.is_empty());
    }

    #[test]
    fn servers_are_parsed_and_normalized() {
        let toml = r#"
            [servers.MyBooru]
            dialect = "moebooru"
            base_url = "HTTPS://Booru.Example.net/"
            hash_template = "salt--{0}--"

            [servers.xmlbooru]
            dialect = "gelbooru"
            base_url = "http://xml.example.org"
            format = "xml"
        "#;

        let mut sites = parse_servers(toml).unwrap();
        sites.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].name, "mybooru");
        assert_eq!(sites[0].dialect, Dialect::Moebooru);
        assert_eq!(sites[0].base_url, "https://booru.example.net");
        assert_eq!(sites[0].auth_template.as_deref(), Some("salt--{0}--"));
        assert_eq!(sites[0].format, ResponseFormat::Json);
        assert_eq!(sites[1].format, ResponseFormat::Xml);
    }

    #[test]
    fn invalid_entries_are_config_errors() {
        let unknown_dialect = r#"
            [servers.bad]
            dialect = "shimmie"
            base_url = "https://example.org"
        "#;
        assert!(matches!(
            parse_servers(unknown_dialect),
            Err(ApiError::Config { .. })
        ));

        let bad_url = r#"
            [servers.bad]
            dialect = "danbooru"
            base_url = "ftp://example.org"
        "#;
        assert!(matches!(parse_servers(bad_url), Err(ApiError::Config { .. })));

        assert!(matches!(
            parse_servers("servers = 3"),
            Err(ApiError::Config { .. })
        ));
    }

    #[test]
    fn missing_file_is_created_from_sample() {
        let dir = env::temp_dir().join(format!("booru-client-test-{}", std::process::id()));
        let path = dir.join(SERVERS_FILE_NAME);
        let _ = std::fs::remove_file(&path);

        let sites = read_server_cfg_file(&path).unwrap();

        assert!(sites.is_empty());
        assert!(path.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
