use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::Deserialize;
use serde_valid::Validate;

const YAML_FILE_LOCATION: &str = "/etc/bookshelf-server.yaml";
const ENV_PREFIX: &str = "BOOKSHELF_";

#[derive(Clone, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    pub server_address: String,
    pub server_port: u16,
    pub log_filter: String,
    /// The file is created on first start.
    #[validate(custom = validator::database_path)]
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0".to_string(),
            server_port: 8080,
            log_filter: "INFO".to_string(),
            database_path: PathBuf::from("bookshelf.db"),
        }
    }
}

impl Config {
    pub fn new() -> anyhow::Result<Config> {
        let config: Config = Figment::new()
            .merge(Yaml::file(YAML_FILE_LOCATION))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        config.validate()?;
        Ok(config)
    }
}

mod validator {
    use serde_valid::validation::Error;
    use std::path::Path;

    pub fn database_path(val: &Path) -> Result<(), Error> {
        if val.as_os_str().is_empty() {
            Err(Error::Custom("database path must be set".to_string()))
        } else {
            Ok(())
        }
    }
}
