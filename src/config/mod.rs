use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Optional TOML config naming the two source files. CLI paths take
/// precedence over config values.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct Config {
    pub(crate) transactions_file: Option<String>,
    pub(crate) categories_file: Option<String>,
}

impl Config {
    pub(crate) fn load_from_file(file_path: &str) -> anyhow::Result<Config> {
        let path = Path::new(file_path);
        if path.exists() && path.is_file() {
            let config: Config = toml::from_str(&fs::read_to_string(path)?)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}
