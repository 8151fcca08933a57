use chrono::Weekday;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::dormitory::{DEFAULT_ROOM_CAPACITY, DEFAULT_TOTAL_ROOMS};
use crate::error::{Error, ErrorKind, Result};

const CONFIG_PATH_ENV_VAR: &str = "GARRISON_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Result<Vec<PathBuf>> {
    let config_env: Option<PathBuf> = env::var_os(CONFIG_PATH_ENV_VAR).map(PathBuf::from);

    let home = dirs::home_dir().ok_or_else(|| {
        Error::new(
            ErrorKind::ConfigParse,
            "Unable to find home directory",
        )
    })?;

    let home_config = home.join(".garrison.toml");

    let config_xdg = dirs::config_dir()
        .unwrap_or_else(|| home.join(".config"))
        .join("garrison")
        .join("config.toml");

    let mut locations = vec![config_xdg, home_config];

    if let Some(path) = config_env {
        locations.insert(0, path);
    }

    Ok(locations)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub total_rooms: usize,
    pub room_capacity: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        RoomConfig {
            total_rooms: DEFAULT_TOTAL_ROOMS,
            room_capacity: DEFAULT_ROOM_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_file: Option<PathBuf>,
    pub special_weekday: Option<Weekday>,
    pub preview_limit: usize,
    pub upcoming_limit: usize,
    pub rooms: RoomConfig,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            data_file: None,
            special_weekday: Some(Weekday::Fri),
            preview_limit: 2,
            upcoming_limit: 5,
            rooms: RoomConfig::default(),
        }
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| Error::new(ErrorKind::ConfigParse, &err.to_string()))
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_str(&content).map_err(|err| {
            let message = format!(
                "{}: {}",
                path.display(),
                err.message.as_deref().unwrap_or_default()
            );
            err.with_msg(&message)
        })?;

        // data file is relative to the config file it was named in
        if let (Some(data_file), Some(dir)) = (&config.data_file, path.parent()) {
            if data_file.is_relative() {
                config.data_file = Some(dir.join(data_file));
            }
        }

        Ok(config)
    }
}

/// Loads `path` if given, otherwise the first config file found in the
/// usual locations, otherwise the defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        log::info!("Loading config from '{}'", path.display());
        return Config::from_path(path);
    }

    let locations = match find_configfile_locations() {
        Ok(locations) => locations,
        Err(err) => {
            log::warn!("{}", err);
            Vec::new()
        }
    };

    for location in locations.iter() {
        if location.is_file() {
            log::info!("Loading config from '{}'", location.display());
            return Config::from_path(location);
        }
        log::debug!("No config at '{}'", location.display());
    }

    log::info!("No config file found, using defaults");
    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.special_weekday, Some(Weekday::Fri));
        assert_eq!(config.preview_limit, 2);
        assert_eq!(config.upcoming_limit, 5);
        assert_eq!(config.rooms.total_rooms, 50);
        assert_eq!(config.rooms.room_capacity, 4);
        assert_eq!(Config::from_str("").unwrap(), config);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = Config::from_str(
            "special_weekday = \"Sun\"\npreview_limit = 3\n[rooms]\nroom_capacity = 6\n",
        )
        .unwrap();
        assert_eq!(config.special_weekday, Some(Weekday::Sun));
        assert_eq!(config.preview_limit, 3);
        assert_eq!(config.upcoming_limit, 5);
        assert_eq!(config.rooms.total_rooms, 50);
        assert_eq!(config.rooms.room_capacity, 6);
    }

    #[test]
    fn bad_value_is_a_config_error() {
        let err = Config::from_str("preview_limit = \"many\"").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigParse));
    }

    #[test]
    fn data_file_is_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_file = \"data.toml\"\n").unwrap();

        let config = load_suitable_config(Some(&path)).unwrap();
        assert_eq!(config.data_file, Some(dir.path().join("data.toml")));

        let absolute = dir.path().join("elsewhere").join("data.toml");
        fs::write(&path, format!("data_file = {:?}\n", absolute.display().to_string())).unwrap();
        assert_eq!(Config::from_path(&path).unwrap().data_file, Some(absolute));
    }

    #[test]
    fn parses_through_from_str_trait() {
        let config: Config = "upcoming_limit = 9".parse().unwrap();
        assert_eq!(config.upcoming_limit, 9);
        assert!("upcoming_limit = [".parse::<Config>().unwrap_err().to_string().starts_with("invalid configuration"));
    }
}
