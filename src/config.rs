use std::{
    env, fs,
    path::{Path, PathBuf},
};

use jsonpad_search::{DEFAULT_MAX_HISTORY, Query};
use log::warn;

const MIN_MAX_HISTORY: usize = 1;
const MAX_MAX_HISTORY: usize = 1_000;

const DEFAULT_CONFIG: &str = "# Search defaults (command-line flags override these)\n\
# Match letter case exactly\n\
# case_sensitive = false\n\
# Only match whole words (not preceded or followed by letters, digits or _)\n\
# whole_words = false\n\
# Treat patterns as regular expressions\n\
# use_regex = false\n\
\n\
# Number of recent queries kept by interactive sessions (1-1000)\n\
# max_history = 50\n\
# Print `find` results as JSON by default\n\
# json_output = false\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub case_sensitive: bool,
    pub whole_words: bool,
    pub use_regex: bool,
    pub max_history: usize,
    pub json_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_words: false,
            use_regex: false,
            max_history: DEFAULT_MAX_HISTORY,
            json_output: false,
        }
    }
}

impl AppConfig {
    pub fn load_or_create() -> Self {
        let Some(path) = ensure_config_file() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_contents(&contents),
            Err(err) => {
                warn!("Could not read config {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    fn from_contents(contents: &str) -> Self {
        let mut config = Self::default();
        for (line_number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                warn!(
                    "Ignoring config line {}: expected `key = value`",
                    line_number + 1
                );
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            let valid = match key.as_str() {
                "case_sensitive" => assign(&mut config.case_sensitive, parse_bool(value)),
                "whole_words" | "whole_word" => assign(&mut config.whole_words, parse_bool(value)),
                "use_regex" | "regex" => assign(&mut config.use_regex, parse_bool(value)),
                "json_output" => assign(&mut config.json_output, parse_bool(value)),
                "max_history" => assign(
                    &mut config.max_history,
                    value
                        .parse::<usize>()
                        .ok()
                        .map(|v| v.clamp(MIN_MAX_HISTORY, MAX_MAX_HISTORY)),
                ),
                _ => {
                    warn!("Ignoring unknown config key `{}` on line {}", key, line_number + 1);
                    continue;
                }
            };

            if !valid {
                warn!(
                    "Ignoring invalid value `{}` for `{}` on line {}",
                    value,
                    key,
                    line_number + 1
                );
            }
        }
        config
    }

    /// Builds a query from `pattern`, using these defaults unless a flag is set.
    pub fn query(&self, pattern: &str, flags: QueryFlags) -> Query {
        Query::new(pattern)
            .with_case_sensitive(flags.case_sensitive || self.case_sensitive)
            .with_whole_words(flags.whole_words || self.whole_words)
            .with_regex(flags.regex || self.use_regex)
    }

    pub fn to_display_lines(&self) -> Vec<String> {
        vec![
            format!("case_sensitive = {}", self.case_sensitive),
            format!("whole_words = {}", self.whole_words),
            format!("use_regex = {}", self.use_regex),
            format!("max_history = {}", self.max_history),
            format!("json_output = {}", self.json_output),
        ]
    }
}

/// Query options given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::Args)]
pub struct QueryFlags {
    /// Match letter case exactly
    #[arg(short = 'c', long)]
    pub case_sensitive: bool,

    /// Only match whole words
    #[arg(short = 'w', long)]
    pub whole_words: bool,

    /// Treat the pattern as a regular expression
    #[arg(short = 'r', long)]
    pub regex: bool,
}

fn assign<T>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn ensure_config_file() -> Option<PathBuf> {
    let path = config_path()?;
    if !path.exists() {
        write_default_config(&path);
    }
    Some(path)
}

/// Best effort: failures are logged and the defaults stay in effect.
fn write_default_config(path: &Path) -> bool {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!("Could not create config directory {}: {}", parent.display(), err);
            return false;
        }
    }
    if let Err(err) = fs::write(path, DEFAULT_CONFIG) {
        warn!("Could not create config {}: {}", path.display(), err);
        return false;
    }
    true
}

pub fn config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(config_dir) = dirs::config_dir() {
            return Some(config_dir.join("jsonpad").join("config.txt"));
        }
    }

    if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME")
        && !xdg_config_home.trim().is_empty()
    {
        return Some(Path::new(&xdg_config_home).join("jsonpad/config.txt"));
    }

    dirs::home_dir().map(|home| home.join(".config/jsonpad/config.txt"))
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DEFAULT_CONFIG, QueryFlags, write_default_config};

    #[test]
    fn defaults_when_empty() {
        let config = AppConfig::from_contents("");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.max_history, 50);
    }

    #[test]
    fn default_config_file_parses_to_defaults() {
        assert_eq!(AppConfig::from_contents(DEFAULT_CONFIG), AppConfig::default());
    }

    #[test]
    fn search_options_parse() {
        let config = AppConfig::from_contents(
            "# comment\n\
             case_sensitive = yes\n\
             Whole_Words = on\n\
             regex = 1\n\
             json_output = true\n",
        );

        assert!(config.case_sensitive);
        assert!(config.whole_words);
        assert!(config.use_regex);
        assert!(config.json_output);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = AppConfig::from_contents(
            "case_sensitive = maybe\n\
             max_history = lots\n\
             no equals sign here\n\
             unknown_key = 3\n",
        );
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn max_history_parses_and_clamps() {
        let custom = AppConfig::from_contents("max_history = 20\n");
        assert_eq!(custom.max_history, 20);

        let clamped_low = AppConfig::from_contents("max_history = 0\n");
        assert_eq!(clamped_low.max_history, 1);

        let clamped_high = AppConfig::from_contents("max_history = 5000\n");
        assert_eq!(clamped_high.max_history, 1_000);
    }

    #[test]
    fn flags_override_defaults() {
        let config = AppConfig::from_contents("use_regex = true\n");

        let query = config.query("a+", QueryFlags::default());
        assert!(query.is_regex());
        assert!(!query.is_case_sensitive());

        let query = config.query(
            "a+",
            QueryFlags {
                case_sensitive: true,
                whole_words: true,
                regex: false,
            },
        );
        assert!(query.is_regex());
        assert!(query.is_case_sensitive());
        assert!(query.is_whole_words());
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        std::fs::write(&path, "whole_words = true\n").unwrap();

        assert!(AppConfig::load_from(&path).whole_words);
        assert_eq!(
            AppConfig::load_from(&dir.path().join("missing.txt")),
            AppConfig::default()
        );
    }

    #[test]
    fn default_config_written_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jsonpad").join("config.txt");

        assert!(write_default_config(&path));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    fn unwritable_config_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("jsonpad");
        std::fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("config.txt");

        assert!(!write_default_config(&path));
        assert!(!path.exists());
    }

    #[test]
    fn display_lines_round_trip() {
        let config = AppConfig {
            case_sensitive: true,
            max_history: 7,
            ..AppConfig::default()
        };
        let rendered = config.to_display_lines().join("\n");
        assert_eq!(AppConfig::from_contents(&rendered), config);
    }
}
