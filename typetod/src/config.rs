use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use scribe::{Attr, Configuration};
use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Type to death: practice typing line by line
#[derive(Parser, Debug, Clone, Default)]
#[command(
    version,
    about,
    long_about = "Practice typing line by line. Samples come from fortune (default), local files, an RSS feed, or lines piped into standard input."
)]
pub struct Cli {
    /// style of mistyped characters
    #[arg(short = 'a', long = "attr", value_enum)]
    pub attr: Option<ErrorStyle>,

    /// measure speed in characters per second instead of words per minute
    #[arg(short, long)]
    pub cps: bool,

    /// endless mode: keep feeding samples until you give up
    #[arg(short = 'd', long)]
    pub endless: bool,

    /// drop empty lines of the samples
    #[arg(short = 'e', long)]
    pub drop_empty_lines: bool,

    /// files mode: type the files given as arguments
    #[arg(short, long, conflicts_with = "url")]
    pub files: bool,

    /// character the separator lines are drawn with
    #[arg(short = 'l', long)]
    pub separator: Option<String>,

    /// preview the next line while finishing the current one
    #[arg(short, long)]
    pub morph: bool,

    /// hide the result screen and the status bar
    #[arg(short, long)]
    pub quiet: bool,

    /// search directories given in files mode recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// hide the status bar
    #[arg(short = 's', long)]
    pub no_status_bar: bool,

    /// collapse runs of spaces and drop indentation
    #[arg(short = 'S', long)]
    pub squeeze_spaces: bool,

    /// number of spaces a tab is worth
    #[arg(short, long)]
    pub tab: Option<usize>,

    /// feed mode: type the items of the RSS feed at the given url
    #[arg(short, long)]
    pub url: bool,

    /// directory holding settings.toml
    #[arg(long, value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// files, or the url of the feed
    pub args: Vec<String>,
}

impl Cli {
    /// Settings for the flags that were actually given
    pub fn overrides(&self) -> Overrides {
        let source = if self.files {
            Some(SourceKind::Files)
        } else if self.url {
            Some(SourceKind::Feed)
        } else {
            None
        };

        Overrides {
            source,
            endless: self.endless.then_some(true),
            tab_width: self.tab,
            keep_empty_lines: self.drop_empty_lines.then_some(false),
            squeeze_spaces: self.squeeze_spaces.then_some(true),
            morph: self.morph.then_some(true),
            speed_unit: self.cps.then_some(SpeedUnit::Cps),
            error_style: self.attr,
            separator: self.separator.clone(),
            result_screen: self.quiet.then_some(false),
            status_bar: (self.quiet || self.no_status_bar).then_some(false),
            recursive: self.recursive.then_some(true),
        }
    }
}

/// Attribute of mistyped characters
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ErrorStyle {
    #[default]
    Reverse,
    Blink,
    Bold,
    Underline,
    Normal,
}

impl From<ErrorStyle> for Attr {
    fn from(style: ErrorStyle) -> Self {
        match style {
            ErrorStyle::Reverse => Self::Reverse,
            ErrorStyle::Blink => Self::Blink,
            ErrorStyle::Bold => Self::Bold,
            ErrorStyle::Underline => Self::Underline,
            ErrorStyle::Normal => Self::Normal,
        }
    }
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SpeedUnit {
    #[default]
    Wpm,
    Cps,
}

impl From<SpeedUnit> for scribe::SpeedUnit {
    fn from(unit: SpeedUnit) -> Self {
        match unit {
            SpeedUnit::Wpm => Self::Wpm,
            SpeedUnit::Cps => Self::Cps,
        }
    }
}

/// Where samples come from
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Fortune,
    Files,
    Feed,
    /// Standard input is not a terminal
    #[value(skip)]
    Piped,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Failed to get configuration directory. Please specify the location using the `--config <path>` flag"
    )]
    NoDirectory,

    #[error("Configuration directory '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] Box<figment::Error>),

    #[error("The tab width must be at least 1")]
    TabWidth,

    #[error("The separator must be one printable character, not '{0}'")]
    Separator(String),

    #[error("Any argument is unnecessary in {0} mode")]
    UnexpectedArguments(SourceKind),

    #[error("Assign files as arguments to play in files mode")]
    MissingFiles,

    #[error("Assign one url as an argument to play in feed mode")]
    FeedUrl,
}

/// Settings merged from defaults, settings.toml, the environment and the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceKind,
    pub endless: bool,
    pub tab_width: usize,
    pub keep_empty_lines: bool,
    pub squeeze_spaces: bool,
    pub morph: bool,
    pub speed_unit: SpeedUnit,
    pub error_style: ErrorStyle,
    pub separator: String,
    pub result_screen: bool,
    pub status_bar: bool,
    pub recursive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: SourceKind::Fortune,
            endless: false,
            tab_width: 2,
            keep_empty_lines: true,
            squeeze_spaces: false,
            morph: false,
            speed_unit: SpeedUnit::Wpm,
            error_style: ErrorStyle::Reverse,
            separator: "-".to_string(),
            result_screen: true,
            status_bar: true,
            recursive: false,
        }
    }
}

/// Command line layer of the settings. Unset fields leave lower layers alone.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endless: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_empty_lines: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squeeze_spaces: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morph: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_unit: Option<SpeedUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_style: Option<ErrorStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_screen: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_bar: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
}

impl Settings {
    /// Load the settings for a command line
    ///
    /// `piped` is true when standard input is not a terminal.
    pub fn get(cli: &Cli, piped: bool) -> Result<Self, ConfigError> {
        let config_dir = config_dir(cli.config.clone())?;
        let mut settings = Self::load(&config_dir, &cli.overrides())?;
        settings.validate(&cli.args, piped)?;
        Ok(settings)
    }

    /// Layer defaults, `settings.toml` in `config_dir`, `TYPETOD_*` variables and `overrides`
    pub fn load(config_dir: &Path, overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut settings = Figment::from(Serialized::defaults(Self::default()));

        let settings_toml = config_dir.join("settings.toml");
        if settings_toml.exists() {
            settings = settings.merge(Toml::file(settings_toml));
        }

        settings
            .merge(Env::prefixed("TYPETOD_").ignore(&["log"]))
            .merge(Serialized::defaults(overrides))
            .extract()
            .map_err(|error| ConfigError::Parse(Box::new(error)))
    }

    /// Check values and the arguments against the source kind
    pub fn validate(&mut self, args: &[String], piped: bool) -> Result<(), ConfigError> {
        if self.tab_width == 0 {
            return Err(ConfigError::TabWidth);
        }

        let mut separator = self.separator.chars();
        match (separator.next(), separator.next()) {
            (Some(c), None) if c == ' ' || c.is_ascii_graphic() => {}
            _ => return Err(ConfigError::Separator(self.separator.clone())),
        }

        if piped {
            self.source = SourceKind::Piped;
            self.endless = true;
        }

        match self.source {
            SourceKind::Fortune | SourceKind::Piped if !args.is_empty() => {
                Err(ConfigError::UnexpectedArguments(self.source))
            }
            SourceKind::Files if args.is_empty() => Err(ConfigError::MissingFiles),
            SourceKind::Feed if args.len() != 1 => Err(ConfigError::FeedUrl),
            _ => Ok(()),
        }
    }

    /// Engine configuration derived from these settings
    pub fn configuration(&self) -> Configuration {
        Configuration {
            tab_width: self.tab_width,
            keep_empty_lines: self.keep_empty_lines,
            collapse_spaces: self.squeeze_spaces,
            separate_samples: self.source != SourceKind::Piped,
            morphing: self.morph,
            speed_unit: self.speed_unit.into(),
            error_attr: self.error_style.into(),
            separator: self.separator.chars().next().unwrap_or('-'),
        }
    }
}

fn config_dir(override_path: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = override_path {
        return if path.is_dir() {
            Ok(path)
        } else {
            Err(ConfigError::NotADirectory(path))
        };
    }

    ProjectDirs::from("com", "typetod", "typetod")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(ConfigError::NoDirectory)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("typetod").chain(args.iter().copied())).unwrap()
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path(), &Overrides::default()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_file_and_cli_layers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("settings.toml"),
            "tab_width = 4\nmorph = true\nerror_style = \"underline\"\nseparator = \"=\"\n",
        )
        .unwrap();

        let settings = Settings::load(dir.path(), &Overrides::default()).unwrap();
        assert_eq!(settings.tab_width, 4);
        assert!(settings.morph);
        assert_eq!(settings.error_style, ErrorStyle::Underline);
        assert_eq!(settings.separator, "=");

        // Flags win over the file, absent flags do not reset it
        let overrides = cli(&["-t", "8", "-a", "bold", "-c"]).overrides();
        let settings = Settings::load(dir.path(), &overrides).unwrap();
        assert_eq!(settings.tab_width, 8);
        assert_eq!(settings.error_style, ErrorStyle::Bold);
        assert_eq!(settings.speed_unit, SpeedUnit::Cps);
        assert!(settings.morph);
        assert_eq!(settings.separator, "=");
    }

    #[test]
    fn test_bad_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.toml"), "tab_width = \"wide\"\n").unwrap();
        assert!(matches!(
            Settings::load(dir.path(), &Overrides::default()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let cli = Cli {
            config: Some(missing.clone()),
            ..Cli::default()
        };
        assert!(matches!(
            Settings::get(&cli, false),
            Err(ConfigError::NotADirectory(path)) if path == missing
        ));
    }

    #[test]
    fn test_quiet_hides_result_and_status_bar() {
        let overrides = cli(&["-q"]).overrides();
        assert_eq!(overrides.result_screen, Some(false));
        assert_eq!(overrides.status_bar, Some(false));

        let overrides = cli(&["-s"]).overrides();
        assert_eq!(overrides.result_screen, None);
        assert_eq!(overrides.status_bar, Some(false));
    }

    #[test]
    fn test_files_and_url_conflict() {
        assert!(Cli::try_parse_from(["typetod", "-f", "-u", "x"]).is_err());
    }

    #[test]
    fn test_validate_values() {
        let mut settings = Settings {
            tab_width: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(&[], false), Err(ConfigError::TabWidth)));

        for separator in ["", "==", "\t", "é"] {
            let mut settings = Settings {
                separator: separator.to_string(),
                ..Settings::default()
            };
            assert!(matches!(
                settings.validate(&[], false),
                Err(ConfigError::Separator(_))
            ));
        }
    }

    #[test]
    fn test_validate_mode_arguments() {
        let mut fortune = Settings::default();
        assert!(fortune.validate(&[], false).is_ok());
        assert!(matches!(
            fortune.validate(&args(&["x"]), false),
            Err(ConfigError::UnexpectedArguments(SourceKind::Fortune))
        ));

        let mut files = Settings {
            source: SourceKind::Files,
            ..Settings::default()
        };
        assert!(matches!(files.validate(&[], false), Err(ConfigError::MissingFiles)));
        assert!(files.validate(&args(&["a", "b"]), false).is_ok());

        let mut feed = Settings {
            source: SourceKind::Feed,
            ..Settings::default()
        };
        assert!(matches!(feed.validate(&[], false), Err(ConfigError::FeedUrl)));
        assert!(matches!(
            feed.validate(&args(&["a", "b"]), false),
            Err(ConfigError::FeedUrl)
        ));
        assert!(feed.validate(&args(&["https://example.com/rss"]), false).is_ok());
    }

    #[test]
    fn test_piped_forces_endless() {
        let mut settings = Settings::default();
        settings.validate(&[], true).unwrap();
        assert_eq!(settings.source, SourceKind::Piped);
        assert!(settings.endless);
        assert!(!settings.configuration().separate_samples);

        let mut settings = Settings::default();
        assert!(matches!(
            settings.validate(&args(&["file"]), true),
            Err(ConfigError::UnexpectedArguments(SourceKind::Piped))
        ));
    }

    #[test]
    fn test_engine_configuration() {
        let settings = Settings {
            squeeze_spaces: true,
            separator: "~".to_string(),
            error_style: ErrorStyle::Blink,
            speed_unit: SpeedUnit::Cps,
            ..Settings::default()
        };
        let configuration = settings.configuration();
        assert!(configuration.collapse_spaces);
        assert!(configuration.separate_samples);
        assert_eq!(configuration.separator, '~');
        assert_eq!(configuration.error_attr, Attr::Blink);
        assert_eq!(configuration.speed_unit, scribe::SpeedUnit::Cps);
        assert_eq!(ErrorStyle::Underline.to_string(), "underline");
    }
}
