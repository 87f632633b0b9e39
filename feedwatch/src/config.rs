use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{error::ConfigError, palette::Palette, run::LoopSettings};

/// Command line, with an environment fallback for every flag.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "feedwatch",
    version,
    about = "Tail a JSON-lines message feed and chart it by hour and category"
)]
pub struct Config {
    /// JSON-lines file to follow
    #[arg(long, env = "FEEDWATCH_FILE", default_value = "data/project_live.json")]
    pub file: PathBuf,

    /// How long to sleep when no new line is available
    #[arg(
        long,
        env = "FEEDWATCH_POLL_MS",
        default_value_t = 500,
        value_parser = clap::value_parser!(u64).range(10..)
    )]
    pub poll_interval_ms: u64,

    /// Minimum time between two redraws
    #[arg(long, env = "FEEDWATCH_REDRAW_MS", default_value_t = 100)]
    pub min_redraw_ms: u64,

    /// TOML file replacing the default category palette
    #[arg(long, env = "FEEDWATCH_PALETTE")]
    pub palette: Option<PathBuf>,

    /// Directory for feedwatch.log
    #[arg(long, env = "FEEDWATCH_LOG_DIR", default_value = ".")]
    pub log_dir: PathBuf,

    /// Log level used when RUST_LOG is unset
    #[arg(long, env = "FEEDWATCH_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log summaries instead of drawing the chart
    #[arg(long)]
    pub headless: bool,
}

impl Config {
    pub fn settings(&self) -> LoopSettings {
        LoopSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            min_redraw: Duration::from_millis(self.min_redraw_ms),
        }
    }

    pub fn palette(&self) -> Result<Palette, ConfigError> {
        match &self.palette {
            Some(path) => Palette::load(path),
            None => Ok(Palette::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        Config::try_parse_from(std::iter::once("feedwatch").chain(args.iter().copied()))
    }

    #[test]
    fn test_flags() {
        let config = parse(&[
            "--file",
            "/tmp/feed.json",
            "--poll-interval-ms",
            "250",
            "--min-redraw-ms",
            "0",
            "--headless",
        ])
        .unwrap();

        assert_eq!(config.file, PathBuf::from("/tmp/feed.json"));
        assert!(config.headless);
        assert_eq!(
            config.settings(),
            LoopSettings {
                poll_interval: Duration::from_millis(250),
                min_redraw: Duration::ZERO,
            }
        );
    }

    #[test]
    fn test_poll_interval_has_a_floor() {
        assert!(parse(&["--poll-interval-ms", "5"]).is_err());
        assert!(parse(&["--poll-interval-ms", "10"]).is_ok());
    }

    #[test]
    fn test_palette_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[category]]\nname = \"tech\"\ncolor = \"blue\"").unwrap();

        let path = file.path().to_str().unwrap();
        let palette = parse(&["--palette", path]).unwrap().palette().unwrap();
        assert_eq!(palette.len(), 1);
        assert!(palette.contains("tech"));
    }

    #[test]
    fn test_missing_palette_file() {
        let config = parse(&["--palette", "/nonexistent/palette.toml"]).unwrap();
        assert!(matches!(config.palette(), Err(ConfigError::Read { .. })));
    }
}
