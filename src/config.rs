use std::time::Duration;

use itertools::Itertools;

use crate::{demos, error::ConfigError};

/// Demo name that runs every scenario in order.
pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub demo: String,
    /// Simulated latency per produced element.
    pub delay: Duration,
    pub list: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demo: ALL.to_string(),
            delay: Duration::ZERO,
            list: false,
        }
    }
}

impl Config {
    /// Parses `[DEMO] [--delay-ms N] [--list]`, program name excluded.
    pub fn from_args<I, A>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--list" => config.list = true,
                "--delay-ms" => {
                    let value = args
                        .next()
                        .ok_or_else(|| ConfigError::MissingValue { flag: arg.clone() })?;
                    config.delay = parse_delay(&value)?;
                }
                flag if flag.starts_with("--") => {
                    return Err(ConfigError::UnknownFlag {
                        flag: flag.to_string(),
                    })
                }
                name => config.demo = name.to_string(),
            }
        }
        if config.demo != ALL && !demos::names().any(|name| name == config.demo) {
            return Err(ConfigError::UnknownDemo {
                name: config.demo,
                known: demos::names().join(", "),
            });
        }
        Ok(config)
    }
}

fn parse_delay(value: &str) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidDelay {
            value: value.to_string(),
        })
}
