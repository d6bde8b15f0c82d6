//! Game settings; unknown values fall back to defaults.

use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::board::Mark;
use crate::error::UnknownSetting;
use crate::opponent::{Difficulty, HeuristicThresholds};

pub const DEFAULT_THINK_DELAY: Duration = Duration::from_millis(420);

const ENV_PREFIX: &str = "TTT_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The human plays A, the computer plays B.
    #[default]
    Solo,
    TwoHuman,
}

impl FromStr for Mode {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solo" | "solovsopponent" | "computer" => Ok(Mode::Solo),
            "two" | "twohuman" | "pvp" => Ok(Mode::TwoHuman),
            _ => Err(UnknownSetting::new("mode", s)),
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "play" => Ok(Difficulty::Random),
            "heuristic" | "learn" => Ok(Difficulty::Heuristic),
            "optimal" | "win" => Ok(Difficulty::Optimal),
            _ => Err(UnknownSetting::new("difficulty", s)),
        }
    }
}

impl FromStr for Mark {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "p1" | "x" => Ok(Mark::A),
            "b" | "p2" | "o" => Ok(Mark::B),
            _ => Err(UnknownSetting::new("first", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub first_mark: Mark,
    pub thresholds: HeuristicThresholds,
    pub think_delay: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            difficulty: Difficulty::default(),
            first_mark: Mark::A,
            thresholds: HeuristicThresholds::default(),
            think_delay: DEFAULT_THINK_DELAY,
        }
    }
}

impl GameConfig {
    /// Builds a config from `key=value` style pairs. Keys are `mode`,
    /// `difficulty`, `first`, `think_ms`, `block` and `soft`; unknown keys
    /// are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref().to_ascii_lowercase().as_str() {
                "mode" => config.mode = parse_or_default(value),
                "difficulty" => config.difficulty = parse_or_default(value),
                "first" => config.first_mark = parse_or(value, Mark::A),
                "think_ms" => {
                    let millis = parse_or(value, DEFAULT_THINK_DELAY.as_millis() as u64);
                    config.think_delay = Duration::from_millis(millis);
                }
                "block" => config.thresholds.block = parse_or(value, config.thresholds.block),
                "soft" => config.thresholds.soft = parse_or(value, config.thresholds.soft),
                _ => {}
            }
        }
        config.thresholds = config.thresholds.normalized();
        config
    }

    /// Reads `TTT_MODE`, `TTT_DIFFICULTY`, `TTT_FIRST`, `TTT_THINK_MS`,
    /// `TTT_BLOCK` and `TTT_SOFT`.
    pub fn from_env() -> Self {
        Self::from_pairs(std::env::vars().filter_map(|(key, value)| {
            key.strip_prefix(ENV_PREFIX)
                .map(|field| (field.to_owned(), value))
        }))
    }
}

fn parse_or_default<T>(value: &str) -> T
where
    T: FromStr + Default,
{
    parse_or(value, T::default())
}

fn parse_or<T: FromStr>(value: &str, default: T) -> T {
    value.trim().parse().unwrap_or_else(|_| {
        warn!("ignoring unrecognized setting {:?}, using default", value);
        default
    })
}
