use std::num::ParseIntError;

use thiserror::Error;

pub const SEED_VAR: &str = "TETRIS_SEED";
pub const PALETTE_VAR: &str = "TETRIS_PALETTE";
const COLORTERM_VAR: &str = "COLORTERM";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TETRIS_SEED must be an unsigned integer, got {value:?}")]
    InvalidSeed {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("TETRIS_PALETTE must be `ansi` or `rgb`, got {0:?}")]
    InvalidPalette(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ColorMode {
    #[default]
    Ansi,
    Rgb,
}

/// `TETRIS_SEED` fixes the piece sequence. `TETRIS_PALETTE` (`ansi` | `rgb`)
/// overrides detection from `COLORTERM`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Settings {
    pub seed: Option<u64>,
    pub color_mode: ColorMode,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let seed = match lookup(SEED_VAR) {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|source| ConfigError::InvalidSeed { value, source })?,
            ),
            None => None,
        };

        let color_mode = match lookup(PALETTE_VAR) {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "ansi" => ColorMode::Ansi,
                "rgb" => ColorMode::Rgb,
                _ => return Err(ConfigError::InvalidPalette(value)),
            },
            None => detect_color_mode(lookup(COLORTERM_VAR).as_deref()),
        };

        Ok(Self { seed, color_mode })
    }
}

fn detect_color_mode(colorterm: Option<&str>) -> ColorMode {
    match colorterm {
        Some("truecolor") | Some("24bit") => ColorMode::Rgb,
        _ => ColorMode::Ansi,
    }
}
