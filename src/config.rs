//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::layout::{DEFAULT_BORDER_WIDTH, DEFAULT_CELL_PITCH, DEFAULT_CLEAR_MARGIN, Layout};

pub const DEFAULT_SERVER_URL: &str = "ws://localhost:9000";
pub const DEFAULT_USERNAME: &str = "anonymous";
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 800;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("server URL must start with ws:// or wss://, got '{0}'")]
    InvalidServerUrl(String),
    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("PIXELROOM_CELL_PITCH must be greater than zero")]
    ZeroCellPitch,
}

/// Size of the window the grid is drawn into, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: DEFAULT_VIEWPORT_WIDTH, height: DEFAULT_VIEWPORT_HEIGHT }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: String,
    pub username: String,
    /// Viewport the grid is first sized from, and reset to on room creation.
    pub viewport: Viewport,
    pub layout: Layout,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            username: DEFAULT_USERNAME.to_owned(),
            viewport: Viewport::default(),
            layout: Layout::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// All optional:
    /// - `PIXELROOM_SERVER_URL`: default `ws://localhost:9000`
    /// - `PIXELROOM_USERNAME`: default `anonymous`
    /// - `PIXELROOM_VIEWPORT_WIDTH` / `PIXELROOM_VIEWPORT_HEIGHT`: default 800 x 600
    /// - `PIXELROOM_BORDER_WIDTH`: default 4
    /// - `PIXELROOM_CELL_PITCH`: default 10, must be nonzero
    /// - `PIXELROOM_CLEAR_MARGIN`: default 25
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-WebSocket URL, an unparsable number, or
    /// a zero cell pitch.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    /// Same as [`ClientConfig::from_env`] with a caller-supplied variable source.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let server_url = lookup("PIXELROOM_SERVER_URL")
            .map_or_else(|| DEFAULT_SERVER_URL.to_owned(), |url| url.trim().to_owned());
        validate_server_url(&server_url)?;

        let username = lookup("PIXELROOM_USERNAME")
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_USERNAME.to_owned());

        let viewport = Viewport {
            width: parse_u32(&lookup, "PIXELROOM_VIEWPORT_WIDTH", DEFAULT_VIEWPORT_WIDTH)?,
            height: parse_u32(&lookup, "PIXELROOM_VIEWPORT_HEIGHT", DEFAULT_VIEWPORT_HEIGHT)?,
        };
        let layout = Layout {
            border_width: parse_u32(&lookup, "PIXELROOM_BORDER_WIDTH", DEFAULT_BORDER_WIDTH)?,
            cell_pitch: parse_u32(&lookup, "PIXELROOM_CELL_PITCH", DEFAULT_CELL_PITCH)?,
            clear_margin: parse_u32(&lookup, "PIXELROOM_CLEAR_MARGIN", DEFAULT_CLEAR_MARGIN)?,
        };
        if layout.cell_pitch == 0 {
            return Err(ConfigError::ZeroCellPitch);
        }

        Ok(Self { server_url, username, viewport, layout })
    }
}

/// Reject anything that is not a WebSocket URL.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidServerUrl`] when the scheme is not `ws` or `wss`.
pub fn validate_server_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("ws://") || url.starts_with("wss://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidServerUrl(url.to_owned()))
    }
}

fn env_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

fn parse_u32(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: u32) -> Result<u32, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidNumber { var, value: raw })
}
