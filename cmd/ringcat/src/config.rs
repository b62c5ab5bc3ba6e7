//! Pipe configuration: YAML file, then command-line overrides.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Runtime settings for a ringcat session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipeConfig {
    /// Ring buffer capacity in bytes.
    pub capacity: usize,
    /// Bytes written per burst.
    pub burst: usize,
    /// Byte repeated to fill each burst.
    pub fill: char,
    /// Sleep before each burst.
    pub delay_ms: u64,
    /// Sleep after each burst.
    pub pause_ms: u64,
    /// Number of bursts. `None` runs until killed.
    pub count: Option<u64>,
    /// Log a buffer dump after every burst.
    pub dump: bool,
}

impl Default for PipeConfig {
    fn default() -> Self {
        // One byte more than the buffer holds, so every burst has to wait for
        // the drain side.
        Self {
            capacity: 4096,
            burst: 4097,
            fill: 'a',
            delay_ms: 1000,
            pause_ms: 5000,
            count: None,
            dump: false,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub capacity: Option<usize>,
    pub burst: Option<usize>,
    pub fill: Option<char>,
    pub delay_ms: Option<u64>,
    pub pause_ms: Option<u64>,
    pub count: Option<u64>,
    pub dump: bool,
}

impl PipeConfig {
    /// Loads a config from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parses a config from YAML text. Missing keys keep their defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies command-line overrides on top of this config.
    pub fn apply(mut self, overrides: &Overrides) -> Self {
        if let Some(capacity) = overrides.capacity {
            self.capacity = capacity;
        }
        if let Some(burst) = overrides.burst {
            self.burst = burst;
        }
        if let Some(fill) = overrides.fill {
            self.fill = fill;
        }
        if let Some(delay_ms) = overrides.delay_ms {
            self.delay_ms = delay_ms;
        }
        if let Some(pause_ms) = overrides.pause_ms {
            self.pause_ms = pause_ms;
        }
        if overrides.count.is_some() {
            self.count = overrides.count;
        }
        self.dump |= overrides.dump;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            bail!("capacity must be greater than 0");
        }
        if self.burst == 0 {
            bail!("burst must be greater than 0");
        }
        if !self.fill.is_ascii() {
            bail!("fill must be a single ASCII character, got {:?}", self.fill);
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    /// The bytes written on every burst.
    pub fn burst_bytes(&self) -> Vec<u8> {
        vec![self.fill as u8; self.burst]
    }
}
