use crate::playback::PlaybackOptions;
use dioxus::logger::tracing::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MIN_CLOCK_INTERVAL_MS: u32 = 50;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid player config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("attribute `{attribute}` expects a number, got `{value}`")]
    NotANumber { attribute: String, value: String },
    #[error("attribute `{attribute}` is out of range: {value}")]
    OutOfRange { attribute: String, value: f64 },
}

/// Player settings, read from the embedding element or a JSON blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub autoplay: bool,
    pub image_duration_secs: f64,
    pub clock_interval_ms: u32,
    pub volume: f64,
    /// Endpoint returning the feed spreadsheet rows as JSON.
    pub feed_url: Option<String>,
    /// Feed selected on startup.
    pub feed: Option<String>,
    /// Base url of the MemberSense backend.
    pub membersense_api: Option<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            autoplay: false,
            image_duration_secs: 4.0,
            clock_interval_ms: 1000,
            volume: 1.0,
            feed_url: None,
            feed: None,
            membersense_api: None,
        }
    }
}

impl PlayerConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Apply one attribute of `<feed-player-widget>`. `None` means the
    /// attribute is absent. Unknown attributes are ignored.
    pub fn apply_attribute(&mut self, name: &str, value: Option<&str>) -> Result<(), ConfigError> {
        match name {
            "autoplay" => self.autoplay = boolean_attribute(value),
            "image-duration" => {
                if let Some(value) = value {
                    let secs = parse_number(name, value)?;
                    if secs <= 0.0 {
                        return Err(ConfigError::OutOfRange {
                            attribute: name.to_string(),
                            value: secs,
                        });
                    }
                    self.image_duration_secs = secs;
                }
            }
            "clock-interval-ms" => {
                if let Some(value) = value {
                    let ms = parse_number(name, value)?;
                    if ms < MIN_CLOCK_INTERVAL_MS as f64 || ms > u32::MAX as f64 {
                        return Err(ConfigError::OutOfRange {
                            attribute: name.to_string(),
                            value: ms,
                        });
                    }
                    self.clock_interval_ms = ms as u32;
                }
            }
            "volume" => {
                if let Some(value) = value {
                    let volume = parse_number(name, value)?;
                    if !(0.0..=1.0).contains(&volume) {
                        return Err(ConfigError::OutOfRange {
                            attribute: name.to_string(),
                            value: volume,
                        });
                    }
                    self.volume = volume;
                }
            }
            "feed-url" => self.feed_url = non_empty(value),
            "feed" => self.feed = non_empty(value),
            "membersense-api" => self.membersense_api = non_empty(value),
            _ => {}
        }
        Ok(())
    }

    /// Build a config from element attributes, skipping invalid values.
    pub fn from_attributes<'a, I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut config = Self::default();
        for (name, value) in attributes {
            if let Err(err) = config.apply_attribute(name, value) {
                warn!("ignoring attribute: {err}");
            }
        }
        config
    }

    pub fn playback_options(&self) -> PlaybackOptions {
        let image_duration = if self.image_duration_secs.is_finite() && self.image_duration_secs > 0.0
        {
            self.image_duration_secs
        } else {
            PlaybackOptions::default().image_duration
        };
        PlaybackOptions {
            image_duration,
            clock_interval: Duration::from_millis(
                self.clock_interval_ms.max(MIN_CLOCK_INTERVAL_MS) as u64
            ),
            autoplay: self.autoplay,
            volume: self.volume,
        }
    }
}

/// HTML boolean attribute: present means on, except an explicit "false".
pub fn boolean_attribute(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(raw) => !raw.trim().eq_ignore_ascii_case("false"),
    }
}

fn parse_number(attribute: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ConfigError::NotANumber {
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
