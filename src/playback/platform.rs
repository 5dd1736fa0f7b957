//! Capabilities the playback machine needs from its host.

use super::timer::TimerId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MediaError {
    #[error("video playback was rejected: {0}")]
    PlayRejected(String),
    #[error("no video element is mounted")]
    ElementMissing,
    #[error("fullscreen request was denied: {0}")]
    FullscreenDenied(String),
}

/// Identifies one play request. Outcomes for any other ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayTicket {
    pub epoch: u64,
    pub seq: u64,
}

/// The video element bound to the current item.
pub trait VideoElement {
    /// Start playback. The outcome must come back as
    /// `PlayerEvent::PlayResolved { ticket, .. }`, never synchronously.
    fn play(&mut self, ticket: PlayTicket);
    fn pause(&mut self);
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, secs: f64);
    /// Seconds, `0.0` while unknown.
    fn duration(&self) -> f64;
    fn volume(&self) -> f64;
    fn muted(&self) -> bool;
    fn set_volume(&mut self, volume: f64);
    fn set_muted(&mut self, muted: bool);
}

pub trait FullscreenController {
    fn request(&mut self) -> Result<(), MediaError>;
    fn exit(&mut self) -> Result<(), MediaError>;
    /// Register for platform fullscreen changes, including ones the player did
    /// not initiate (Esc key).
    fn on_change(&mut self, callback: Box<dyn FnMut(bool)>);
}

/// Everything that can happen to the machine that is not a direct user command.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    TimerFired(TimerId),
    PlayResolved {
        ticket: PlayTicket,
        outcome: Result<(), MediaError>,
    },
    MediaEnded,
    MetadataLoaded,
    VolumeChanged,
    FullscreenChanged(bool),
}

/// Browsers report NaN or infinity for unknown durations.
pub fn sanitize_seconds(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
