//! Media playback state machine shared by every media kind.
//!
//! The machine owns the current index, the [`PlaybackState`] record and the one
//! [`ActiveTimer`]. Host capabilities (timers, the video element, fullscreen)
//! are injected so transitions can be driven by a simulated clock in tests.

use super::media::{MediaItem, Playlist};
use super::platform::{
    sanitize_seconds, FullscreenController, MediaError, PlayTicket, PlayerEvent, VideoElement,
};
use super::timer::{ActiveTimer, PendingTimer, Scheduler, TimerKind};
use dioxus::logger::tracing::{debug, info, warn};
use std::time::Duration;

const COMPLETION_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackOptions {
    pub image_duration: f64,
    pub clock_interval: Duration,
    pub autoplay: bool,
    pub volume: f64,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            image_duration: 4.0,
            clock_interval: Duration::from_secs(1),
            autoplay: false,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub is_playing: bool,
    pub volume: f64,
    pub is_muted: bool,
    pub elapsed: f64,
    pub duration: f64,
    pub is_full_screen: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Ready,
    Playing,
}

pub struct PlaybackMachine<S, V, F> {
    options: PlaybackOptions,
    playlist: Playlist,
    state: PlaybackState,
    timer: ActiveTimer,
    scheduler: S,
    video: V,
    fullscreen: F,
    epoch: u64,
    play_seq: u64,
    pending_play: Option<PlayTicket>,
    rejected_streak: usize,
}

impl<S, V, F> PlaybackMachine<S, V, F>
where
    S: Scheduler,
    V: VideoElement,
    F: FullscreenController,
{
    pub fn new(options: PlaybackOptions, scheduler: S, video: V, fullscreen: F) -> Self {
        let volume = if options.volume.is_finite() {
            options.volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            options,
            playlist: Playlist::empty(),
            state: PlaybackState {
                current_index: 0,
                is_playing: false,
                volume,
                is_muted: volume == 0.0,
                elapsed: 0.0,
                duration: 0.0,
                is_full_screen: false,
            },
            timer: ActiveTimer::default(),
            scheduler,
            video,
            fullscreen,
            epoch: 0,
            play_seq: 0,
            pending_play: None,
            rejected_streak: 0,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn phase(&self) -> Phase {
        if self.playlist.is_empty() {
            Phase::Idle
        } else if self.state.is_playing {
            Phase::Playing
        } else {
            Phase::Ready
        }
    }

    pub fn current_item(&self) -> Option<&MediaItem> {
        self.playlist.get(self.state.current_index)
    }

    /// True while playing or while a video play request is outstanding.
    pub fn is_active(&self) -> bool {
        self.state.is_playing || self.pending_play.is_some()
    }

    /// Upper bound of the seek slider for the current item.
    pub fn seek_range(&self) -> f64 {
        match self.current_item() {
            Some(MediaItem::Image(_)) => self.options.image_duration,
            Some(MediaItem::Video(_)) => self.state.duration,
            _ => 0.0,
        }
    }

    pub fn pending_timer(&self) -> Option<&PendingTimer> {
        self.timer.pending()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn video(&self) -> &V {
        &self.video
    }

    pub fn video_mut(&mut self) -> &mut V {
        &mut self.video
    }

    pub fn fullscreen_mut(&mut self) -> &mut F {
        &mut self.fullscreen
    }

    pub fn set_autoplay(&mut self, autoplay: bool) {
        if self.options.autoplay == autoplay {
            return;
        }
        self.options.autoplay = autoplay;
        if autoplay && !self.playlist.is_empty() && !self.is_active() {
            self.start();
        }
    }

    /// Replace the playlist. Any state tied to the previous list is dropped.
    pub fn set_playlist(&mut self, playlist: Playlist) {
        if playlist == self.playlist {
            return;
        }
        self.halt();
        self.playlist = playlist;
        self.rejected_streak = 0;
        self.state.current_index = 0;
        if self.playlist.is_empty() {
            self.reset_item_state();
            info!("playlist cleared, player idle");
            return;
        }
        info!("playlist loaded with {} items", self.playlist.len());
        self.enter_item(self.options.autoplay);
    }

    pub fn play(&mut self) {
        if self.playlist.is_empty() || self.is_active() {
            return;
        }
        self.rejected_streak = 0;
        self.start();
    }

    pub fn pause(&mut self) {
        if self.playlist.is_empty() || !self.is_active() {
            return;
        }
        match self.current_item() {
            Some(MediaItem::Image(_)) => {
                if let Some(pending) = self.timer.cancel(&mut self.scheduler) {
                    self.fold_partial_tick(pending);
                }
            }
            Some(MediaItem::Video(_)) => {
                self.timer.cancel(&mut self.scheduler);
                self.pending_play = None;
                self.video.pause();
                self.state.elapsed = sanitize_seconds(self.video.current_time());
            }
            _ => {}
        }
        self.state.is_playing = false;
    }

    pub fn toggle_play(&mut self) {
        if self.is_active() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn stop(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        self.timer.cancel(&mut self.scheduler);
        self.pending_play = None;
        if self.current_item().is_some_and(MediaItem::is_video) {
            self.video.pause();
            self.video.set_current_time(0.0);
        }
        self.state.elapsed = 0.0;
        self.state.is_playing = false;
    }

    pub fn next(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        self.rejected_streak = 0;
        let resume = self.options.autoplay || self.is_active();
        self.step(1, resume);
    }

    pub fn prev(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        self.rejected_streak = 0;
        let resume = self.options.autoplay || self.is_active();
        self.step(-1, resume);
    }

    pub fn seek(&mut self, position: f64) {
        if self.playlist.is_empty() || !position.is_finite() {
            return;
        }
        match self.current_item() {
            Some(MediaItem::Video(_)) => {
                let mut target = position.max(0.0);
                if self.state.duration > 0.0 {
                    target = target.min(self.state.duration);
                }
                self.video.set_current_time(target);
                self.state.elapsed = target;
            }
            Some(MediaItem::Image(_)) => {
                self.state.elapsed = position.clamp(0.0, self.options.image_duration);
                if self.state.is_playing {
                    self.arm_image_tick();
                }
            }
            _ => {}
        }
    }

    /// Setting a volume of zero mutes; any other value unmutes.
    pub fn set_volume(&mut self, volume: f64) {
        if self.playlist.is_empty() || !volume.is_finite() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.state.volume = volume;
        self.state.is_muted = volume == 0.0;
        self.write_audio();
    }

    pub fn toggle_mute(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        self.state.is_muted = !self.state.is_muted;
        self.write_audio();
    }

    /// Ask the platform to enter or leave fullscreen. `is_full_screen` only
    /// follows `PlayerEvent::FullscreenChanged`.
    pub fn toggle_full_screen(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        let result = if self.state.is_full_screen {
            self.fullscreen.exit()
        } else {
            self.fullscreen.request()
        };
        if let Err(err) = result {
            debug!("fullscreen toggle ignored: {err}");
        }
    }

    pub fn handle(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::TimerFired(id) => {
                let Some(fired) = self.timer.claim(id) else {
                    return;
                };
                self.on_timer(fired);
            }
            PlayerEvent::PlayResolved { ticket, outcome } => self.on_play_resolved(ticket, outcome),
            PlayerEvent::MediaEnded => {
                if self.current_item().is_some_and(MediaItem::is_video) && self.is_active() {
                    self.timer.cancel(&mut self.scheduler);
                    debug!("video ended");
                    self.step(1, true);
                }
            }
            PlayerEvent::MetadataLoaded => {
                if self.current_item().is_some_and(MediaItem::is_video) {
                    self.state.duration = sanitize_seconds(self.video.duration());
                }
            }
            PlayerEvent::VolumeChanged => {
                if self.current_item().is_some_and(MediaItem::is_video) {
                    let volume = self.video.volume();
                    if volume.is_finite() {
                        self.state.volume = volume.clamp(0.0, 1.0);
                    }
                    self.state.is_muted = self.video.muted();
                }
            }
            PlayerEvent::FullscreenChanged(active) => {
                self.state.is_full_screen = active;
            }
        }
    }

    fn on_timer(&mut self, fired: PendingTimer) {
        match fired.kind {
            TimerKind::ImageTick { base, step, .. } => {
                let duration = self.options.image_duration;
                self.state.elapsed = (base + step).min(duration);
                if duration - self.state.elapsed <= COMPLETION_EPSILON {
                    debug!("image countdown finished");
                    self.step(1, true);
                } else {
                    self.arm_image_tick();
                }
            }
            TimerKind::VideoClock => {
                self.state.elapsed = sanitize_seconds(self.video.current_time());
                let duration = sanitize_seconds(self.video.duration());
                if duration > 0.0 {
                    self.state.duration = duration;
                }
                self.arm_video_clock();
            }
        }
    }

    fn on_play_resolved(&mut self, ticket: PlayTicket, outcome: Result<(), MediaError>) {
        if self.pending_play != Some(ticket) {
            debug!("ignoring stale play outcome {ticket:?}");
            return;
        }
        self.pending_play = None;
        match outcome {
            Ok(()) => {
                self.rejected_streak = 0;
                self.state.is_playing = true;
                let duration = sanitize_seconds(self.video.duration());
                if duration > 0.0 {
                    self.state.duration = duration;
                }
                self.arm_video_clock();
            }
            Err(err) => {
                let url = self
                    .current_item()
                    .map(|item| item.descriptor().url.clone())
                    .unwrap_or_default();
                self.rejected_streak += 1;
                if self.rejected_streak >= self.playlist.len() {
                    warn!("every item refused to play, waiting for user input ({err})");
                    return;
                }
                warn!("skipping {url}: {err}");
                self.step(1, true);
            }
        }
    }

    fn start(&mut self) {
        match self.current_item() {
            Some(MediaItem::Image(_)) => {
                self.rejected_streak = 0;
                self.state.is_playing = true;
                self.arm_image_tick();
            }
            Some(MediaItem::Video(_)) => {
                if self.pending_play.is_some() {
                    return;
                }
                self.play_seq += 1;
                let ticket = PlayTicket {
                    epoch: self.epoch,
                    seq: self.play_seq,
                };
                self.pending_play = Some(ticket);
                self.video.play(ticket);
            }
            Some(MediaItem::Unsupported(item)) => {
                debug!("{} is not a playable media type", item.url);
            }
            None => {}
        }
    }

    fn step(&mut self, delta: isize, resume: bool) {
        let len = self.playlist.len();
        if len == 0 {
            return;
        }
        let index = (self.state.current_index as isize + delta).rem_euclid(len as isize) as usize;
        self.halt();
        self.state.current_index = index;
        debug!("moving to media index {index}");
        self.enter_item(resume);
    }

    /// Stop everything tied to the current item without touching the index.
    fn halt(&mut self) {
        self.timer.cancel(&mut self.scheduler);
        if self.is_active() && self.current_item().is_some_and(MediaItem::is_video) {
            self.video.pause();
        }
        self.pending_play = None;
        self.state.is_playing = false;
    }

    fn enter_item(&mut self, resume: bool) {
        self.epoch += 1;
        self.reset_item_state();
        if self.current_item().is_some_and(MediaItem::is_video) {
            self.write_audio();
        }
        if resume {
            self.start();
        }
    }

    fn reset_item_state(&mut self) {
        self.pending_play = None;
        self.state.elapsed = 0.0;
        self.state.duration = 0.0;
        self.state.is_playing = false;
    }

    fn write_audio(&mut self) {
        if self.current_item().is_some_and(MediaItem::is_video) {
            self.video.set_volume(self.state.volume);
            self.video.set_muted(self.state.is_muted);
        }
    }

    fn arm_image_tick(&mut self) {
        let base = self.state.elapsed;
        let remaining = (self.options.image_duration - base).max(0.0);
        let step = remaining.min(self.options.clock_interval.as_secs_f64());
        let started_at = self.scheduler.now();
        self.timer.arm(
            &mut self.scheduler,
            TimerKind::ImageTick {
                base,
                step,
                started_at,
            },
            Duration::from_secs_f64(step),
        );
    }

    fn arm_video_clock(&mut self) {
        let interval = self.options.clock_interval;
        self.timer
            .arm(&mut self.scheduler, TimerKind::VideoClock, interval);
    }

    fn fold_partial_tick(&mut self, pending: PendingTimer) {
        if let TimerKind::ImageTick {
            base,
            step,
            started_at,
        } = pending.kind
        {
            let spent = (self.scheduler.now() - started_at).clamp(0.0, step);
            self.state.elapsed = (base + spent).min(self.options.image_duration);
        }
    }
}

#[cfg(test)]
mod tests;
