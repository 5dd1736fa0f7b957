//! Test doubles for the playback machine: a simulated clock and recording
//! video/fullscreen capabilities.

use super::machine::{PlaybackMachine, PlaybackOptions};
use super::media::{MediaDescriptor, Playlist};
use super::platform::{FullscreenController, MediaError, PlayTicket, PlayerEvent, VideoElement};
use super::timer::{Scheduler, TimerId};
use std::collections::BTreeMap;
use std::time::Duration;

pub type TestMachine = PlaybackMachine<FakeScheduler, FakeVideo, FakeFullscreen>;

#[derive(Debug, Default)]
pub struct FakeScheduler {
    pub now: f64,
    pending: BTreeMap<TimerId, f64>,
    pub cancelled: Vec<TimerId>,
}

impl FakeScheduler {
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Deadline of the only pending timer, if any.
    pub fn next_deadline(&self) -> Option<f64> {
        self.pending.values().copied().reduce(f64::min)
    }

    fn pop_due(&mut self, until: f64) -> Option<(TimerId, f64)> {
        let (id, at) = self
            .pending
            .iter()
            .filter(|(_, at)| **at <= until + 1e-9)
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(id, at)| (*id, *at))?;
        self.pending.remove(&id);
        Some((id, at))
    }
}

impl Scheduler for FakeScheduler {
    fn now(&self) -> f64 {
        self.now
    }

    fn schedule(&mut self, id: TimerId, delay: Duration) {
        self.pending.insert(id, self.now + delay.as_secs_f64());
    }

    fn cancel(&mut self, id: TimerId) {
        if self.pending.remove(&id).is_some() {
            self.cancelled.push(id);
        }
    }
}

#[derive(Debug)]
pub struct FakeVideo {
    pub play_requests: Vec<PlayTicket>,
    pub pause_calls: usize,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
}

impl Default for FakeVideo {
    fn default() -> Self {
        Self {
            play_requests: Vec::new(),
            pause_calls: 0,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            muted: false,
        }
    }
}

impl FakeVideo {
    pub fn last_ticket(&self) -> Option<PlayTicket> {
        self.play_requests.last().copied()
    }
}

impl VideoElement for FakeVideo {
    fn play(&mut self, ticket: PlayTicket) {
        self.play_requests.push(ticket);
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, secs: f64) {
        self.current_time = secs;
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

#[derive(Default)]
pub struct FakeFullscreen {
    pub requests: usize,
    pub exits: usize,
    pub deny: bool,
    callback: Option<Box<dyn FnMut(bool)>>,
}

impl FakeFullscreen {
    /// Simulate the platform reporting a fullscreen change.
    pub fn emit(&mut self, active: bool) {
        if let Some(callback) = self.callback.as_mut() {
            callback(active);
        }
    }
}

impl FullscreenController for FakeFullscreen {
    fn request(&mut self) -> Result<(), MediaError> {
        self.requests += 1;
        if self.deny {
            return Err(MediaError::FullscreenDenied("not allowed".to_string()));
        }
        Ok(())
    }

    fn exit(&mut self) -> Result<(), MediaError> {
        self.exits += 1;
        Ok(())
    }

    fn on_change(&mut self, callback: Box<dyn FnMut(bool)>) {
        self.callback = Some(callback);
    }
}

pub fn machine(options: PlaybackOptions) -> TestMachine {
    PlaybackMachine::new(
        options,
        FakeScheduler::default(),
        FakeVideo::default(),
        FakeFullscreen::default(),
    )
}

pub fn playlist(urls: &[&str]) -> Playlist {
    urls.iter()
        .map(|url| MediaDescriptor::new(*url, *url, ""))
        .collect()
}

/// Run the simulated clock forward, firing due timers in deadline order.
pub fn advance(machine: &mut TestMachine, secs: f64) {
    let until = machine.scheduler().now + secs;
    while let Some((id, at)) = machine.scheduler_mut().pop_due(until) {
        machine.scheduler_mut().now = at;
        machine.handle(PlayerEvent::TimerFired(id));
    }
    machine.scheduler_mut().now = until;
}

pub fn resolve_play(machine: &mut TestMachine, outcome: Result<(), MediaError>) {
    let ticket = machine
        .video()
        .last_ticket()
        .expect("a play request should be pending");
    machine.handle(PlayerEvent::PlayResolved { ticket, outcome });
}
