// Browser implementations of the playback machine's host capabilities.
use crate::playback::{
    FullscreenController, MediaError, PlayTicket, PlaybackMachine, PlayerEvent, Scheduler,
    TimerId, VideoElement,
};
use dioxus::core::Task;
use dioxus::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use dioxus::logger::tracing::warn;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{window, Document, HtmlVideoElement};

pub const VIDEO_ELEMENT_ID: &str = "feed-player-video";
pub const CONTAINER_ELEMENT_ID: &str = "feed-player-container";

pub type WebPlaybackMachine = PlaybackMachine<WebScheduler, WebVideo, WebFullscreen>;

/// Shared handle to the coroutine that feeds events back into the machine.
/// Connected once the coroutine exists; sends before that are dropped.
#[derive(Clone, Default)]
pub struct EventSink(Rc<RefCell<Option<Coroutine<PlayerEvent>>>>);

impl EventSink {
    pub fn connect(&self, events: Coroutine<PlayerEvent>) {
        *self.0.borrow_mut() = Some(events);
    }

    pub fn send(&self, event: PlayerEvent) {
        if let Some(events) = self.0.borrow().as_ref() {
            events.send(event);
        }
    }
}

pub struct WebScheduler {
    sink: EventSink,
    current: Option<(TimerId, Task)>,
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
}

impl WebScheduler {
    pub fn new(sink: EventSink) -> Self {
        Self {
            sink,
            current: None,
            #[cfg(not(target_arch = "wasm32"))]
            origin: std::time::Instant::now(),
        }
    }
}

impl Scheduler for WebScheduler {
    #[cfg(target_arch = "wasm32")]
    fn now(&self) -> f64 {
        window()
            .and_then(|w| w.performance())
            .map(|performance| performance.now() / 1000.0)
            .unwrap_or(0.0)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn schedule(&mut self, id: TimerId, delay: Duration) {
        // At most one timer is ever pending, so whatever sat in the slot has
        // already fired or been cancelled.
        let sink = self.sink.clone();
        let millis = delay.as_millis().min(u32::MAX as u128) as u32;
        let task = spawn(async move {
            sleep_ms(millis).await;
            sink.send(PlayerEvent::TimerFired(id));
        });
        self.current = Some((id, task));
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some((pending, task)) = self.current.take() {
            if pending == id {
                task.cancel();
            } else {
                self.current = Some((pending, task));
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
async fn sleep_ms(millis: u32) {
    gloo_timers::future::TimeoutFuture::new(millis).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep_ms(_millis: u32) {
    futures_util::future::pending::<()>().await;
}

/// The play request that may still start the element. A deferred `play()`
/// checks it first, so a pause issued in between keeps the element paused.
#[derive(Clone, Default)]
pub struct PlayGate(Rc<Cell<Option<PlayTicket>>>);

impl PlayGate {
    pub fn open(&self, ticket: PlayTicket) {
        self.0.set(Some(ticket));
    }

    pub fn close(&self) {
        self.0.set(None);
    }

    pub fn admits(&self, ticket: PlayTicket) -> bool {
        self.0.get() == Some(ticket)
    }
}

/// The `<video>` element rendered with [`VIDEO_ELEMENT_ID`].
///
/// The element is looked up on every call because it is re-rendered per item.
/// Audio settings are remembered and re-applied when a fresh element appears.
pub struct WebVideo {
    sink: EventSink,
    gate: PlayGate,
    volume: f64,
    muted: bool,
}

impl WebVideo {
    pub fn new(sink: EventSink, volume: f64) -> Self {
        Self {
            sink,
            gate: PlayGate::default(),
            volume,
            muted: volume == 0.0,
        }
    }

    /// Push the remembered volume and mute flag onto the current element.
    pub fn sync_audio(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(video) = video_element() {
            video.set_volume(self.volume);
            video.set_muted(self.muted);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn video_element() -> Option<HtmlVideoElement> {
    window()?
        .document()?
        .get_element_by_id(VIDEO_ELEMENT_ID)?
        .dyn_into::<HtmlVideoElement>()
        .ok()
}

#[cfg(target_arch = "wasm32")]
fn describe_js_error(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.name()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "unknown error".to_string())
}

#[cfg(target_arch = "wasm32")]
async fn play_element(volume: f64, muted: bool) -> Result<(), MediaError> {
    let video = video_element().ok_or(MediaError::ElementMissing)?;
    video.set_volume(volume);
    video.set_muted(muted);
    let promise = video
        .play()
        .map_err(|err| MediaError::PlayRejected(describe_js_error(&err)))?;
    wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|err| MediaError::PlayRejected(describe_js_error(&err)))
}

#[cfg(target_arch = "wasm32")]
impl VideoElement for WebVideo {
    fn play(&mut self, ticket: PlayTicket) {
        let sink = self.sink.clone();
        let gate = self.gate.clone();
        gate.open(ticket);
        let (volume, muted) = (self.volume, self.muted);
        spawn(async move {
            // Let the element for a freshly selected item render first.
            gloo_timers::future::TimeoutFuture::new(0).await;
            if !gate.admits(ticket) {
                return;
            }
            let outcome = play_element(volume, muted).await;
            sink.send(PlayerEvent::PlayResolved { ticket, outcome });
        });
    }

    fn pause(&mut self) {
        self.gate.close();
        if let Some(video) = video_element() {
            if let Err(err) = video.pause() {
                warn!("pause failed: {}", describe_js_error(&err));
            }
        }
    }

    fn current_time(&self) -> f64 {
        video_element().map(|v| v.current_time()).unwrap_or(0.0)
    }

    fn set_current_time(&mut self, secs: f64) {
        if let Some(video) = video_element() {
            video.set_current_time(secs);
        }
    }

    fn duration(&self) -> f64 {
        video_element().map(|v| v.duration()).unwrap_or(0.0)
    }

    fn volume(&self) -> f64 {
        video_element().map(|v| v.volume()).unwrap_or(self.volume)
    }

    fn muted(&self) -> bool {
        video_element().map(|v| v.muted()).unwrap_or(self.muted)
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        if let Some(video) = video_element() {
            video.set_volume(volume);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(video) = video_element() {
            video.set_muted(muted);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl VideoElement for WebVideo {
    fn play(&mut self, ticket: PlayTicket) {
        self.gate.open(ticket);
        self.sink.send(PlayerEvent::PlayResolved {
            ticket,
            outcome: Err(MediaError::ElementMissing),
        });
    }

    fn pause(&mut self) {
        self.gate.close();
    }

    fn current_time(&self) -> f64 {
        0.0
    }

    fn set_current_time(&mut self, _secs: f64) {}

    fn duration(&self) -> f64 {
        0.0
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

/// Fullscreen for the player container, tracked through `fullscreenchange`.
#[derive(Default)]
pub struct WebFullscreen {
    #[cfg(target_arch = "wasm32")]
    listener: Option<Closure<dyn FnMut()>>,
}

impl WebFullscreen {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(target_arch = "wasm32")]
fn document() -> Option<Document> {
    window()?.document()
}

#[cfg(target_arch = "wasm32")]
impl FullscreenController for WebFullscreen {
    fn request(&mut self) -> Result<(), MediaError> {
        let container = document()
            .and_then(|doc| doc.get_element_by_id(CONTAINER_ELEMENT_ID))
            .ok_or(MediaError::ElementMissing)?;
        container
            .request_fullscreen()
            .map_err(|err| MediaError::FullscreenDenied(describe_js_error(&err)))
    }

    fn exit(&mut self) -> Result<(), MediaError> {
        if let Some(doc) = document() {
            doc.exit_fullscreen();
        }
        Ok(())
    }

    fn on_change(&mut self, mut callback: Box<dyn FnMut(bool)>) {
        let Some(doc) = document() else {
            return;
        };
        self.remove_listener();
        let watched = doc.clone();
        let listener = Closure::wrap(Box::new(move || {
            callback(watched.fullscreen_element().is_some());
        }) as Box<dyn FnMut()>);
        if let Err(err) =
            doc.add_event_listener_with_callback("fullscreenchange", listener.as_ref().unchecked_ref())
        {
            warn!("could not watch fullscreen changes: {}", describe_js_error(&err));
            return;
        }
        self.listener = Some(listener);
    }
}

#[cfg(target_arch = "wasm32")]
impl WebFullscreen {
    fn remove_listener(&mut self) {
        if let (Some(listener), Some(doc)) = (self.listener.take(), document()) {
            let _ = doc.remove_event_listener_with_callback(
                "fullscreenchange",
                listener.as_ref().unchecked_ref(),
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for WebFullscreen {
    fn drop(&mut self) {
        self.remove_listener();
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl FullscreenController for WebFullscreen {
    fn request(&mut self) -> Result<(), MediaError> {
        Err(MediaError::FullscreenDenied(
            "fullscreen needs a browser".to_string(),
        ))
    }

    fn exit(&mut self) -> Result<(), MediaError> {
        Ok(())
    }

    fn on_change(&mut self, _callback: Box<dyn FnMut(bool)>) {}
}
