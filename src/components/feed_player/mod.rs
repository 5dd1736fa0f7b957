use crate::components::{FeedPlaylistSignal, PlayerConfigSignal};
use crate::playback::{FullscreenController, MediaItem, PlaybackMachine, PlayerEvent};
#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
use dioxus::prelude::*;
use futures_util::StreamExt;

mod controls;
mod web_platform;

use controls::{FullscreenButton, SeekBar, TransportButtons, VolumeControl};
pub use web_platform::*;

/// The playback machine shared with the control components.
#[derive(Clone, Copy)]
pub struct PlayerHandle(pub Signal<WebPlaybackMachine>);

#[component]
pub fn FeedPlayer() -> Element {
    let config = use_context::<PlayerConfigSignal>().0;
    let playlist = use_context::<FeedPlaylistSignal>().0;
    let sink = use_hook(EventSink::default);

    let mut machine = use_signal({
        let sink = sink.clone();
        move || {
            let options = config.peek().playback_options();
            PlaybackMachine::new(
                options,
                WebScheduler::new(sink.clone()),
                WebVideo::new(sink.clone(), options.volume),
                WebFullscreen::new(),
            )
        }
    });

    let events = use_coroutine(move |mut rx: UnboundedReceiver<PlayerEvent>| async move {
        while let Some(event) = rx.next().await {
            machine.write().handle(event);
        }
    });
    use_hook({
        let sink = sink.clone();
        move || sink.connect(events)
    });
    use_context_provider(|| PlayerHandle(machine));

    // Fullscreen can also be left with Esc, so the machine listens for it.
    use_effect({
        let sink = sink.clone();
        move || {
            let sink = sink.clone();
            #[cfg(target_arch = "wasm32")]
            let runtime = Runtime::current();
            machine
                .write()
                .fullscreen_mut()
                .on_change(Box::new(move |active| {
                    #[cfg(target_arch = "wasm32")]
                    let _guard = RuntimeGuard::new(runtime.clone());
                    sink.send(PlayerEvent::FullscreenChanged(active));
                }));
        }
    });

    use_effect(move || {
        let next = playlist();
        machine.write().set_playlist(next);
    });

    use_effect(move || {
        let autoplay = config().autoplay;
        machine.write().set_autoplay(autoplay);
    });

    let snapshot = machine.read();
    let state = *snapshot.state();
    let item = snapshot.current_item().cloned();
    drop(snapshot);

    let Some(item) = item else {
        return rsx! {
            div {
                id: CONTAINER_ELEMENT_ID,
                class: "feed-player flex items-center justify-center text-zinc-400",
                "Loading..."
            }
        };
    };

    let title = item.descriptor().display_title().to_string();
    let text = item.descriptor().display_text().to_string();
    let container_class = if state.is_full_screen {
        "feed-player feed-player--fullscreen"
    } else {
        "feed-player"
    };

    rsx! {
        div { id: CONTAINER_ELEMENT_ID, class: "{container_class}",
            div { class: "feed-player__stage",
                match item {
                    MediaItem::Image(ref image) => rsx! {
                        img {
                            key: "{state.current_index}",
                            class: "feed-player__media",
                            src: "{image.url}",
                            alt: "{title}",
                        }
                    },
                    MediaItem::Video(ref video) => rsx! {
                        video {
                            key: "{state.current_index}",
                            id: VIDEO_ELEMENT_ID,
                            class: "feed-player__media",
                            src: "{video.url}",
                            preload: "metadata",
                            onloadeddata: move |_| {
                                let mut machine = machine.write();
                                machine.video().sync_audio();
                                machine.handle(PlayerEvent::MetadataLoaded);
                            },
                            ondurationchange: move |_| machine.write().handle(PlayerEvent::MetadataLoaded),
                            onended: move |_| machine.write().handle(PlayerEvent::MediaEnded),
                            onvolumechange: move |_| machine.write().handle(PlayerEvent::VolumeChanged),
                        }
                    },
                    MediaItem::Unsupported(ref other) => rsx! {
                        div { class: "feed-player__media feed-player__unsupported",
                            p { "This media type cannot be played." }
                            a { href: "{other.url}", target: "_blank", rel: "noopener", "{other.url}" }
                        }
                    },
                }
            }
            div { class: "feed-player__overlay",
                h2 { class: "feed-player__title", "{title}" }
                p { class: "feed-player__text", "{text}" }
            }
            div { class: "feed-player__controls",
                TransportButtons {}
                SeekBar {}
                VolumeControl {}
                FullscreenButton {}
            }
        }
    }
}
