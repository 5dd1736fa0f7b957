use super::PlayerHandle;
use crate::components::Icon;
use crate::utils::format_clock;
use dioxus::prelude::*;

const BUTTON_CLASS: &str =
    "p-2 text-zinc-300 hover:text-white transition-colors disabled:opacity-40";

/// Previous, play/pause, stop and next.
#[component]
pub(super) fn TransportButtons() -> Element {
    let mut machine = use_context::<PlayerHandle>().0;
    let is_active = machine.read().is_active();
    let play_title = if is_active { "Pause" } else { "Play" };

    rsx! {
        div { class: "flex items-center gap-2",
            button {
                id: "feed-prev-btn",
                r#type: "button",
                class: BUTTON_CLASS,
                title: "Previous",
                onclick: move |_| machine.write().prev(),
                Icon { name: "prev".to_string(), class: "w-5 h-5".to_string() }
            }
            button {
                id: "feed-play-pause-btn",
                r#type: "button",
                class: "w-10 h-10 rounded-full bg-white flex items-center justify-center hover:scale-105 transition-transform shadow-lg",
                title: play_title,
                onclick: move |_| machine.write().toggle_play(),
                if is_active {
                    Icon { name: "pause".to_string(), class: "w-5 h-5 text-black".to_string() }
                } else {
                    Icon { name: "play".to_string(), class: "w-5 h-5 text-black ml-0.5".to_string() }
                }
            }
            button {
                id: "feed-stop-btn",
                r#type: "button",
                class: BUTTON_CLASS,
                title: "Stop",
                onclick: move |_| machine.write().stop(),
                Icon { name: "stop".to_string(), class: "w-5 h-5".to_string() }
            }
            button {
                id: "feed-next-btn",
                r#type: "button",
                class: BUTTON_CLASS,
                title: "Next",
                onclick: move |_| machine.write().next(),
                Icon { name: "next".to_string(), class: "w-5 h-5".to_string() }
            }
        }
    }
}

#[component]
pub(super) fn SeekBar() -> Element {
    let mut machine = use_context::<PlayerHandle>().0;
    let (elapsed, range) = {
        let machine = machine.read();
        (machine.state().elapsed, machine.seek_range())
    };
    let position = elapsed.min(range);
    let elapsed_label = format_clock(elapsed);
    let range_label = if range > 0.0 {
        format_clock(range)
    } else {
        "--:--".to_string()
    };

    let on_seek = move |e: Event<FormData>| {
        if let Ok(position) = e.value().parse::<f64>() {
            machine.write().seek(position);
        }
    };

    rsx! {
        div { class: "flex items-center gap-2 flex-1",
            span { class: "text-xs text-zinc-400 w-10 text-right", "{elapsed_label}" }
            input {
                r#type: "range",
                min: "0",
                max: "{range}",
                step: "0.1",
                value: "{position}",
                disabled: range <= 0.0,
                class: "flex-1 h-1.5 bg-zinc-800 rounded-full appearance-none cursor-pointer accent-emerald-500",
                oninput: on_seek,
            }
            span { class: "text-xs text-zinc-400 w-10", "{range_label}" }
        }
    }
}

#[component]
pub(super) fn VolumeControl() -> Element {
    let mut machine = use_context::<PlayerHandle>().0;
    let state = *machine.read().state();
    let shown = if state.is_muted { 0.0 } else { state.volume };
    let (mute_title, mute_icon) = if state.is_muted {
        ("Unmute", "mute")
    } else {
        ("Mute", "volume")
    };

    let on_volume_change = move |e: Event<FormData>| {
        if let Ok(value) = e.value().parse::<f64>() {
            machine.write().set_volume((value / 100.0).clamp(0.0, 1.0));
        }
    };

    rsx! {
        div { class: "flex items-center gap-2",
            button {
                r#type: "button",
                class: BUTTON_CLASS,
                title: mute_title,
                onclick: move |_| machine.write().toggle_mute(),
                Icon { name: mute_icon.to_string(), class: "w-5 h-5".to_string() }
            }
            input {
                r#type: "range",
                min: "0",
                max: "100",
                value: (shown * 100.0).round() as i32,
                class: "w-24 h-1.5 bg-zinc-800 rounded-full appearance-none cursor-pointer accent-zinc-400",
                oninput: on_volume_change,
            }
        }
    }
}

#[component]
pub(super) fn FullscreenButton() -> Element {
    let mut machine = use_context::<PlayerHandle>().0;
    let is_full_screen = machine.read().state().is_full_screen;
    let (title, icon) = if is_full_screen {
        ("Exit fullscreen", "minimize")
    } else {
        ("Fullscreen", "maximize")
    };

    rsx! {
        button {
            r#type: "button",
            class: BUTTON_CLASS,
            title,
            onclick: move |_| machine.write().toggle_full_screen(),
            Icon { name: icon.to_string(), class: "w-5 h-5".to_string() }
        }
    }
}
