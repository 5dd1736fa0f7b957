use dioxus::prelude::*;

/// Inline SVG icon. Unknown names render a plain circle.
#[component]
pub fn Icon(name: String, class: String) -> Element {
    let solid = matches!(name.as_str(), "play" | "pause" | "prev" | "next" | "stop");
    let shapes = match name.as_str() {
        "play" => rsx! {
            polygon { points: "5 3 19 12 5 21 5 3" }
        },
        "pause" => rsx! {
            rect { x: "6", y: "4", width: "4", height: "16" }
            rect { x: "14", y: "4", width: "4", height: "16" }
        },
        "stop" => rsx! {
            rect { x: "5", y: "5", width: "14", height: "14", rx: "1" }
        },
        "prev" => rsx! {
            polygon { points: "19 20 9 12 19 4 19 20" }
            line { x1: "5", y1: "19", x2: "5", y2: "5", stroke: "currentColor", stroke_width: "2" }
        },
        "next" => rsx! {
            polygon { points: "5 4 15 12 5 20 5 4" }
            line { x1: "19", y1: "5", x2: "19", y2: "19", stroke: "currentColor", stroke_width: "2" }
        },
        "volume" => rsx! {
            polygon { points: "11 5 6 9 2 9 2 15 6 15 11 19 11 5" }
            path { d: "M15.54 8.46a5 5 0 0 1 0 7.07" }
            path { d: "M19.07 4.93a10 10 0 0 1 0 14.14" }
        },
        "mute" => rsx! {
            polygon { points: "11 5 6 9 2 9 2 15 6 15 11 19 11 5" }
            line { x1: "23", y1: "9", x2: "17", y2: "15" }
            line { x1: "17", y1: "9", x2: "23", y2: "15" }
        },
        "maximize" => rsx! {
            path { d: "M8 3H5a2 2 0 0 0-2 2v3m18 0V5a2 2 0 0 0-2-2h-3m0 18h3a2 2 0 0 0 2-2v-3M3 16v3a2 2 0 0 0 2 2h3" }
        },
        "minimize" => rsx! {
            path { d: "M8 3v3a2 2 0 0 1-2 2H3m18 0h-3a2 2 0 0 1-2-2V3m0 18v-3a2 2 0 0 1 2-2h3M3 16h3a2 2 0 0 1 2 2v3" }
        },
        "search" => rsx! {
            circle { cx: "11", cy: "11", r: "8" }
            path { d: "M21 21l-4.35-4.35" }
        },
        "users" => rsx! {
            path { d: "M17 21v-2a4 4 0 0 0-4-4H5a4 4 0 0 0-4 4v2" }
            circle { cx: "9", cy: "7", r: "4" }
            path { d: "M23 21v-2a4 4 0 0 0-3-3.87" }
            path { d: "M16 3.13a4 4 0 0 1 0 7.75" }
        },
        "hash" => rsx! {
            line { x1: "4", y1: "9", x2: "20", y2: "9" }
            line { x1: "4", y1: "15", x2: "20", y2: "15" }
            line { x1: "10", y1: "3", x2: "8", y2: "21" }
            line { x1: "16", y1: "3", x2: "14", y2: "21" }
        },
        "chevron-left" => rsx! {
            polyline { points: "15 18 9 12 15 6" }
        },
        "chevron-right" => rsx! {
            polyline { points: "9 18 15 12 9 6" }
        },
        "loader" => rsx! {
            circle { cx: "12", cy: "12", r: "10", opacity: "0.25" }
            path { d: "M12 2a10 10 0 0 1 10 10", opacity: "0.75" }
        },
        _ => rsx! {
            circle { cx: "12", cy: "12", r: "10" }
        },
    };
    let class = if name == "loader" {
        format!("{class} animate-spin")
    } else {
        class
    };

    if solid {
        rsx! {
            svg { class: "{class}", view_box: "0 0 24 24", fill: "currentColor", {shapes} }
        }
    } else {
        rsx! {
            svg {
                class: "{class}",
                view_box: "0 0 24 24",
                fill: "none",
                stroke: "currentColor",
                stroke_width: "2",
                {shapes}
            }
        }
    }
}
