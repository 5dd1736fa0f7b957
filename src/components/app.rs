use crate::api::{load_catalog, FeedCatalog};
use crate::components::{
    host_config, page_config, use_autoplay_attribute, view_label, AppView, FeedPlayer,
};
use crate::playback::Playlist;
use crate::settings::PlayerConfig;
use dioxus::logger::tracing::{info, warn};
use dioxus::prelude::*;

#[derive(Clone, Copy)]
pub struct PlayerConfigSignal(pub Signal<PlayerConfig>);

/// Playlist currently handed to the player.
#[derive(Clone, Copy)]
pub struct FeedPlaylistSignal(pub Signal<Playlist>);

/// The loaded catalog and which of its feeds is playing.
#[derive(Clone, Copy)]
pub struct FeedSelection {
    catalog: Signal<Option<FeedCatalog>>,
    selected: Signal<Option<String>>,
    playlist: Signal<Playlist>,
}

impl FeedSelection {
    /// Switch feeds by name or key. The player resets to the first item.
    pub fn select(mut self, name_or_key: &str) {
        let entry = self
            .catalog
            .peek()
            .as_ref()
            .and_then(|catalog| catalog.find(name_or_key))
            .cloned();
        let Some(entry) = entry else {
            warn!("unknown feed {name_or_key}");
            return;
        };
        if self.selected.peek().as_deref() == Some(entry.key.as_str()) {
            return;
        }
        info!("switching to feed {}", entry.name);
        self.selected.set(Some(entry.key));
        self.playlist.set(entry.playlist);
    }
}

/// Provide the config, playlist and feed contexts, then load the catalog.
fn use_feed_contexts(load_config: fn() -> PlayerConfig) -> Signal<PlayerConfig> {
    let config = use_signal(load_config);
    let playlist = use_signal(Playlist::empty);
    let mut catalog = use_signal(|| None::<FeedCatalog>);
    let mut selected = use_signal(|| None::<String>);
    let mut playlist_out = playlist;

    use_context_provider(|| PlayerConfigSignal(config));
    use_context_provider(|| FeedPlaylistSignal(playlist));
    use_context_provider(|| FeedSelection {
        catalog,
        selected,
        playlist,
    });

    use_effect(move || {
        spawn(async move {
            let (feed_url, requested) = {
                let config = config.peek();
                (config.feed_url.clone(), config.feed.clone())
            };
            let loaded = load_catalog(feed_url.as_deref()).await;
            let initial = loaded.initial(requested.as_deref()).cloned();
            catalog.set(Some(loaded));
            if let Some(entry) = initial {
                selected.set(Some(entry.key));
                playlist_out.set(entry.playlist);
            }
        });
    });

    config
}

/// Dropdown listing every feed in the catalog.
#[component]
pub fn FeedSelector() -> Element {
    let selection = use_context::<FeedSelection>();
    let catalog = selection.catalog.read();
    let Some(catalog) = catalog.as_ref() else {
        return rsx! {};
    };
    if catalog.feeds().len() < 2 {
        return rsx! {};
    }
    let selected = (selection.selected)().unwrap_or_default();

    rsx! {
        select {
            class: "feed-selector bg-zinc-900 text-zinc-200 rounded px-2 py-1",
            value: "{selected}",
            onchange: move |e: Event<FormData>| selection.select(&e.value()),
            for feed in catalog.feeds() {
                option {
                    key: "{feed.key}",
                    value: "{feed.key}",
                    selected: feed.key == selected,
                    "{feed.name}"
                }
            }
        }
    }
}

/// Root used when mounted inside `<feed-player-widget>`.
#[component]
pub fn WidgetRoot() -> Element {
    let config = use_feed_contexts(host_config);
    use_autoplay_attribute(config);

    rsx! {
        div { class: "feed-player-widget",
            FeedSelector {}
            FeedPlayer {}
        }
    }
}

/// Layout for the full page: navigation plus the routed view.
#[component]
pub fn AppShell() -> Element {
    use_feed_contexts(page_config);
    let current_view = use_route::<AppView>();
    let tabs: Vec<(AppView, &'static str, &'static str)> =
        [AppView::FeedView {}, AppView::MemberSenseView {}]
            .into_iter()
            .map(|view| {
                let class = if view == current_view {
                    "text-white font-semibold"
                } else {
                    "text-zinc-400 hover:text-white"
                };
                let label = view_label(&view);
                (view, label, class)
            })
            .collect();

    rsx! {
        div { class: "app-shell min-h-screen bg-zinc-950 text-zinc-100",
            nav { class: "flex items-center gap-4 px-4 py-3 border-b border-zinc-800",
                for (view, label, class) in tabs {
                    Link { key: "{label}", to: view, class: class.to_string(), "{label}" }
                }
            }
            main { class: "p-4", Outlet::<AppView> {} }
        }
    }
}

#[component]
pub fn FeedView() -> Element {
    rsx! {
        div { class: "flex flex-col gap-3 max-w-4xl mx-auto",
            FeedSelector {}
            FeedPlayer {}
        }
    }
}
