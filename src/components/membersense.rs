use crate::api::{
    demo_channels, demo_members, demo_messages, Channel, DataMode, Member, MemberDirectory,
    MemberSenseClient, Message,
};
use crate::components::{Icon, PlayerConfigSignal};
use chrono::Utc;
use dioxus::logger::tracing::{info, warn};
use dioxus::prelude::*;

const GRID_COLUMNS: usize = 3;
const GRID_ROWS: usize = 3;

/// Members, channels and messages shown by the dashboard, whatever their source.
#[derive(Clone, Copy)]
struct MemberSenseData {
    mode: Signal<DataMode>,
    session: Signal<Option<String>>,
    members: Signal<Vec<Member>>,
    channels: Signal<Vec<Channel>>,
    channel: Signal<Option<String>>,
    messages: Signal<Vec<Message>>,
    error: Signal<Option<String>>,
    loading: Signal<bool>,
}

impl MemberSenseData {
    fn client(&self, api: Option<String>) -> Option<MemberSenseClient> {
        let mut error = self.error;
        let Some(api) = api else {
            error.set(Some("No MemberSense API is configured.".to_string()));
            return None;
        };
        let session = self.session.peek().clone().unwrap_or_default();
        match MemberSenseClient::new(&api, &session) {
            Ok(client) => Some(client),
            Err(err) => {
                error.set(Some(err.to_string()));
                None
            }
        }
    }
}

#[component]
pub fn MemberSenseView() -> Element {
    let config = use_context::<PlayerConfigSignal>().0;
    let data = use_context_provider(|| MemberSenseData {
        mode: Signal::new(DataMode::default()),
        session: Signal::new(None),
        members: Signal::new(Vec::new()),
        channels: Signal::new(Vec::new()),
        channel: Signal::new(None),
        messages: Signal::new(Vec::new()),
        error: Signal::new(None),
        loading: Signal::new(false),
    });
    let MemberSenseData {
        mut mode,
        session,
        mut members,
        mut channels,
        mut channel,
        mut error,
        mut loading,
        ..
    } = data;

    // Reload members and channels whenever the source changes.
    use_effect(move || {
        let current = mode();
        let token = session();
        error.set(None);
        channel.set(None);
        match current {
            DataMode::Demo => {
                members.set(demo_members());
                channels.set(demo_channels(&mut rand::thread_rng()));
            }
            DataMode::Production => {
                members.set(Vec::new());
                channels.set(Vec::new());
                if token.is_none() {
                    return;
                }
                let Some(client) = data.client(config.peek().membersense_api.clone()) else {
                    return;
                };
                spawn(async move {
                    loading.set(true);
                    match client.fetch_members().await {
                        Ok(list) => {
                            info!("loaded {} members", list.len());
                            members.set(list);
                        }
                        Err(err) => {
                            warn!("member fetch failed: {err}");
                            error.set(Some(err.to_string()));
                        }
                    }
                    match client.fetch_channels().await {
                        Ok(list) => channels.set(list),
                        Err(err) => {
                            warn!("channel fetch failed: {err}");
                            error.set(Some(err.to_string()));
                        }
                    }
                    loading.set(false);
                });
            }
        }
    });

    let current_mode = mode();
    let toggle_label = current_mode.toggled().label();

    rsx! {
        div { class: "member-sense flex flex-col gap-6 max-w-5xl mx-auto",
            header { class: "flex items-center justify-between",
                h2 { class: "text-xl font-semibold", "MemberSense" }
                div { class: "flex items-center gap-3",
                    span { class: "text-sm text-zinc-400", "{current_mode.label()}" }
                    button {
                        r#type: "button",
                        class: "px-3 py-1 rounded bg-zinc-800 hover:bg-zinc-700",
                        onclick: move |_| {
                            let next = mode.peek().toggled();
                            mode.set(next);
                        },
                        "Switch to {toggle_label}"
                    }
                }
            }
            if current_mode == DataMode::Production {
                TokenForm {}
            }
            if let Some(message) = error() {
                p { class: "member-sense__error text-red-400", "{message}" }
            }
            if loading() {
                Icon { name: "loader".to_string(), class: "w-6 h-6".to_string() }
            }
            MemberShowcase {}
            ChannelViewer {}
        }
    }
}

#[component]
fn TokenForm() -> Element {
    let mut session = use_context::<MemberSenseData>().session;
    let mut draft = use_signal(String::new);
    let mut reveal = use_signal(|| false);
    let connected = session.read().is_some();

    let submit = move |_| {
        let token = draft.peek().trim().to_string();
        if token.is_empty() {
            return;
        }
        session.set(Some(token));
    };

    if connected {
        return rsx! {
            div { class: "flex items-center gap-3 text-sm",
                span { class: "text-emerald-400", "Connected with a session token." }
                button {
                    r#type: "button",
                    class: "underline text-zinc-400",
                    onclick: move |_| session.set(None),
                    "Disconnect"
                }
            }
        };
    }

    let input_type = if reveal() { "text" } else { "password" };
    let reveal_label = if reveal() { "Hide" } else { "Show" };

    rsx! {
        div { class: "token-form flex items-center gap-2",
            input {
                r#type: input_type,
                class: "flex-1 bg-zinc-900 rounded px-3 py-2",
                placeholder: "Enter session token",
                value: "{draft}",
                oninput: move |e: Event<FormData>| draft.set(e.value()),
            }
            button {
                r#type: "button",
                class: "px-2 py-2 text-zinc-400",
                onclick: move |_| {
                    let shown = reveal();
                    reveal.set(!shown);
                },
                "{reveal_label}"
            }
            button {
                r#type: "button",
                class: "px-3 py-2 rounded bg-emerald-600 hover:bg-emerald-500 disabled:opacity-40",
                disabled: draft.read().trim().is_empty(),
                onclick: submit,
                "Connect"
            }
        }
    }
}

/// Searchable member grid.
#[component]
fn MemberShowcase() -> Element {
    let members = use_context::<MemberSenseData>().members;
    let mut query = use_signal(String::new);
    let mut page = use_signal(|| 0usize);

    // New data or a new search starts from the first page.
    use_effect(move || {
        let _ = members.read().len();
        let _ = query.read().len();
        page.set(0);
    });

    let mut directory = MemberDirectory::new(members()).with_grid(GRID_COLUMNS, GRID_ROWS);
    directory.set_query(&query.read());
    let page_count = directory.page_count();
    let current_page = page().min(page_count.saturating_sub(1));
    let visible: Vec<Member> = directory
        .page(current_page)
        .into_iter()
        .cloned()
        .collect();
    let total = directory.filtered().len();
    let page_label = format!("Page {} of {}", current_page + 1, page_count.max(1));
    let prev_page = directory.prev_page(current_page);
    let next_page = directory.next_page(current_page);

    rsx! {
        section { class: "member-showcase flex flex-col gap-3",
            div { class: "flex items-center gap-2",
                Icon { name: "users".to_string(), class: "w-5 h-5".to_string() }
                h3 { class: "font-semibold", "Members ({total})" }
                div { class: "ml-auto flex items-center gap-2 bg-zinc-900 rounded px-2",
                    Icon { name: "search".to_string(), class: "w-4 h-4 text-zinc-500".to_string() }
                    input {
                        class: "bg-transparent py-1 outline-none",
                        placeholder: "Search members",
                        value: "{query}",
                        oninput: move |e: Event<FormData>| query.set(e.value()),
                    }
                }
            }
            if visible.is_empty() {
                p { class: "text-zinc-500", "No members found." }
            } else {
                div { class: "grid grid-cols-3 gap-3",
                    for member in visible {
                        div { key: "{member.id}", class: "member-card flex items-center gap-3 p-3 rounded bg-zinc-900",
                            img { class: "w-10 h-10 rounded-full", src: "{member.avatar}", alt: "{member.username}" }
                            div { class: "min-w-0",
                                p { class: "font-medium truncate", "{member.username}" }
                                p { class: "text-xs text-zinc-500 truncate", "{member.role}" }
                                if let Some(email) = member.email.clone() {
                                    p { class: "text-xs text-zinc-400 truncate", "{email}" }
                                }
                            }
                        }
                    }
                }
            }
            if page_count > 1 {
                div { class: "flex items-center justify-center gap-3",
                    button {
                        r#type: "button",
                        class: "p-1 text-zinc-400 hover:text-white",
                        onclick: move |_| page.set(prev_page),
                        Icon { name: "chevron-left".to_string(), class: "w-5 h-5".to_string() }
                    }
                    span { class: "text-sm text-zinc-400", "{page_label}" }
                    button {
                        r#type: "button",
                        class: "p-1 text-zinc-400 hover:text-white",
                        onclick: move |_| page.set(next_page),
                        Icon { name: "chevron-right".to_string(), class: "w-5 h-5".to_string() }
                    }
                }
            }
        }
    }
}

#[component]
fn ChannelViewer() -> Element {
    let config = use_context::<PlayerConfigSignal>().0;
    let data = use_context::<MemberSenseData>();
    let MemberSenseData {
        mode,
        channels,
        mut channel,
        mut messages,
        mut error,
        ..
    } = data;

    use_effect(move || {
        let Some(channel_id) = channel() else {
            messages.set(Vec::new());
            return;
        };
        match *mode.peek() {
            DataMode::Demo => {
                messages.set(demo_messages(&mut rand::thread_rng(), &channel_id, Utc::now()));
            }
            DataMode::Production => {
                let Some(client) = data.client(config.peek().membersense_api.clone()) else {
                    return;
                };
                spawn(async move {
                    match client.fetch_messages(&channel_id).await {
                        Ok(list) => messages.set(list),
                        Err(err) => {
                            warn!("message fetch for {channel_id} failed: {err}");
                            error.set(Some(err.to_string()));
                        }
                    }
                });
            }
        }
    });

    let selected = channel().unwrap_or_default();

    rsx! {
        section { class: "channel-viewer flex flex-col gap-3",
            div { class: "flex items-center gap-2",
                Icon { name: "hash".to_string(), class: "w-5 h-5".to_string() }
                h3 { class: "font-semibold", "Channels" }
                select {
                    class: "ml-auto bg-zinc-900 rounded px-2 py-1",
                    value: "{selected}",
                    onchange: move |e: Event<FormData>| {
                        let id = e.value();
                        channel.set(if id.is_empty() { None } else { Some(id) });
                    },
                    option { value: "", "Select a channel" }
                    for item in channels() {
                        option {
                            key: "{item.id}",
                            value: "{item.id}",
                            selected: item.id == selected,
                            "{item.name}"
                        }
                    }
                }
            }
            if !selected.is_empty() {
                ul { class: "flex flex-col gap-2 max-h-96 overflow-y-auto",
                    for message in messages() {
                        li { key: "{message.id}", class: "flex gap-3 p-2 rounded bg-zinc-900",
                            img { class: "w-8 h-8 rounded-full", src: "{message.author.avatar}", alt: "{message.author.name}" }
                            div {
                                p { class: "text-sm",
                                    span { class: "font-medium", "{message.author.name}" }
                                    span { class: "ml-2 text-xs text-zinc-500",
                                        {message.timestamp.format("%Y-%m-%d %H:%M").to_string()}
                                    }
                                }
                                p { class: "text-sm text-zinc-300", "{message.content}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
