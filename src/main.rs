use dioxus::prelude::*;

mod api;
mod components;
mod playback;
mod settings;
mod utils;

use components::AppView;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

fn main() {
    dioxus::logger::initialize_default();

    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        components::define_widget_element();
        if let Some(root) = components::prepare_widget_host() {
            LaunchBuilder::web()
                .with_cfg(dioxus::web::Config::new().rootname(root))
                .launch(Widget);
            return;
        }
    }

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Meta { name: "theme-color", content: "#18181b" }
        document::Stylesheet { href: APP_CSS }

        Router::<AppView> {}
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
#[component]
fn Widget() -> Element {
    rsx! {
        document::Stylesheet { href: APP_CSS }
        components::WidgetRoot {}
    }
}
