//! Hosting the player inside a `<feed-player-widget>` element on a third-party
//! page, and reading its configuration. `<video-player-widget>` is accepted as
//! an alias for pages embedding the older tag.

use crate::settings::PlayerConfig;
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
#[cfg(target_arch = "wasm32")]
use dioxus::logger::tracing::{info, warn};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};
#[cfg(target_arch = "wasm32")]
use web_sys::{window, CustomEvent, Element};

pub const WIDGET_TAGS: [&str; 2] = ["feed-player-widget", "video-player-widget"];
pub const WIDGET_ROOT_ID: &str = "feed-player-widget-root";
/// Fired on the host element when its `autoplay` attribute changes.
pub const AUTOPLAY_EVENT: &str = "feed-player-autoplay";
/// `<script type="application/json">` block read when running as a full page.
pub const PAGE_CONFIG_ID: &str = "feed-player-config";

/// CSS selector matching any accepted widget tag, in document order.
#[cfg(any(target_arch = "wasm32", test))]
fn widget_selector() -> String {
    WIDGET_TAGS.join(", ")
}

/// Script registering one custom element class under `tag`, once per page.
#[cfg(any(target_arch = "wasm32", test))]
fn element_definition(tag: &str) -> String {
    format!(
        r#"
(() => {{
  if (customElements.get("{tag}")) {{
    return true;
  }}
  customElements.define("{tag}", class extends HTMLElement {{
    static get observedAttributes() {{
      return ["autoplay"];
    }}
    attributeChangedCallback(name, oldValue, newValue) {{
      if (oldValue === newValue) return;
      const enabled = newValue !== null && newValue.toLowerCase() !== "false";
      this.dispatchEvent(new CustomEvent("{AUTOPLAY_EVENT}", {{ detail: enabled }}));
    }}
  }});
  return true;
}})()
"#
    )
}

#[cfg(target_arch = "wasm32")]
fn widget_host() -> Option<Element> {
    window()?
        .document()?
        .query_selector(&widget_selector())
        .ok()
        .flatten()
}

/// Register the custom element classes.
#[cfg(target_arch = "wasm32")]
pub fn define_widget_element() {
    for tag in WIDGET_TAGS {
        if let Err(err) = js_sys::eval(&element_definition(tag)) {
            warn!("could not define <{tag}>: {err:?}");
        }
    }
}

/// Id of the element the widget should mount into, if the page has one.
/// Only the first widget on a page is mounted.
#[cfg(target_arch = "wasm32")]
pub fn prepare_widget_host() -> Option<String> {
    let host = widget_host()?;
    if host.id().is_empty() {
        host.set_id(WIDGET_ROOT_ID);
    }
    info!(
        "mounting feed player into <{} id=\"{}\">",
        host.tag_name().to_lowercase(),
        host.id()
    );
    Some(host.id())
}

/// Settings from the host element's attributes.
#[cfg(target_arch = "wasm32")]
pub fn host_config() -> PlayerConfig {
    let Some(host) = widget_host() else {
        return PlayerConfig::default();
    };
    let attributes: Vec<(String, Option<String>)> = host
        .get_attribute_names()
        .iter()
        .filter_map(|name| name.as_string())
        .map(|name| {
            let value = host.get_attribute(&name);
            (name, value)
        })
        .collect();
    PlayerConfig::from_attributes(
        attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref())),
    )
}

#[cfg(not(target_arch = "wasm32"))]
pub fn host_config() -> PlayerConfig {
    PlayerConfig::default()
}

/// Settings for the full page, from an inline JSON block when present.
#[cfg(target_arch = "wasm32")]
pub fn page_config() -> PlayerConfig {
    let raw = window()
        .and_then(|w| w.document())
        .and_then(|doc| doc.get_element_by_id(PAGE_CONFIG_ID))
        .and_then(|el| el.text_content());
    match raw {
        Some(raw) => PlayerConfig::from_json(&raw).unwrap_or_else(|err| {
            warn!("{err}, using defaults");
            PlayerConfig::default()
        }),
        None => PlayerConfig::default(),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn page_config() -> PlayerConfig {
    PlayerConfig::default()
}

/// Keep `config.autoplay` in step with the host element's attribute.
pub fn use_autoplay_attribute(config: Signal<PlayerConfig>) {
    #[cfg(target_arch = "wasm32")]
    use_effect(move || {
        let Some(host) = widget_host() else {
            return;
        };
        let runtime = Runtime::current();
        let mut config = config;
        let listener = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let _guard = RuntimeGuard::new(runtime.clone());
            let Some(enabled) = event
                .dyn_ref::<CustomEvent>()
                .and_then(|custom| custom.detail().as_bool())
            else {
                return;
            };
            if config.peek().autoplay != enabled {
                info!("autoplay attribute changed to {enabled}");
                config.write().autoplay = enabled;
            }
        }) as Box<dyn FnMut(_)>);
        if let Err(err) =
            host.add_event_listener_with_callback(AUTOPLAY_EVENT, listener.as_ref().unchecked_ref())
        {
            warn!("could not watch the autoplay attribute: {err:?}");
        }
        listener.forget();
    });

    #[cfg(not(target_arch = "wasm32"))]
    let _ = config;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matches_current_and_legacy_tags() {
        assert_eq!(widget_selector(), "feed-player-widget, video-player-widget");
    }

    #[test]
    fn each_tag_gets_its_own_guarded_definition() {
        for tag in WIDGET_TAGS {
            let script = element_definition(tag);
            assert!(script.contains(&format!(r#"customElements.get("{tag}")"#)));
            assert!(script.contains(&format!(r#"customElements.define("{tag}", class"#)));
            assert!(script.contains(AUTOPLAY_EVENT));
        }
    }
}
