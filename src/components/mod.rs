//! The components module contains all shared components for our app.

mod app;
mod app_view;
mod embed;
mod feed_player;
mod icons;
mod membersense;

pub use app::*;
pub use app_view::*;
pub use embed::*;
pub use feed_player::*;
pub use icons::*;
pub use membersense::*;
