//! Routes of the full-page app.

use crate::components::{AppShell, FeedView, MemberSenseView};
use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq, Debug)]
#[rustfmt::skip]
pub enum AppView {
    #[layout(AppShell)]
        #[route("/")]
        FeedView {},
        #[route("/membersense")]
        MemberSenseView {},
}

pub fn view_label(view: &AppView) -> &'static str {
    match view {
        AppView::FeedView {} => "Feed Player",
        AppView::MemberSenseView {} => "MemberSense",
    }
}
