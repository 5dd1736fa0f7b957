//! Data sources: the media feed spreadsheet and the MemberSense backend.

pub mod feed;
pub mod membersense;

pub use feed::{load_catalog, FeedCatalog};
pub use membersense::{
    demo_channels, demo_members, demo_messages, Channel, DataMode, Member, MemberDirectory,
    MemberSenseClient, Message,
};
