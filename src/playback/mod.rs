//! Playback core: media classification, the item timer and the transport
//! state machine. Nothing in here touches the DOM.

mod machine;
mod media;
mod platform;
mod timer;

#[cfg(test)]
pub mod testing;

pub use machine::*;
pub use media::*;
pub use platform::*;
pub use timer::*;
