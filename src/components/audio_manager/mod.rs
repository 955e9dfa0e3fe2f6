//! Audio Manager - owns the persistent media element and every playback
//! transition, independent of which page the content shell currently shows.

mod controller;
#[cfg(target_arch = "wasm32")]
mod handle;
mod media_sink;
mod seek;
mod session;
mod volume;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::*;
#[cfg(target_arch = "wasm32")]
pub use handle::*;
pub use media_sink::*;
pub use seek::*;
pub use session::*;
pub use volume::*;
