//! Data sources the player reads from: the track catalog, page fragments
//! served by the static host, and the subscribe endpoint.

pub mod models;
pub mod pages;
pub mod subscribe;

pub use models::*;
pub use pages::*;
