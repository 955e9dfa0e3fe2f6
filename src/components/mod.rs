//! The components module contains the router, the playback controller and
//! the per-page pieces they re-initialize.

#[cfg(target_arch = "wasm32")]
mod app;
pub mod app_view;
pub mod audio_manager;
#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod entries;
pub mod icons;
pub mod navigation;
pub mod player;
pub mod subscribe_form;
pub mod theme;
pub mod track_list;

#[cfg(target_arch = "wasm32")]
pub use app::boot;
