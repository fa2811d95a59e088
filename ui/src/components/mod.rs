mod file_loader;
mod playback_controls;
pub mod stats;

pub use file_loader::load_trip;
pub use playback_controls::PlaybackControls;
