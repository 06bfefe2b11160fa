//! Audio Engine Module
//!
//! - Audio buffer type and level measurements
//! - JSON I/O for buffers, settings and render documents

pub mod buffer;
pub mod io;

pub use buffer::AudioBuffer;
pub use io::{
    buffer_sha256, export_buffer, export_render, generate_stereo_test_tone, import_buffer,
    import_render, load_settings, save_settings, RenderDocument,
};
