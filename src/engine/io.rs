//! Buffer and settings I/O for masterchain
//!
//! Buffers travel as JSON (`{"sample_rate": .., "samples": [[..], ..]}`)
//! with full f32 precision; container codecs live outside this crate.
//! A render document bundles the processed buffer with its report and
//! checksums of the input and output samples.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::buffer::AudioBuffer;
use crate::error::Result;
use crate::report::{ProcessingReport, ProcessingResult};
use crate::settings::EffectSettings;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Load an audio buffer from a JSON file
///
/// # Errors
/// * `Io` - If the file cannot be opened
/// * `Serialization` - If the document is malformed or its channels are ragged
pub fn import_buffer(path: &Path) -> Result<AudioBuffer> {
    let buffer: AudioBuffer = read_json(path)?;
    info!(
        "Imported {}: {} ch, {} frames @ {} Hz",
        path.display(),
        buffer.num_channels(),
        buffer.num_frames(),
        buffer.sample_rate()
    );
    Ok(buffer)
}

/// Write an audio buffer to a JSON file
pub fn export_buffer(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    write_json(buffer, path)?;
    info!("Exported {} frames to {}", buffer.num_frames(), path.display());
    Ok(())
}

/// Load effect settings; missing sections fall back to defaults
pub fn load_settings(path: &Path) -> Result<EffectSettings> {
    let settings: EffectSettings = read_json(path)?;
    debug!(
        "Loaded settings from {} ({} effects enabled)",
        path.display(),
        settings.enabled_count()
    );
    Ok(settings)
}

/// Write effect settings as pretty JSON
pub fn save_settings(settings: &EffectSettings, path: &Path) -> Result<()> {
    write_json(settings, path)
}

/// SHA-256 over every sample as little-endian f32 bytes, channel by channel
pub fn buffer_sha256(buffer: &AudioBuffer) -> String {
    let mut hasher = Sha256::new();
    for sample in buffer.iter_samples() {
        hasher.update(sample.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Everything one `process` run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderDocument {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub input_sha256: String,
    pub output_sha256: String,
    pub report: ProcessingReport,
    pub buffer: AudioBuffer,
}

impl RenderDocument {
    /// Wrap a chain result with a fresh run id and checksums
    pub fn new(input: &AudioBuffer, result: ProcessingResult) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            input_sha256: buffer_sha256(input),
            output_sha256: buffer_sha256(&result.buffer),
            report: result.report,
            buffer: result.buffer,
        }
    }

    /// True when the stored buffer still matches its checksum
    pub fn verify(&self) -> bool {
        buffer_sha256(&self.buffer) == self.output_sha256
    }
}

/// Write a render document
pub fn export_render(document: &RenderDocument, path: &Path) -> Result<()> {
    write_json(document, path)?;
    info!("Wrote render {} to {}", document.run_id, path.display());
    Ok(())
}

/// Read a render document back
pub fn import_render(path: &Path) -> Result<RenderDocument> {
    read_json(path)
}

/// Generate a stereo test tone (same signal on both channels)
pub fn generate_stereo_test_tone(
    frequency: f32,
    amplitude: f32,
    duration_secs: f32,
    sample_rate: u32,
) -> AudioBuffer {
    let mono = AudioBuffer::sine(frequency, amplitude, duration_secs, sample_rate);
    AudioBuffer::silence(2, mono.num_frames(), mono.sample_rate())
        .map_channels(|_| mono.channel(0).to_vec())
}
