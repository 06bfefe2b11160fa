//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::{info, warn};

use crate::dsp::{detect, MasteringChain};
use crate::engine::io::{
    export_buffer, export_render, generate_stereo_test_tone, import_buffer, load_settings,
    RenderDocument,
};
use crate::engine::AudioBuffer;
use crate::error::Result;
use crate::settings::EffectSettings;

/// Run the chain and write a render document.
pub fn process(input: &Path, settings: Option<&Path>, output: &Path, strict: bool) -> Result<()> {
    info!("Processing: {}", input.display());

    let buffer = import_buffer(input)?;
    let settings = match settings {
        Some(path) => load_settings(path)?,
        None => {
            warn!("No settings given; every effect is disabled");
            EffectSettings::default()
        }
    };
    if strict {
        settings.validate()?;
    }

    let result = MasteringChain::from_settings(&settings).process(&buffer);
    print!("{}", result.report.to_text());

    let document = RenderDocument::new(&buffer, result);
    export_render(&document, output)?;

    println!("Render written: {}", output.display());
    println!("Run id: {}", document.run_id);
    println!("Output SHA-256: {}", document.output_sha256);

    Ok(())
}

/// Write a sine test buffer.
pub fn tone(
    frequency: f32,
    amplitude: f32,
    duration: f32,
    sample_rate: u32,
    stereo: bool,
    output: &Path,
) -> Result<()> {
    let buffer = if stereo {
        generate_stereo_test_tone(frequency, amplitude, duration, sample_rate)
    } else {
        AudioBuffer::sine(frequency, amplitude, duration, sample_rate)
    };
    export_buffer(&buffer, output)?;

    println!(
        "Tone written: {} ({} Hz, {} frames)",
        output.display(),
        frequency,
        buffer.num_frames()
    );
    Ok(())
}

/// Print the detector verdict for a buffer.
pub fn detect_processed(input: &Path) -> Result<()> {
    let buffer = import_buffer(input)?;
    let result = detect(&buffer);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Print a settings template.
pub fn print_settings(all: bool) -> Result<()> {
    let settings = if all {
        EffectSettings::all_enabled()
    } else {
        EffectSettings::default()
    };
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::io::import_render;
    use crate::engine::io::save_settings;
    use crate::error::MasterError;
    use tempfile::tempdir;

    #[test]
    fn test_tone_then_process() {
        let dir = tempdir().unwrap();
        let tone_path = dir.path().join("tone.json");
        let settings_path = dir.path().join("settings.json");
        let render_path = dir.path().join("render.json");

        tone(440.0, 0.5, 0.05, 44100, true, &tone_path).unwrap();
        save_settings(&EffectSettings::all_enabled(), &settings_path).unwrap();
        process(&tone_path, Some(&settings_path), &render_path, true).unwrap();

        let document = import_render(&render_path).unwrap();
        assert_eq!(document.report.entries.len(), 15);
        assert_eq!(document.buffer.num_channels(), 2);
        assert!(document.verify());
    }

    #[test]
    fn test_strict_rejects_out_of_range() {
        let dir = tempdir().unwrap();
        let tone_path = dir.path().join("tone.json");
        let settings_path = dir.path().join("settings.json");
        let render_path = dir.path().join("render.json");

        tone(440.0, 0.5, 0.01, 44100, false, &tone_path).unwrap();
        let mut settings = EffectSettings::default();
        settings.master_gain.enabled = true;
        settings.master_gain.gain_db = 60.0;
        save_settings(&settings, &settings_path).unwrap();

        let strict = process(&tone_path, Some(&settings_path), &render_path, true);
        assert!(matches!(strict, Err(MasterError::InvalidParameter { .. })));
        assert!(!render_path.exists());

        // lenient mode clamps and carries on
        process(&tone_path, Some(&settings_path), &render_path, false).unwrap();
        assert!(render_path.exists());
    }
}
