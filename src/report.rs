//! Processing report
//!
//! Built fresh on every chain run: the ordered list of stages that ran,
//! a status line, and the detector verdict for the original input.

use serde::{Deserialize, Serialize};

use crate::dsp::DetectorResult;
use crate::engine::AudioBuffer;

/// One stage that ran
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedEffect {
    /// Display name, e.g. "Compression"
    pub name: String,
    /// Stable identifier, e.g. "compressor"
    pub effect_type: String,
    /// Human-readable parameter summary
    pub parameters: String,
}

/// What the chain did to one buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub entries: Vec<AppliedEffect>,
    pub status: String,
    pub detector: DetectorResult,
}

impl ProcessingReport {
    pub(crate) fn new(entries: Vec<AppliedEffect>, detector: DetectorResult) -> Self {
        let status = match entries.len() {
            0 => "no effects enabled; input returned unchanged".to_string(),
            1 => "applied 1 effect".to_string(),
            n => format!("applied {} effects", n),
        };
        Self {
            entries,
            status,
            detector,
        }
    }

    /// Display names in the order they ran
    pub fn effect_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Multi-line text rendering for terminals
    pub fn to_text(&self) -> String {
        let mut text = format!("Status: {}\n", self.status);
        for (i, entry) in self.entries.iter().enumerate() {
            text.push_str(&format!("  {:>2}. {}: {}\n", i + 1, entry.name, entry.parameters));
        }
        text.push_str(&format!(
            "Already processed: {} ({})\n",
            if self.detector.already_processed { "likely" } else { "no" },
            self.detector.reason
        ));
        text
    }
}

/// Processed audio plus its report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub buffer: AudioBuffer,
    pub report: ProcessingReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::detect;

    fn entry(name: &str) -> AppliedEffect {
        AppliedEffect {
            name: name.to_string(),
            effect_type: name.to_lowercase(),
            parameters: "-".to_string(),
        }
    }

    #[test]
    fn test_status_lines() {
        let detector = detect(&AudioBuffer::mono(vec![], 44100));
        assert!(ProcessingReport::new(vec![], detector.clone())
            .status
            .starts_with("no effects enabled"));
        assert_eq!(
            ProcessingReport::new(vec![entry("Delay")], detector.clone()).status,
            "applied 1 effect"
        );
        assert_eq!(
            ProcessingReport::new(vec![entry("Delay"), entry("Warmth")], detector).status,
            "applied 2 effects"
        );
    }

    #[test]
    fn test_text_rendering() {
        let detector = detect(&AudioBuffer::mono(vec![], 44100));
        let report = ProcessingReport::new(vec![entry("Warmth")], detector);
        let text = report.to_text();
        assert!(text.contains("1. Warmth: -"));
        assert!(text.contains("too short to analyze"));
        assert_eq!(report.effect_names(), vec!["Warmth"]);
    }
}
