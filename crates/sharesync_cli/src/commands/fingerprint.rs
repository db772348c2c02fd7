//! Fingerprint command implementation.

use serde::Serialize;
use sharesync_state::{StateResult, StateSnapshot};
use std::path::Path;

/// Fingerprint of one snapshot document.
#[derive(Debug, Serialize)]
pub struct FingerprintReport {
    /// Source file.
    pub file: String,
    /// Fingerprint as eight hex digits.
    pub fingerprint: String,
    /// Fingerprint as a signed 32-bit value.
    pub raw: i32,
    /// Occupied slots.
    pub items: usize,
    /// Active effects.
    pub effects: usize,
}

/// Runs the fingerprint command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read snapshot {:?}: {}", path, e))?;
    let mut report = fingerprint_document(&source)
        .map_err(|e| format!("Invalid snapshot {:?}: {}", path, e))?;
    report.file = path.display().to_string();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("{}  {}", report.fingerprint, report.file);
            println!("  items {}  effects {}", report.items, report.effects);
        }
    }

    Ok(())
}

/// Decodes a snapshot document and reports its fingerprint.
pub fn fingerprint_document(source: &str) -> StateResult<FingerprintReport> {
    let snapshot = StateSnapshot::from_json(source)?;
    let items = snapshot.contents().iter().flatten().count()
        + snapshot.inventory().armor.iter().flatten().count()
        + usize::from(snapshot.offhand().is_some());

    Ok(FingerprintReport {
        file: String::new(),
        fingerprint: snapshot.fingerprint().to_string(),
        raw: snapshot.fingerprint().as_raw(),
        items,
        effects: snapshot.effects().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot() {
        let json = StateSnapshot::default().to_json_pretty().unwrap();
        let report = fingerprint_document(&json).unwrap();
        assert_eq!(report.fingerprint, "406d6a97");
        assert_eq!(report.raw, 0x406d6a97);
        assert_eq!(report.items, 0);
    }

    #[test]
    fn test_stored_fingerprint_is_ignored() {
        let snapshot = StateSnapshot::default();
        let json = snapshot.to_json_pretty().unwrap();
        let tampered = json.replace(
            &format!("\"fingerprint\": {}", snapshot.fingerprint().as_raw()),
            "\"fingerprint\": 12345",
        );
        let report = fingerprint_document(&tampered).unwrap();
        assert_eq!(report.fingerprint, snapshot.fingerprint().to_string());
    }

    #[test]
    fn test_invalid_document() {
        assert!(fingerprint_document("{\"vitals\": 3}").is_err());
        assert!(fingerprint_document("not json").is_err());
    }
}
