use std::fs;
use std::process::Command;

use anyhow::{Context, Result};
use tempfile::tempdir;

#[test]
fn binary_dumps_manifest_and_event_log() -> Result<()> {
    let temp_dir = tempdir().context("creating temporary artefact directory")?;
    let events_path = temp_dir.path().join("events.json");
    let content_path = temp_dir.path().join("content.json");

    let status = Command::new(env!("CARGO_BIN_EXE_veil_engine"))
        .args([
            "--seed",
            "3",
            "--event-log-json",
            events_path.to_str().context("event log path is not UTF-8")?,
            "--content-json",
            content_path.to_str().context("manifest path is not UTF-8")?,
        ])
        .status()
        .context("executing veil_engine playthrough")?;
    assert!(status.success(), "veil_engine exited with {status:?}");

    let events: Vec<String> = serde_json::from_str(
        &fs::read_to_string(&events_path).context("reading event log JSON")?,
    )
    .context("parsing event log JSON")?;
    assert!(events.iter().any(|l| l == "town.ready"));
    assert!(events.iter().any(|l| l == "mission.state headedToApartments"));

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(&content_path).context("reading manifest JSON")?,
    )
    .context("parsing manifest JSON")?;
    let npcs = manifest["npcs"]
        .as_array()
        .context("manifest has no npcs array")?;
    assert_eq!(npcs.len(), 7);
    assert_eq!(
        manifest["introVideo"]["src"],
        "videos/toTitleA_medium.mp4"
    );
    Ok(())
}
