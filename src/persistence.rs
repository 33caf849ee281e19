use crate::error::GameResult;
use crate::types::PlayerRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// Serialize a roster as a pretty JSON array, one flat object per player
pub fn save_roster(roster: &[PlayerRecord]) -> GameResult<String> {
    Ok(serde_json::to_string_pretty(roster)?)
}

/// Overwrite `roster` entry by entry from saved JSON.
///
/// Entries past the end of the roster are ignored. Each restored record is
/// normalised before it goes in. Returns how many players were restored.
pub fn load_roster(roster: &mut [PlayerRecord], json: &str) -> GameResult<usize> {
    let saved: Vec<PlayerRecord> = serde_json::from_str(json)?;
    if saved.len() > roster.len() {
        log::warn!(
            "save holds {} players but roster has {}, ignoring the rest",
            saved.len(),
            roster.len()
        );
    }

    let restored = saved.len().min(roster.len());
    for (slot, mut player) in roster.iter_mut().zip(saved) {
        player.normalise();
        *slot = player;
    }
    Ok(restored)
}

/// `save_<user>.json` inside `dir`.
///
/// Characters outside `[A-Za-z0-9@._+-]` become `_`, so the file always
/// lands directly in `dir`.
pub fn save_path(dir: &Path, user: &str) -> PathBuf {
    let key: String = user
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || "@._+-".contains(c) {
                c
            } else {
                '_'
            }
        })
        .collect();
    dir.join(format!("save_{}.json", key))
}

pub fn save_to_file(roster: &[PlayerRecord], path: &Path) -> GameResult<()> {
    fs::write(path, save_roster(roster)?)?;
    Ok(())
}

/// Load from `path`; a missing file restores nothing
pub fn load_from_file(roster: &mut [PlayerRecord], path: &Path) -> GameResult<usize> {
    if !path.exists() {
        log::info!("no save found at {}", path.display());
        return Ok(0);
    }
    let json = fs::read_to_string(path)?;
    load_roster(roster, &json)
}
