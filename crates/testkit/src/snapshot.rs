//! Golden-file JSON snapshots.
//!
//! Values are rendered as pretty JSON with object keys in sorted order, so a
//! golden only changes when the captured data does. Set
//! `MARIONETTE_UPDATE_SNAPSHOTS=1` to rewrite goldens instead of comparing.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Environment variable that switches snapshot asserts into update mode.
pub const UPDATE_SNAPSHOTS_ENV: &str = "MARIONETTE_UPDATE_SNAPSHOTS";

/// Compare `value` against the golden JSON at `path`.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let actual = render(value)?;

    if update_requested() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return fs::write(path, &actual)
            .with_context(|| format!("Failed to write snapshot {}", path.display()));
    }

    let expected = fs::read_to_string(path).with_context(|| {
        format!(
            "Snapshot missing at {} (run with {}=1 to create it)",
            path.display(),
            UPDATE_SNAPSHOTS_ENV
        )
    })?;

    match first_difference(&expected, &actual) {
        None => Ok(()),
        Some((line, want, got)) => anyhow::bail!(
            "Snapshot mismatch at {}:{}\n  expected: {}\n  actual:   {}\n(run with {}=1 to update)",
            path.display(),
            line,
            want,
            got,
            UPDATE_SNAPSHOTS_ENV
        ),
    }
}

/// Pretty JSON with sorted keys and a trailing newline.
pub fn render<T: Serialize>(value: &T) -> Result<String> {
    // serde_json's default map is ordered, so a round trip through `Value`
    // sorts every object's keys.
    let value = serde_json::to_value(value).context("Failed to serialize snapshot value")?;
    let mut text = serde_json::to_string_pretty(&value).context("Failed to format snapshot")?;
    text.push('\n');
    Ok(text)
}

fn update_requested() -> bool {
    matches!(
        std::env::var(UPDATE_SNAPSHOTS_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn first_difference<'a>(expected: &'a str, actual: &'a str) -> Option<(usize, &'a str, &'a str)> {
    let mut want = expected.lines();
    let mut got = actual.lines();
    let mut line = 1;
    loop {
        match (want.next(), got.next()) {
            (None, None) => return None,
            (a, b) if a == b => line += 1,
            (a, b) => return Some((line, a.unwrap_or("<eof>"), b.unwrap_or("<eof>"))),
        }
    }
}
