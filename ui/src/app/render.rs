use crate::error::AppResult;
use engine::{MarkerMap, SkippedRoot, ThemeSet};
use serde::Serialize;
use std::io::{self, Write};

/// First menu item; choosing it rescans the theme roots
pub const REFRESH_LABEL: &str = "Refresh Icon List…";
pub const SEPARATOR: &str = "──────────────────";
pub const ACTIVE_MARK: char = '✓';
pub const EMPTY_LABEL: &str = "(no icon themes found)";

pub fn render_menu<W: Write>(markers: &MarkerMap, out: &mut W) -> io::Result<()> {
    writeln!(out, "{REFRESH_LABEL}")?;
    writeln!(out, "{SEPARATOR}")?;

    if markers.is_empty() {
        writeln!(out, "  {EMPTY_LABEL}")?;
    }
    for entry in markers.iter() {
        let mark = if entry.marker.is_active() { ACTIVE_MARK } else { ' ' };
        writeln!(out, "{mark} {}", entry.name)?;
    }
    Ok(())
}

pub fn render_list<W: Write>(themes: &ThemeSet, out: &mut W) -> io::Result<()> {
    for name in themes {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

pub fn render_skipped<W: Write>(skipped: &[SkippedRoot], out: &mut W) -> io::Result<()> {
    for root in skipped {
        writeln!(out, "skipped {}: {}", root.path.display(), root.reason)?;
    }
    Ok(())
}

pub fn write_json<T, W>(value: &T, out: &mut W) -> AppResult<()>
where
    T: Serialize + ?Sized,
    W: Write,
{
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn rendered(markers: &MarkerMap) -> String {
        let mut out = Vec::new();
        render_menu(markers, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_menu_checks_active_entry() {
        let set = ThemeSet::from_names(["Breeze", "Adwaita"]);
        let text = rendered(&MarkerMap::reconcile(&set, "Breeze"));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], REFRESH_LABEL);
        assert_eq!(lines[2], "  Adwaita");
        assert_eq!(lines[3], "✓ Breeze");
    }

    #[test]
    fn test_empty_menu_keeps_refresh_entry() {
        let text = rendered(&MarkerMap::default());
        assert!(text.starts_with(REFRESH_LABEL));
        assert!(text.contains(EMPTY_LABEL));
    }

    #[test]
    fn test_skipped_roots_name_path_and_reason() {
        let mut out = Vec::new();
        let skipped = [SkippedRoot {
            path: PathBuf::from("/missing"),
            reason: "No such file or directory".to_string(),
        }];
        render_skipped(&skipped, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "skipped /missing: No such file or directory\n"
        );
    }

    #[test]
    fn test_json_markers() {
        let set = ThemeSet::from_names(["Adwaita"]);
        let mut out = Vec::new();
        write_json(&MarkerMap::reconcile(&set, "Adwaita"), &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["name"], "Adwaita");
        assert_eq!(value[0]["marker"], "active");
    }
}
