//! Preview-image discovery within a mod's `About` folder.

use crate::traits::DirEntry;

const PREVIEW_PREFIX: &str = "preview";
const PREVIEW_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

/// Picks the preview image from a directory listing, matching
/// `preview*.{png,jpg,jpeg}` case-insensitively.
///
/// The upstream listing order is unspecified, so the lexicographically
/// smallest matching lowercased name wins to keep selection deterministic.
pub fn find_preview_image(entries: &[DirEntry]) -> Option<String> {
    entries
        .iter()
        .filter(|e| e.is_file && is_preview_name(&e.name))
        .min_by_key(|e| e.name.to_lowercase())
        .map(|e| e.path.clone())
}

fn is_preview_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.starts_with(PREVIEW_PREFIX)
        && PREVIEW_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_file: bool) -> DirEntry {
        DirEntry {
            name: name.to_string(),
            path: format!("Mod/About/{name}"),
            is_file,
        }
    }

    #[test]
    fn matches_case_insensitively() {
        let entries = vec![entry("Preview.PNG", true)];
        assert_eq!(
            find_preview_image(&entries).as_deref(),
            Some("Mod/About/Preview.PNG")
        );
    }

    #[test]
    fn picks_lexicographically_smallest() {
        let entries = vec![
            entry("preview_b.png", true),
            entry("Preview_a.jpg", true),
            entry("preview_c.jpeg", true),
        ];
        assert_eq!(
            find_preview_image(&entries).as_deref(),
            Some("Mod/About/Preview_a.jpg")
        );
    }

    #[test]
    fn ignores_directories_and_non_matches() {
        let entries = vec![
            entry("preview.png", false),
            entry("about.xml", true),
            entry("preview.gif", true),
            entry("art_preview.png", true),
        ];
        assert_eq!(find_preview_image(&entries), None);
    }
}
