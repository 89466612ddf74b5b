//! Division and link-list discovery.
//!
//! Directory listings are taken as complete snapshots before anything is
//! written, so images produced by a run are never picked up as input.

use crate::core::Storage;
use crate::domain::model::Division;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Which files in a marker directory count as link lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkListSelector {
    /// Exact file name, e.g. `beacons.txt`.
    FileName(String),
    /// Any file with this extension, written `*.txt`.
    Extension(String),
}

impl LinkListSelector {
    pub fn parse(value: &str) -> Self {
        match value.strip_prefix("*.") {
            Some(ext) => Self::Extension(ext.to_string()),
            None => Self::FileName(value.to_string()),
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            Self::FileName(name) => file_name == name,
            Self::Extension(ext) => Path::new(file_name)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext)),
        }
    }
}

/// Immediate subdirectories of `root`, sorted by name.
pub async fn discover_divisions<S: Storage>(
    storage: &S,
    root: &Path,
    marker_dir: &str,
) -> Result<Vec<Division>> {
    let entries = storage.list_dir(root).await?;

    Ok(entries
        .into_iter()
        .filter(|entry| entry.is_dir)
        .map(|entry| Division {
            marker_dir: entry.path.join(marker_dir),
            name: entry.name,
        })
        .collect())
}

/// Link-list files inside a division's marker directory, sorted by name.
pub async fn discover_link_lists<S: Storage>(
    storage: &S,
    division: &Division,
    selector: &LinkListSelector,
) -> Result<Vec<PathBuf>> {
    let entries = storage.list_dir(&division.marker_dir).await?;

    Ok(entries
        .into_iter()
        .filter(|entry| !entry.is_dir && selector.matches(&entry.name))
        .map(|entry| entry.path)
        .collect())
}

/// Qualifying lines of a link list as `(line_number, url)`, in file order.
///
/// Blank lines and lines whose first non-whitespace character is `#` are
/// dropped; everything else is returned trimmed and otherwise untouched.
pub fn parse_link_lines(content: &str) -> Vec<(usize, String)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                None
            } else {
                Some((index + 1, trimmed.to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let content = "# comment\n\nhttps://example.com/a\nhttps://example.com/b\n";
        let lines = parse_link_lines(content);
        assert_eq!(
            lines,
            vec![
                (3, "https://example.com/a".to_string()),
                (4, "https://example.com/b".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_trims_and_handles_indented_comments() {
        let content = "\u{feff}  https://a.example  \r\n   # indented comment\r\n\t\r\nnot-a-url\n";
        let lines = parse_link_lines(content);
        assert_eq!(
            lines,
            vec![(1, "https://a.example".to_string()), (4, "not-a-url".to_string())]
        );
    }

    #[test]
    fn test_hash_inside_url_is_kept() {
        let lines = parse_link_lines("https://example.com/#section\n");
        assert_eq!(lines[0].1, "https://example.com/#section");
    }

    #[test]
    fn test_empty_file_yields_nothing() {
        assert!(parse_link_lines("").is_empty());
        assert!(parse_link_lines("\n\n   \n#only\n").is_empty());
    }

    #[test]
    fn test_discovery_on_local_storage() {
        use crate::config::cli::LocalStorage;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("bravo/TAK")).unwrap();
        std::fs::create_dir_all(root.join("alpha/TAK/archive")).unwrap();
        std::fs::write(root.join("alpha/TAK/beacons.txt"), "https://a.example\n").unwrap();
        std::fs::write(root.join("alpha/TAK/old.png"), [0u8]).unwrap();
        std::fs::write(root.join("stray.txt"), "not a division").unwrap();
        let storage = LocalStorage::new(root);

        let divisions =
            tokio_test::block_on(discover_divisions(&storage, Path::new(""), "TAK")).unwrap();
        let names: Vec<&str> = divisions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "bravo"]);
        assert_eq!(divisions[0].marker_dir, PathBuf::from("alpha/TAK"));

        let selector = LinkListSelector::parse("*.txt");
        let lists =
            tokio_test::block_on(discover_link_lists(&storage, &divisions[0], &selector)).unwrap();
        assert_eq!(lists, vec![PathBuf::from("alpha/TAK/beacons.txt")]);
    }

    #[test]
    fn test_selector_matching() {
        let fixed = LinkListSelector::parse("beacons.txt");
        assert_eq!(fixed, LinkListSelector::FileName("beacons.txt".to_string()));
        assert!(fixed.matches("beacons.txt"));
        assert!(!fixed.matches("other.txt"));

        let any_txt = LinkListSelector::parse("*.txt");
        assert_eq!(any_txt, LinkListSelector::Extension("txt".to_string()));
        assert!(any_txt.matches("links.txt"));
        assert!(any_txt.matches("LINKS.TXT"));
        assert!(!any_txt.matches("example.com_a.png"));
        assert!(!any_txt.matches("txt"));
    }
}
