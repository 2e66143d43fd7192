//! Splitting of archive entry paths
//!
//! Archive plugins report entries as flat, `/`-delimited paths relative to
//! the archive root. The tree builder peels one segment at a time off such a
//! path and synthesizes a directory for it.

/// One step of an archive entry path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPath<'a> {
    /// The path continues below `segment`
    Nested {
        /// Text before the first `/` (may be empty, e.g. for `a//b`)
        segment: &'a str,
        /// Text after the first `/`
        rest: &'a str,
    },
    /// A single name with no delimiter
    Leaf(&'a str),
    /// Nothing left, e.g. the tail of a directory-only entry like `readme/`
    Empty,
}

/// Split `path` at its first `/`
///
/// ```
/// use core_sync::entry_path::{split_entry_path, EntryPath};
///
/// assert_eq!(
///     split_entry_path("dir1/sub/song2.it"),
///     EntryPath::Nested { segment: "dir1", rest: "sub/song2.it" }
/// );
/// assert_eq!(split_entry_path("song.mod"), EntryPath::Leaf("song.mod"));
/// assert_eq!(split_entry_path(""), EntryPath::Empty);
/// ```
pub fn split_entry_path(path: &str) -> EntryPath<'_> {
    match path.split_once('/') {
        Some((segment, rest)) => EntryPath::Nested { segment, rest },
        None if path.is_empty() => EntryPath::Empty,
        None => EntryPath::Leaf(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_only_entry_ends_empty() {
        assert_eq!(
            split_entry_path("readme/"),
            EntryPath::Nested {
                segment: "readme",
                rest: ""
            }
        );
        assert_eq!(split_entry_path(""), EntryPath::Empty);
    }

    #[test]
    fn test_split_only_at_first_delimiter() {
        assert_eq!(
            split_entry_path("a//b"),
            EntryPath::Nested {
                segment: "a",
                rest: "/b"
            }
        );
        assert_eq!(
            split_entry_path("/b"),
            EntryPath::Nested {
                segment: "",
                rest: "b"
            }
        );
    }
}
