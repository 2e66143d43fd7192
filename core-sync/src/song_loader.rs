//! Media resolution for archive entries
//!
//! Turns a leaf entry found inside an archive into a [`Song`], or rejects it
//! when no decoder understands it. Rejection is not an error: unsupported
//! files are skipped without logging.

use core_library::models::Song;

/// Suffixes claimed by the compiled-in decoders: the module tracker formats
/// and OptimFROG.
pub const DECODER_SUFFIXES: &[&str] = &[
    "669", "amf", "dbm", "digi", "emod", "far", "fnk", "gdm", "gmc", "imf", "ims", "it", "j2b",
    "liq", "mdl", "med", "mgt", "mod", "mtm", "ntp", "oct", "okta", "psm", "ptm", "rad", "rtm",
    "s3m", "stm", "ult", "umx", "xm", "ofr",
];

/// A leaf entry of an archive, as seen by the tree builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveEntry<'a> {
    /// URI of the database directory the song would live in
    pub directory_uri: &'a str,
    /// Full path of the entry inside the archive
    pub entry_path: &'a str,
    /// Base name of the entry
    pub name: &'a str,
}

impl ArchiveEntry<'_> {
    /// URI the song would get in the database
    pub fn uri(&self) -> String {
        if self.directory_uri.is_empty() {
            self.name.to_string()
        } else {
            format!("{}/{}", self.directory_uri, self.name)
        }
    }
}

/// Resolves archive entries into playable songs
pub trait SongLoader: Send + Sync {
    /// Build a song for `entry`, or `None` if it is not playable
    fn load_song(&self, entry: &ArchiveEntry<'_>) -> Option<Song>;
}

/// Accepts entries whose file name suffix a decoder claims
#[derive(Debug, Clone)]
pub struct SuffixSongLoader {
    suffixes: Vec<String>,
}

impl Default for SuffixSongLoader {
    fn default() -> Self {
        Self::with_suffixes(DECODER_SUFFIXES.iter().copied())
    }
}

impl SuffixSongLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader accepting exactly `suffixes` (compared case-insensitively)
    pub fn with_suffixes<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            suffixes: suffixes
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn supports(&self, suffix: &str) -> bool {
        let suffix = suffix.to_ascii_lowercase();
        self.suffixes.iter().any(|s| *s == suffix)
    }
}

impl SongLoader for SuffixSongLoader {
    fn load_song(&self, entry: &ArchiveEntry<'_>) -> Option<Song> {
        let suffix = file_suffix(entry.name)?;
        if !self.supports(suffix) {
            return None;
        }

        Some(Song::new(entry.name, entry.uri()).with_archive_entry(entry.entry_path))
    }
}

/// Text after the last `.` of a file name
///
/// Hidden files (`.xm`) and names ending in a dot have no suffix.
pub fn file_suffix(name: &str) -> Option<&str> {
    let dot = name.rfind('.')?;
    if dot == 0 || dot + 1 == name.len() {
        return None;
    }
    Some(&name[dot + 1..])
}
