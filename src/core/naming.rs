use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Longest file stem produced, in bytes; leaves room for `.png` under
/// common 255-byte name limits.
pub const MAX_STEM_BYTES: usize = 200;

/// Hex digits of the URL digest appended when two URLs share a name.
pub const SUFFIX_HEX_DIGITS: usize = 8;

const FALLBACK_STEM: &str = "qr";

/// Derive the artifact file name from the URL it encodes.
///
/// Everything up to the last `//` is dropped, path separators and any other
/// character outside `[A-Za-z0-9._-]` become `_`. The mapping is stable, so
/// re-running a batch overwrites the previous image for the same URL.
pub fn artifact_file_name(url: &str) -> String {
    format!("{}.png", file_stem(url))
}

/// Name used when the plain name is already taken by a different URL:
/// the stem followed by `-` and the first hex digits of the URL's SHA-256.
pub fn disambiguated_file_name(url: &str) -> String {
    format!("{}-{}.png", file_stem(url), url_digest(url))
}

fn file_stem(url: &str) -> String {
    let without_scheme = url.rsplit("//").next().unwrap_or(url);

    let mut stem: String = without_scheme
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // 只剩 ASCII，可直接截斷
    stem.truncate(MAX_STEM_BYTES);

    while stem.ends_with('.') {
        stem.pop();
    }

    if stem.is_empty() {
        stem.push_str(FALLBACK_STEM);
    }

    stem
}

fn url_digest(url: &str) -> String {
    let mut digest = format!("{:x}", Sha256::digest(url.as_bytes()));
    digest.truncate(SUFFIX_HEX_DIGITS);
    digest
}

/// Outcome of claiming an output path for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameClaim {
    /// First claim of this path in the run.
    Fresh(PathBuf),
    /// The same URL already owns this path in the same directory.
    Duplicate(PathBuf),
}

impl NameClaim {
    pub fn path(&self) -> &Path {
        match self {
            Self::Fresh(path) | Self::Duplicate(path) => path,
        }
    }
}

/// Hands out one output path per distinct URL and directory for a run.
///
/// The first URL to claim a derived name keeps it. A different URL that
/// derives the same name gets [`disambiguated_file_name`] instead, so no
/// two URLs ever share a file. Claims follow discovery order, which keeps
/// names stable across re-runs of an unchanged link list.
#[derive(Debug, Default)]
pub struct ArtifactNamer {
    claimed: HashMap<PathBuf, String>,
}

impl ArtifactNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, dir: &Path, url: &str) -> NameClaim {
        let plain = dir.join(artifact_file_name(url));
        if let Some(claim) = self.try_claim(plain, url) {
            return claim;
        }

        let suffixed = dir.join(disambiguated_file_name(url));
        if let Some(claim) = self.try_claim(suffixed, url) {
            return claim;
        }

        // 摘要也撞名時，加序號
        let stem = format!("{}-{}", file_stem(url), url_digest(url));
        let mut counter = 2usize;
        loop {
            let candidate = dir.join(format!("{}-{}.png", stem, counter));
            if let Some(claim) = self.try_claim(candidate, url) {
                return claim;
            }
            counter += 1;
        }
    }

    fn try_claim(&mut self, path: PathBuf, url: &str) -> Option<NameClaim> {
        match self.claimed.get(&path) {
            None => {
                self.claimed.insert(path.clone(), url.to_string());
                Some(NameClaim::Fresh(path))
            }
            Some(owner) if owner == url => Some(NameClaim::Duplicate(path)),
            Some(_) => None,
        }
    }
}
