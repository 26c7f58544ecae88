//! Release path model
//!
//! Pure path computations for versioned releases, plus tag generation.
//! Everything here works on plain strings: remote paths are always
//! `/`-separated regardless of the local platform.

use chrono::Utc;
use std::sync::Mutex;

/// One versioned deployment unit, materialized as a remote directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Sortable unique identifier; drives path naming and retention order
    pub tag: String,
    /// Human-facing name (currently the tag, kept separate so renames
    /// don't leak into paths)
    pub name: String,
    /// deploy_path/releases_folder/tag
    pub path: String,
}

impl Release {
    pub fn new(deploy_path: &str, releases_folder: &str, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let path = release_path(deploy_path, releases_folder, &tag);
        Self {
            name: tag.clone(),
            tag,
            path,
        }
    }
}

/// Generates strictly increasing, text-sortable release tags.
///
/// Tags are UTC timestamps at millisecond precision. Two calls inside the
/// same millisecond would collide, so the generator remembers the last tag
/// it issued and bumps past it.
pub struct TagGenerator {
    last: Mutex<Option<String>>,
}

impl TagGenerator {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }

    /// Next tag, strictly greater than every tag this generator returned.
    pub fn next(&self) -> String {
        let mut candidate = Utc::now().format("%Y%m%d%H%M%S%3f").to_string();
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(prev) = last.as_ref() {
            if candidate.as_str() <= prev.as_str() {
                candidate = bump(prev);
            }
        }
        *last = Some(candidate.clone());
        candidate
    }
}

impl Default for TagGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Smallest all-digit string strictly greater than `tag`.
fn bump(tag: &str) -> String {
    let mut digits: Vec<char> = tag.chars().collect();
    for d in digits.iter_mut().rev() {
        if ('0'..'9').contains(d) {
            *d = (*d as u8 + 1) as char;
            return digits.into_iter().collect();
        }
        *d = '0';
    }
    // All nines: lengthening keeps lexicographic order for same-prefix tags
    format!("{}0", tag)
}

/// Remote path of a release: deploy_path/releases_folder/tag.
pub fn release_path(deploy_path: &str, releases_folder: &str, tag: &str) -> String {
    format!(
        "{}/{}/{}",
        deploy_path.trim_end_matches('/'),
        releases_folder,
        tag
    )
}

/// Relative target for a shared symlink.
///
/// The link lives at `<release>/<symlink_name>` and must reach
/// `<deploy_path>/<shared_folder>/<folder_key>`, so the target climbs one
/// level per separator in `symlink_name`, plus one to leave the release
/// directory itself.
pub fn shared_link_target(shared_folder: &str, symlink_name: &str, folder_key: &str) -> String {
    let depth = symlink_name.matches('/').count() + 1;
    let mut target = String::new();
    for _ in 0..depth {
        target.push_str("../");
    }
    target.push_str(shared_folder);
    target.push('/');
    target.push_str(folder_key);
    target
}

/// Target of the "current" symlink, relative to the deploy path.
pub fn current_link_target(releases_folder: &str, tag: &str) -> String {
    format!("{}/{}", releases_folder, tag)
}
