pub mod flickr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use flickr::FlickrSource;

/// Opaque, totally-ordered revision marker for a photo's remote state.
///
/// The remote reports it as a decimal epoch string; we parse it into
/// an integer so comparison is numeric rather than lexicographic
/// (string comparison is only correct while markers share a width).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RevisionMarker(pub i64);

impl RevisionMarker {
    /// Marker of a photo that has never been synced. Every real remote
    /// marker is strictly greater.
    pub const ZERO: RevisionMarker = RevisionMarker(0);

    pub fn parse(raw: &str) -> Result<Self, SourceError> {
        raw.parse::<i64>()
            .map(RevisionMarker)
            .map_err(|_| SourceError::Malformed(format!("invalid revision marker '{raw}'")))
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }
}

/// One remote social event (tag, note, or comment) on a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEvent {
    pub id: String,
    pub author: String,
    pub text: String,
}

/// A photo as listed in the group pool. Locator URLs are built by the
/// adapter; nothing downstream knows how the source shapes its URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoStub {
    pub uid: String,
    pub owner_id: String,
    pub owner_name: String,
    pub title: String,
    pub page_url: String,
    pub image_url: String,
    pub thumb_url: String,
}

/// Per-photo metadata and events returned by the info call.
#[derive(Debug, Clone)]
pub struct PhotoInfo {
    pub last_modified: RevisionMarker,
    pub tags: Vec<RemoteEvent>,
    pub notes: Vec<RemoteEvent>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    /// Fetch failed or the source reported non-success. Callers treat
    /// this as "no data available this round", never as fatal.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The response arrived but could not be interpreted.
    #[error("malformed source payload: {0}")]
    Malformed(String),
}

/// The remote content source. Everything downstream depends on this
/// trait, never on the concrete adapter.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// List the photos currently in the tracked group pool.
    async fn fetch_group_listing(&self) -> Result<Vec<PhotoStub>, SourceError>;

    /// Fetch one photo's revision marker plus its tag and note events.
    async fn fetch_photo_info(&self, uid: &str) -> Result<PhotoInfo, SourceError>;

    /// Fetch one photo's comment events.
    async fn fetch_comments(&self, uid: &str) -> Result<Vec<RemoteEvent>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_comparison_is_numeric() {
        // "99" > "100" lexicographically; the parsed type must not be.
        let older = RevisionMarker::parse("99").unwrap();
        let newer = RevisionMarker::parse("100").unwrap();
        assert!(newer > older);
        assert!(older > RevisionMarker::ZERO);
    }

    #[test]
    fn marker_rejects_garbage() {
        assert!(matches!(
            RevisionMarker::parse("not-a-number"),
            Err(SourceError::Malformed(_))
        ));
    }
}
