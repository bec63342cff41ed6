use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 128-bit content digest used for intra-run duplicate detection.
///
/// The digest only needs to be stable within a single run; it is never
/// persisted or compared across processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashValue(pub u128);

impl From<blake3::Hash> for HashValue {
    fn from(hash: blake3::Hash) -> Self {
        let mut raw = [0u8; 16];
        raw.copy_from_slice(&hash.as_bytes()[..16]);
        Self(u128::from_le_bytes(raw))
    }
}

/// Classification reported for each committed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineType {
    Blank,
    Code,
    Comment,
}

/// Per-line observer invoked by the scanner as each line commits.
///
/// Returning `false` aborts the scan of that file; counts collected up to
/// that point are retained on the job.
pub trait LineObserver: Send {
    fn process_line(&mut self, job: &FileJob, line: u64, kind: LineType) -> bool;
}

impl<F> LineObserver for F
where
    F: FnMut(&FileJob, u64, LineType) -> bool + Send,
{
    fn process_line(&mut self, job: &FileJob, line: u64, kind: LineType) -> bool {
        self(job, line, kind)
    }
}

/// One unit of work describing one input file.
///
/// The walker creates the job, the reader fills `content`, the scanner
/// populates the counts and releases the content.
#[derive(Default, Serialize, Deserialize)]
pub struct FileJob {
    pub location: PathBuf,
    pub language: String,
    #[serde(skip)]
    pub content: Vec<u8>,
    pub bytes: u64,
    pub lines: u64,
    pub code: u64,
    pub comment: u64,
    pub blank: u64,
    pub complexity: u64,
    pub binary: bool,
    pub hash: Option<HashValue>,
    #[serde(skip)]
    pub callback: Option<Box<dyn LineObserver>>,
}

impl FileJob {
    #[must_use]
    pub fn new(location: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            language: language.into(),
            ..Self::default()
        }
    }

    /// Attach a per-line observer to this job.
    #[must_use]
    pub fn with_callback(mut self, callback: Box<dyn LineObserver>) -> Self {
        self.callback = Some(callback);
        self
    }
}

impl fmt::Debug for FileJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileJob")
            .field("location", &self.location)
            .field("language", &self.language)
            .field("bytes", &self.bytes)
            .field("lines", &self.lines)
            .field("code", &self.code)
            .field("comment", &self.comment)
            .field("blank", &self.blank)
            .field("complexity", &self.complexity)
            .field("binary", &self.binary)
            .field("hash", &self.hash)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_is_zeroed() {
        let job = FileJob::new("a/b.rs", "rust");
        assert_eq!(job.location, PathBuf::from("a/b.rs"));
        assert_eq!(job.language, "rust");
        assert_eq!(job.lines, 0);
        assert!(!job.binary);
        assert!(job.hash.is_none());
        assert!(job.callback.is_none());
    }

    #[test]
    fn test_hash_value_from_blake3_is_stable() {
        let a = HashValue::from(blake3::hash(b"hello"));
        let b = HashValue::from(blake3::hash(b"hello"));
        let c = HashValue::from(blake3::hash(b"world"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |_: &FileJob, line: u64, kind: LineType| {
                seen.push((line, kind));
                true
            };
            let job = FileJob::new("x", "text");
            assert!(observer.process_line(&job, 1, LineType::Code));
        }
        assert_eq!(seen, vec![(1, LineType::Code)]);
    }
}
