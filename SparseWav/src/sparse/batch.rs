//! Batch decompression and expansion
//!
//! Files are processed in parallel with rayon, one file per task. Each task
//! runs a normal single-file operation with its own buffers and handles.
//! Cancellation is checked before each file starts; a file already under way
//! always runs to completion.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::decompressor::decompress_with_options;
use super::expander::expand_with_options;
use super::naming::is_compressed_name;
use super::options::{DecompressOptions, ExpandOptions};

/// Progress through a batch
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Files started so far (1-indexed)
    pub current: usize,
    pub total: usize,
    /// File that was just started
    pub current_file: Option<String>,
}

impl BatchProgress {
    #[must_use]
    pub fn new(current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Summary of a batch
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub success_count: usize,
    pub fail_count: usize,
    /// Files never started because the batch was cancelled
    pub skipped_count: usize,
    /// One message per file processed
    pub results: Vec<String>,
}

/// Find files with compressed names under `dir`, recursively.
///
/// # Returns
/// A sorted list of paths.
pub fn find_compressed_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file() && is_compressed_name(e.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();

    files.sort();
    files
}

/// Decompress each of `files` in parallel.
pub fn batch_decompress<F>(
    files: &[PathBuf],
    options: &DecompressOptions,
    progress: F,
    cancel: &AtomicBool,
) -> BatchResult
where
    F: Fn(&BatchProgress) + Send + Sync,
{
    run_batch(files, progress, cancel, |path| {
        decompress_with_options(path, options, &|_| {})
            .map(|result| format!("Restored: {}", result.output_path.display()))
            .map_err(|e| e.to_string())
    })
}

/// Expand each of `files` in parallel.
///
/// All outputs share `options.output_dir` when it is set, so files whose
/// intervals overlap will overwrite each other there.
pub fn batch_expand<F>(
    files: &[PathBuf],
    options: &ExpandOptions,
    progress: F,
    cancel: &AtomicBool,
) -> BatchResult
where
    F: Fn(&BatchProgress) + Send + Sync,
{
    run_batch(files, progress, cancel, |path| {
        expand_with_options(path, options, &|_| {})
            .map(|result| {
                format!(
                    "Expanded: {} into {} file(s)",
                    path.display(),
                    result.output_files.len()
                )
            })
            .map_err(|e| e.to_string())
    })
}

fn run_batch<F, Op>(files: &[PathBuf], progress: F, cancel: &AtomicBool, op: Op) -> BatchResult
where
    F: Fn(&BatchProgress) + Send + Sync,
    Op: Fn(&Path) -> std::result::Result<String, String> + Send + Sync,
{
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let skip_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let total = files.len();

    let results: Vec<String> = files
        .par_iter()
        .filter_map(|path| {
            if cancel.load(Ordering::SeqCst) {
                skip_counter.fetch_add(1, Ordering::SeqCst);
                return None;
            }

            let display_path = path.to_string_lossy();
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&BatchProgress::new(current, total, display_path.to_string()));

            let message = match op(path) {
                Ok(message) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    message
                }
                Err(e) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    tracing::warn!("Failed {display_path}: {e}");
                    format!("Failed {display_path}: {e}")
                }
            };

            Some(message)
        })
        .collect();

    BatchResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        skipped_count: skip_counter.load(Ordering::SeqCst),
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_compressed_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("site").join("day2");
        std::fs::create_dir_all(&nested).unwrap();

        for path in [
            dir.path().join("BT.WAV"),
            dir.path().join("A.WAV"),
            nested.join("CT.wav"),
            dir.path().join("notes.txt"),
        ] {
            std::fs::write(path, b"").unwrap();
        }

        let found = find_compressed_files(dir.path());
        assert_eq!(found, vec![dir.path().join("BT.WAV"), nested.join("CT.wav")]);
    }

    #[test]
    fn test_batch_cancelled_before_start() {
        let files = vec![PathBuf::from("AT.WAV"), PathBuf::from("BT.WAV")];
        let cancel = AtomicBool::new(true);

        let result = batch_decompress(&files, &DecompressOptions::default(), |_| {}, &cancel);
        assert_eq!(result.skipped_count, 2);
        assert_eq!(result.success_count + result.fail_count, 0);
        assert!(result.results.is_empty());
    }

    #[test]
    fn test_batch_counts_failures() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![dir.path().join("missingT.WAV"), dir.path().join("plain.WAV")];
        let cancel = AtomicBool::new(false);

        let result = batch_expand(&files, &ExpandOptions::default(), |_| {}, &cancel);
        assert_eq!(result.fail_count, 2);
        assert_eq!(result.results.len(), 2);
    }

    #[test]
    fn test_progress_percentage() {
        assert!((BatchProgress::new(1, 4, "a").percentage() - 0.25).abs() < f32::EPSILON);
        assert!(BatchProgress::new(0, 0, "a").percentage().abs() < f32::EPSILON);
    }
}
