//! The reader → scanner → output pipeline.
//!
//! Each stage is a thread that drains its input channel through a rayon
//! worker pool (`par_bridge`), so file I/O and scanning overlap freely
//! across files. The pool drain doubles as the stage barrier: a stage's
//! output channel closes only after every one of its workers finished.
//! Output order is not a function of input order.

use crossbeam_channel::{bounded, Receiver, Sender};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace, warn};

use crate::config::ScanConfig;
use crate::dedupe::DuplicateIndex;
use crate::error::EngineError;
use crate::language::LanguageRegistry;
use crate::scanner;
use crate::stats::FileJob;

const CHANNEL_CAPACITY: usize = 1024;

/// Wire up both stages over `input` and return the output channel.
///
/// Jobs sent on `input` flow through the reader stage (which loads each
/// file into memory) and the scanner stage (which classifies it, drops
/// binary files and, when enabled, duplicates). Closing the input channel
/// is the termination signal; the returned channel closes once every
/// in-flight job has drained.
pub fn spawn_stages(
    input: Receiver<FileJob>,
    languages: Arc<LanguageRegistry>,
    config: ScanConfig,
) -> Receiver<FileJob> {
    let (scan_tx, scan_rx) = bounded(CHANNEL_CAPACITY);
    let (out_tx, out_rx) = bounded(CHANNEL_CAPACITY);

    std::thread::spawn(move || reader_stage(&input, &scan_tx));

    let duplicates = Arc::new(DuplicateIndex::new());
    std::thread::spawn(move || {
        scanner_stage(&scan_rx, &out_tx, &languages, config, &duplicates);
    });

    out_rx
}

/// Run a batch of jobs through the pipeline and collect the survivors.
pub fn run(
    jobs: impl IntoIterator<Item = FileJob>,
    languages: &Arc<LanguageRegistry>,
    config: &ScanConfig,
) -> Vec<FileJob> {
    let (in_tx, in_rx) = bounded(CHANNEL_CAPACITY);
    let out_rx = spawn_stages(in_rx, Arc::clone(languages), *config);

    let jobs: Vec<FileJob> = jobs.into_iter().collect();
    std::thread::spawn(move || {
        for job in jobs {
            if in_tx.send(job).is_err() {
                break;
            }
        }
    });

    out_rx.into_iter().collect()
}

/// Reads entire files into memory and pushes the enriched jobs onward.
/// A job whose file cannot be read is dropped, not retried.
fn reader_stage(input: &Receiver<FileJob>, output: &Sender<FileJob>) {
    let started = Instant::now();

    input.into_iter().par_bridge().for_each(|mut job| {
        let file_started = Instant::now();
        match std::fs::read(&job.location) {
            Ok(content) => {
                trace!(
                    location = %job.location.display(),
                    elapsed_us = file_started.elapsed().as_micros() as u64,
                    "read into memory"
                );
                job.content = content;
                // send only fails when the scanner stage is gone, which
                // means the run is being torn down
                let _ = output.send(job);
            }
            Err(source) => {
                let error = EngineError::FileRead {
                    path: job.location.clone(),
                    source,
                };
                warn!("{error}");
            }
        }
    });

    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "reader stage drained"
    );
}

/// Runs the classifier over in-memory jobs, then drops binary files and
/// duplicate contents before forwarding.
fn scanner_stage(
    input: &Receiver<FileJob>,
    output: &Sender<FileJob>,
    languages: &LanguageRegistry,
    config: ScanConfig,
    duplicates: &DuplicateIndex,
) {
    let started = Instant::now();

    input.into_iter().par_bridge().for_each(|mut job| {
        let profile = languages.get(&job.language);
        scanner::count_stats(&mut job, &profile, &config);

        if config.duplicates {
            if let Some(hash) = job.hash {
                if duplicates.check_and_add(job.bytes, hash) {
                    warn!(location = %job.location.display(), "skipping duplicate file");
                    return;
                }
            }
        }

        if job.binary {
            warn!(location = %job.location.display(), "skipping file identified as binary");
            return;
        }

        let _ = output.send(job);
    });

    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scanner stage drained"
    );
}
