use crate::error::SlipError;
use crate::pipeline::{SlipOutcome, SlipPipeline};
use crate::record::Channel;
use anyhow::{Context, Result};
use log::{error, info, warn};
use rayon::prelude::*;
use std::path::PathBuf;

/// Results of a batch run, one entry per input file in input order.
#[derive(Default)]
pub struct BatchReport {
    pub results: Vec<(PathBuf, crate::error::Result<SlipOutcome>)>,
}

impl BatchReport {
    pub fn outcomes(&self) -> impl Iterator<Item = (&PathBuf, &SlipOutcome)> {
        self.results
            .iter()
            .filter_map(|(path, result)| result.as_ref().ok().map(|o| (path, o)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &SlipError)> {
        self.results
            .iter()
            .filter_map(|(path, result)| result.as_ref().err().map(|e| (path, e)))
    }

    pub fn processed(&self) -> usize {
        self.outcomes().count()
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }
}

/// Runs many files through per-worker pipelines.
pub struct BatchProcessor {
    jobs: usize,
}

impl BatchProcessor {
    pub fn new(jobs: usize) -> Self {
        Self { jobs: jobs.max(1) }
    }

    /// Process `files` with `jobs` workers. Every worker builds one pipeline
    /// with `make_pipeline` and keeps it for all of its files. A failing file
    /// is recorded and never stops the others; only a pipeline that cannot be
    /// built aborts the run.
    pub fn run<F>(&self, files: &[PathBuf], channel: Channel, make_pipeline: F) -> Result<BatchReport>
    where
        F: Fn() -> Result<SlipPipeline> + Sync + Send,
    {
        if files.is_empty() {
            return Ok(BatchReport::default());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .context("Failed to build worker pool")?;
        let chunk_size = files.len().div_ceil(self.jobs);

        info!(
            "Processing {} {} files with {} workers",
            files.len(),
            channel,
            self.jobs.min(files.len())
        );

        let chunks: Vec<Vec<(PathBuf, crate::error::Result<SlipOutcome>)>> = pool.install(|| {
            files
                .par_chunks(chunk_size)
                .map(|chunk| {
                    let mut pipeline = make_pipeline()?;
                    Ok(chunk
                        .iter()
                        .map(|path| (path.clone(), pipeline.process(path, channel)))
                        .collect())
                })
                .collect::<Result<_>>()
        })?;

        let results: Vec<_> = chunks.into_iter().flatten().collect();
        for (path, error) in results.iter().filter_map(|(p, r)| r.as_ref().err().map(|e| (p, e))) {
            if error.is_input_error() {
                warn!("Skipping {}: {}", path.display(), error);
            } else {
                error!("Failed to process {}: {}", path.display(), error);
            }
        }
        let report = BatchReport { results };

        info!(
            "Batch finished: {} processed, {} failed",
            report.processed(),
            report.failed()
        );
        Ok(report)
    }
}
