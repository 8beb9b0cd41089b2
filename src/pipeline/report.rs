//! The `.times` diagnostic report.
//!
//! One line, tab-separated:
//! `<elapsed_seconds>\t<clade_pair_count>\t<leaf_count>\t<prefix_count>\t<summary_path>\n`,
//! written next to the summary file as `<summary_path>.times`.
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::pipeline::errors::{PipelineError, PipelineResult};

/// Outcome of the timed probability query.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Likelihood { p: f64, log_likelihood: f64 },
    /// The oracle failed or returned a probability with no finite log.
    Degenerate { reason: String },
}

impl Evaluation {
    pub fn from_probability(p: f64) -> Self {
        if p.is_finite() && p > 0.0 {
            Evaluation::Likelihood { p, log_likelihood: p.ln() }
        } else {
            Evaluation::Degenerate { reason: format!("probability {p} has no finite log") }
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, Evaluation::Degenerate { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimesReport {
    pub summary_path: PathBuf,
    pub elapsed: Duration,
    /// Length of the clade-pair table (`last_leafset_id + 1`).
    pub clade_pair_count: usize,
    pub leaf_count: usize,
    pub prefix_count: usize,
    pub evaluation: Evaluation,
}

impl TimesReport {
    /// `<summary_path>.times`.
    pub fn times_path(&self) -> PathBuf {
        times_path_for(&self.summary_path)
    }

    /// The report line, newline included.
    pub fn line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\n",
            self.elapsed.as_secs_f64(),
            self.clade_pair_count,
            self.leaf_count,
            self.prefix_count,
            self.summary_path.display()
        )
    }

    /// Write the report, replacing any previous one. Returns the path written.
    ///
    /// # Errors
    /// - [`PipelineError::Io`] if the file cannot be written.
    pub fn write(&self) -> PipelineResult<PathBuf> {
        let path = self.times_path();
        std::fs::write(&path, self.line()).map_err(|e| PipelineError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), "wrote timing report");
        Ok(path)
    }
}

/// `<summary_path>.times`, appended to the full file name.
pub fn times_path_for(summary: &Path) -> PathBuf {
    let mut os = summary.as_os_str().to_owned();
    os.push(".times");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(path: &Path) -> TimesReport {
        TimesReport {
            summary_path: path.to_path_buf(),
            elapsed: Duration::from_millis(1500),
            clade_pair_count: 8,
            leaf_count: 4,
            prefix_count: 3,
            evaluation: Evaluation::from_probability(0.25),
        }
    }

    #[test]
    // Purpose
    // -------
    // The line has five tab-separated fields ending with the summary path.
    fn line_has_five_fields() {
        let r = report(Path::new("fam1.ale"));

        let line = r.line();
        let fields: Vec<&str> = line.trim_end_matches('\n').split('\t').collect();

        assert!(line.ends_with('\n'));
        assert_eq!(fields, vec!["1.5", "8", "4", "3", "fam1.ale"]);
        assert_eq!(r.times_path(), PathBuf::from("fam1.ale.times"));
    }

    #[test]
    fn write_replaces_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("fam.ale");
        std::fs::write(times_path_for(&summary), "stale\nstale\n").unwrap();

        let written = report(&summary).write().unwrap();

        let text = std::fs::read_to_string(&written).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.trim_end().ends_with(&summary.display().to_string()));
    }

    #[test]
    fn evaluation_flags_degenerate_probabilities() {
        assert!(Evaluation::from_probability(0.0).is_degenerate());
        assert!(Evaluation::from_probability(f64::NAN).is_degenerate());
        assert!(!Evaluation::from_probability(1e-300).is_degenerate());
    }
}
