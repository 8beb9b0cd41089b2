//! [`Pipeline`]: load → build → seed → evaluate | optimize → report.
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    time::Instant,
};

use crate::{
    optimization::loglik_optimizer::{RateFit, RateObjective, fit_rates},
    phylo::distinct_prefix_count,
    pipeline::{
        context::{PipelineContext, check_seed},
        errors::{PipelineError, PipelineResult},
        report::{Evaluation, TimesReport},
    },
    posterior::{ApproxPosterior, load_summary},
    reconciliation::ReconciliationModel,
};

/// Everything read from disk for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedInputs {
    pub species_path: PathBuf,
    pub summary_path: PathBuf,
    /// First non-empty line of the species file.
    pub species_newick: String,
    pub posterior: ApproxPosterior,
}

impl LoadedInputs {
    /// Leaves of the summary's constructor tree.
    pub fn leaf_count(&self) -> usize {
        self.posterior.constructor_tree().num_leaves()
    }

    /// Distinct leaf-name prefixes of the constructor tree under `separators`.
    pub fn prefix_count(&self, separators: &str) -> usize {
        distinct_prefix_count(self.posterior.constructor_tree(), separators)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pipeline {
    context: PipelineContext,
}

impl Pipeline {
    pub fn new(context: PipelineContext) -> Self {
        Pipeline { context }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Read the species tree (first line) and the summary.
    ///
    /// # Errors
    /// - [`PipelineError::Load`] when either file is missing, unreadable,
    ///   empty, or the summary is malformed.
    pub fn load(
        &self, species_path: impl AsRef<Path>, summary_path: impl AsRef<Path>,
    ) -> PipelineResult<LoadedInputs> {
        let species_path = species_path.as_ref();
        let summary_path = summary_path.as_ref();

        let text = std::fs::read_to_string(species_path)
            .map_err(|e| PipelineError::load("species tree", species_path, e))?;
        let species_newick = text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or_else(|| PipelineError::load("species tree", species_path, "file is empty"))?
            .to_string();
        tracing::info!(path = %species_path.display(), "read species tree");

        let posterior = load_summary(summary_path)
            .map_err(|e| PipelineError::load("tree sample summary", summary_path, e))?;
        tracing::info!(
            path = %summary_path.display(),
            observations = posterior.observations(),
            genes = posterior.num_leaves(),
            "read tree sample summary"
        );

        Ok(LoadedInputs {
            species_path: species_path.to_path_buf(),
            summary_path: summary_path.to_path_buf(),
            species_newick,
            posterior,
        })
    }

    /// Build the model from a snapshot of the context's config.
    ///
    /// # Errors
    /// - [`PipelineError::Build`] if the species tree is unusable.
    pub fn build(&self, inputs: &LoadedInputs) -> PipelineResult<ReconciliationModel> {
        let model = ReconciliationModel::new(&inputs.species_newick, self.context.config.clone())?;
        Ok(model)
    }

    /// Apply the context's seed rates and recompute extinction once.
    ///
    /// # Errors
    /// - [`PipelineError::Optimize`] with a constraint violation when a seed
    ///   component lies outside the rate bounds; the model is untouched.
    /// - [`PipelineError::Build`] if the model rejects the rates.
    pub fn seed_rates(&self, model: &mut ReconciliationModel) -> PipelineResult<()> {
        check_seed(&self.context.seed_rates)?;
        model.apply_rates(self.context.seed_rates)?;
        Ok(())
    }

    /// Time one probability query and collect the report statistics.
    ///
    /// Never fails: an oracle error is reported as
    /// [`Evaluation::Degenerate`] inside the report.
    pub fn evaluate(&self, inputs: &LoadedInputs, model: &ReconciliationModel) -> TimesReport {
        let started = Instant::now();
        let outcome = model.p(&inputs.posterior);
        let elapsed = started.elapsed();

        let evaluation = match outcome {
            Ok(p) => Evaluation::from_probability(p),
            Err(err) => Evaluation::Degenerate { reason: err.to_string() },
        };
        match &evaluation {
            Evaluation::Likelihood { log_likelihood, .. } => {
                tracing::info!(log_likelihood, elapsed = ?elapsed, "evaluated likelihood")
            }
            Evaluation::Degenerate { reason } => {
                tracing::warn!(%reason, "degenerate likelihood evaluation")
            }
        }

        TimesReport {
            summary_path: inputs.summary_path.clone(),
            elapsed,
            clade_pair_count: inputs.posterior.split_table_len(),
            leaf_count: inputs.leaf_count(),
            prefix_count: inputs.prefix_count(self.context.separators()),
            evaluation,
        }
    }

    /// Fit the rates by Nelder–Mead from the context's seed rates and leave
    /// the model at the best rates found.
    ///
    /// # Errors
    /// - [`PipelineError::Optimize`] for objective, model or solver errors.
    pub fn optimize(
        &self, inputs: &LoadedInputs, model: &RefCell<ReconciliationModel>,
    ) -> PipelineResult<RateFit> {
        let objective = RateObjective::new(model, &inputs.posterior, self.context.seed_rates)?;
        let fit = fit_rates(&objective, &self.context.simplex)?;
        objective.set_parameters(fit.rates)?;
        Ok(fit)
    }

    /// One-shot diagnostic run: load, build, seed, evaluate, write.
    ///
    /// # Errors
    /// - Load and build errors; report write failures as [`PipelineError::Io`].
    pub fn run_times(
        &self, species_path: impl AsRef<Path>, summary_path: impl AsRef<Path>,
    ) -> PipelineResult<TimesReport> {
        let inputs = self.load(species_path, summary_path)?;
        let mut model = self.build(&inputs)?;
        self.seed_rates(&mut model)?;
        let report = self.evaluate(&inputs, &model);
        report.write()?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{optimization::errors::OptError, reconciliation::RateParameters};
    use std::fs;

    const SPECIES: &str = "((A:1,B:1):1,C:2);\nignored second line\n";
    const FAMILY: &str = "#constructor_string\n((A_1,B_1),C_1);\n#observations\n10\n\
#Bip_counts\n4\t10\n#Dip_counts\n4\t1\t2\t10\n#last_leafset_id\n4\n\
#leaf-id\nA_1\t1\nB_1\t2\nC_1\t3\n#set-id\n1\t:\t1\n2\t:\t2\n3\t:\t3\n4\t:\t1\t2\n#END\n";

    fn write_inputs(dir: &Path, species: &str, family: &str) -> (PathBuf, PathBuf) {
        let sp = dir.join("species.newick");
        let fam = dir.join("fam.ale");
        fs::write(&sp, species).unwrap();
        fs::write(&fam, family).unwrap();
        (sp, fam)
    }

    #[test]
    // Purpose
    // -------
    // Missing, empty and malformed inputs fail at load time.
    fn load_rejects_missing_empty_and_malformed_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let (sp, fam) = write_inputs(dir.path(), SPECIES, FAMILY);
        let empty = dir.path().join("empty.newick");
        fs::write(&empty, "\n\n").unwrap();
        let broken = dir.path().join("broken.ale");
        fs::write(&broken, "#observations\nx\n").unwrap();
        let p = Pipeline::default();

        let missing = p.load(dir.path().join("nope"), &fam);
        let no_tree = p.load(&empty, &fam);
        let bad_summary = p.load(&sp, &broken);

        assert!(matches!(missing, Err(PipelineError::Load { what: "species tree", .. })));
        assert!(matches!(no_tree, Err(PipelineError::Load { what: "species tree", .. })));
        assert!(matches!(bad_summary, Err(PipelineError::Load { what: "tree sample summary", .. })));
    }

    #[test]
    // Purpose
    // -------
    // A non-binary species tree is a build error, not a load error.
    fn build_rejects_non_binary_species_tree() {
        let dir = tempfile::tempdir().unwrap();
        let (sp, fam) = write_inputs(dir.path(), "(A:1,B:1,C:1);", FAMILY);
        let p = Pipeline::default();
        let inputs = p.load(&sp, &fam).unwrap();

        let err = p.build(&inputs).unwrap_err();

        assert!(matches!(err, PipelineError::Build(_)));
    }

    #[test]
    // Purpose
    // -------
    // run_times writes one line whose statistics come from the summary.
    fn run_times_reports_summary_statistics() {
        let dir = tempfile::tempdir().unwrap();
        let (sp, fam) = write_inputs(dir.path(), SPECIES, FAMILY);

        let report = Pipeline::default().run_times(&sp, &fam).unwrap();

        assert_eq!(report.clade_pair_count, 5);
        assert_eq!(report.leaf_count, 3);
        assert_eq!(report.prefix_count, 3);
        assert!(!report.evaluation.is_degenerate());
        assert!(report.times_path().exists());
    }

    #[test]
    // Purpose
    // -------
    // Seed rates outside the box never reach the model, even when set
    // directly on the context.
    fn seed_rates_rejects_out_of_bounds_seed() {
        let dir = tempfile::tempdir().unwrap();
        let (sp, fam) = write_inputs(dir.path(), SPECIES, FAMILY);
        let mut ctx = PipelineContext::default();
        ctx.seed_rates = RateParameters::new(0.01, 0.0, 0.1);
        let p = Pipeline::new(ctx);
        let inputs = p.load(&sp, &fam).unwrap();
        let mut model = p.build(&inputs).unwrap();

        let err = p.seed_rates(&mut model).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Optimize(OptError::ConstraintViolation { name: "tau", .. })
        ));
        assert_eq!(model.rates(), None);
    }

    #[test]
    // Purpose
    // -------
    // The report's prefix count follows the context separators while genes
    // keep mapping with the model's own separators.
    fn prefix_separators_do_not_affect_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let (sp, fam) = write_inputs(dir.path(), SPECIES, FAMILY);
        let p = Pipeline::new(PipelineContext::default().with_separators("-").unwrap());
        let inputs = p.load(&sp, &fam).unwrap();
        let mut model = p.build(&inputs).unwrap();
        p.seed_rates(&mut model).unwrap();

        let report = p.evaluate(&inputs, &model);

        assert!(!report.evaluation.is_degenerate());
        assert_eq!(report.prefix_count, 3);
    }

    #[test]
    // Purpose
    // -------
    // An oracle failure during evaluation lands inside the report.
    fn evaluate_reports_oracle_failure_as_degenerate() {
        let dir = tempfile::tempdir().unwrap();
        let (sp, fam) = write_inputs(dir.path(), SPECIES, FAMILY);
        let p = Pipeline::default();
        let inputs = p.load(&sp, &fam).unwrap();
        let model = p.build(&inputs).unwrap();

        let report = p.evaluate(&inputs, &model);

        assert!(matches!(report.evaluation, Evaluation::Degenerate { .. }));
        assert_eq!(report.leaf_count, 3);
    }
}
