//! `reconcile_times`: time one likelihood evaluation of a gene family on a
//! dated species tree and write `<summary>.times`; optionally fit the DTL
//! rates.
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    process,
};

use clap::{CommandFactory, Parser};
use rust_reconcile::{
    optimization::loglik_optimizer::{SimplexOptions, Tolerances},
    pipeline::{EXIT_FAILURE, Pipeline, PipelineContext, PipelineError, PipelineResult},
};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dated species tree (newick, first line is used).
    species_tree: Option<PathBuf>,

    /// Conditional-clade summary of a gene tree sample.
    gene_tree_sample: Option<PathBuf>,

    /// Characters ending the prefix counted in the report. Genes are still
    /// mapped onto species with `_`.
    gene_name_separator: Option<String>,

    /// Fit delta, tau and lambda by Nelder-Mead after the timing run.
    #[arg(long, default_value_t = false)]
    optimize: bool,

    #[arg(long, default_value_t = 200)]
    max_iter: u64,

    /// Simplex standard-deviation tolerance.
    #[arg(long, default_value_t = 1e-6)]
    sd_tolerance: f64,

    /// Repeat for more log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn usage() -> String {
    format!("usage:\n {}", Cli::command().render_usage())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn context(cli: &Cli) -> PipelineResult<PipelineContext> {
    let mut ctx = PipelineContext::default().with_option("BOOTSTRAP_LABELS", "yes")?;
    if let Some(sep) = &cli.gene_name_separator {
        ctx = ctx.with_separators(sep)?;
    }
    let usage_err = |e: rust_reconcile::optimization::errors::OptError| PipelineError::Usage {
        message: e.to_string(),
    };
    let tols = Tolerances::new(cli.sd_tolerance, cli.max_iter).map_err(usage_err)?;
    ctx.simplex = SimplexOptions::new(tols, ctx.simplex.initial_step, cli.verbose > 0)
        .map_err(usage_err)?;
    Ok(ctx)
}

fn run(cli: &Cli, species: &Path, summary: &Path) -> PipelineResult<()> {
    let pipeline = Pipeline::new(context(cli)?);

    let inputs = pipeline.load(species, summary)?;
    println!("Read species tree from: {}..", species.display());
    println!(
        "Read summary of tree sample for {} trees from: {}..",
        inputs.posterior.observations(),
        summary.display()
    );

    let mut model = pipeline.build(&inputs)?;
    pipeline.seed_rates(&mut model)?;
    println!(
        "{} {}",
        inputs.leaf_count(),
        inputs.prefix_count(pipeline.context().separators())
    );

    let report = pipeline.evaluate(&inputs, &model);
    report.write()?;

    if cli.optimize {
        let model = RefCell::new(model);
        let fit = pipeline.optimize(&inputs, &model)?;
        println!(
            "delta={}\ttau={}\tlambda={}\tll={}",
            fit.rates.delta, fit.rates.tau, fit.rates.lambda, fit.log_likelihood
        );
    }
    Ok(())
}

fn main() {
    println!("reconcile_times using {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => e.exit(),
            _ => {
                println!("{e}");
                println!("{}", usage());
                process::exit(EXIT_FAILURE);
            }
        },
    };

    let (Some(species), Some(summary)) = (&cli.species_tree, &cli.gene_tree_sample) else {
        println!("{}", usage());
        process::exit(EXIT_FAILURE);
    };

    init_logging(cli.verbose);

    if let Err(err) = run(&cli, species, summary) {
        eprintln!("{err}");
        process::exit(EXIT_FAILURE);
    }
}
