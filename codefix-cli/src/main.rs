mod config;
mod report;

use std::io::{Read, Write};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use codefix_engine::{
    FixSettings, FsFileStore, MemFileStore, RuleSetConfig, Session, Validator, collect_files,
    fix_file,
};
use codefix_rules::Registry;
use codefix_types::FixOutcome;
use report::Reporter;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "codefix",
    version,
    about = "Validate source code files and optionally reformat them."
)]
struct Cli {
    /// Process given directories recursively.
    #[arg(short, long)]
    recursive: bool,

    /// Use a custom configuration file (default: ./codefix.toml, then ~/.codefix.toml).
    #[arg(short, long, value_name = "FILE")]
    config: Option<Utf8PathBuf>,

    /// Try to fix validation errors (by reformatting files).
    #[arg(short, long)]
    fix: bool,

    /// Apply the given rule's fixer directly; may be repeated.
    #[arg(short = 'a', long = "apply", value_name = "RULE")]
    apply: Vec<String>,

    /// Print more detailed error information (-vv for debug logging).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// For --fix: do not create a backup file.
    #[arg(long)]
    no_backup: bool,

    /// Read from STDIN and write to STDOUT; the file name only selects rules.
    #[arg(long)]
    filter: bool,

    /// File patterns to exclude (only works with -r).
    #[arg(short, long, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// File patterns to include (only works with -r).
    #[arg(short, long, value_name = "PATTERN")]
    include: Vec<String>,

    /// List of source files to validate.
    #[arg(value_name = "FILES", required = true)]
    files: Vec<Utf8PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("codefix: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = if verbose > 1 { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let (config, mut settings) = config::load(cli.config.as_deref())?;
    if cli.no_backup {
        settings.backup_enabled = false;
    }
    let registry = Registry::builtin();

    if cli.filter {
        run_filter(&cli, &registry, &config)
    } else {
        run_batch(&cli, &registry, &config, &settings)
    }
}

fn run_batch(
    cli: &Cli,
    registry: &Registry,
    config: &RuleSetConfig,
    settings: &FixSettings,
) -> anyhow::Result<ExitCode> {
    let store = FsFileStore;
    let validator = Validator::new(registry, config);
    let reporter = Reporter {
        verbose: cli.verbose > 0,
        quiet: false,
    };
    let mut session = Session::new();
    let mut apply_failed = false;

    for file in &cli.files {
        if cli.recursive && file.is_dir() {
            for path in collect_files(file, config, &cli.exclude, &cli.include) {
                validator.validate_file(&store, &path, &mut session)?;
            }
        } else if !cli.apply.is_empty() {
            let outcome = fix_file(&store, file, &cli.apply, registry, config, settings)?;
            if let FixOutcome::Failed { reason } = outcome {
                println!("{file}: {reason}");
                apply_failed = true;
            }
        } else {
            validator.validate_file(&store, file, &mut session)?;
        }
    }

    reporter.print(&session);

    if !session.has_failures() {
        return Ok(exit(apply_failed));
    }
    if !cli.fix {
        return Ok(ExitCode::from(1));
    }

    let mut unresolved = apply_failed;
    for (path, rules) in session.rules_by_file() {
        let outcome = fix_file(&store, &path, &rules, registry, config, settings)?;
        if let FixOutcome::Failed { reason } = outcome {
            println!("{path}: {reason}");
            unresolved = true;
        }
    }

    // Fixers cover only some rules, so an applied fix does not guarantee a
    // clean file. Re-validate before claiming success.
    let mut recheck = Session::new();
    for (path, _) in session.rules_by_file() {
        validator.validate_file(&store, &path, &mut recheck)?;
    }
    Ok(exit(unresolved || recheck.has_failures()))
}

fn run_filter(
    cli: &Cli,
    registry: &Registry,
    config: &RuleSetConfig,
) -> anyhow::Result<ExitCode> {
    if cli.files.len() != 1 {
        eprintln!("Filter only expects exactly one file name/path");
        return Ok(ExitCode::from(2));
    }
    let path = &cli.files[0];

    let mut content = Vec::new();
    std::io::stdin().read_to_end(&mut content)?;
    let store = MemFileStore::with_file(path.clone(), content.clone());

    let validator = Validator::new(registry, config).filter_mode(true);
    let mut session = Session::new();
    validator.validate_file(&store, path, &mut session)?;

    // Either messages go to stdout or the (fixed) content does, never both.
    let reporter = Reporter {
        verbose: cli.verbose > 0,
        quiet: cli.fix,
    };
    reporter.print(&session);

    if !cli.fix {
        return Ok(exit(session.has_failures()));
    }

    if !session.has_failures() {
        // Nothing to do: stdin passes through untouched.
        write_stdout(&content)?;
        return Ok(ExitCode::SUCCESS);
    }

    let rules = session
        .rules_by_file()
        .into_iter()
        .next()
        .map(|(_, rules)| rules)
        .unwrap_or_default();
    let outcome = fix_file(
        &store,
        path,
        &rules,
        registry,
        config,
        &FixSettings::without_backup(),
    )?;
    match outcome {
        FixOutcome::Applied { .. } => {
            let fixed = store.get(path).unwrap_or(content);
            write_stdout(&fixed)?;
            Ok(ExitCode::SUCCESS)
        }
        FixOutcome::Failed { .. } => {
            write_stdout(&content)?;
            Ok(ExitCode::from(1))
        }
    }
}

fn write_stdout(bytes: &[u8]) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()?;
    Ok(())
}

fn exit(failed: bool) -> ExitCode {
    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
