use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const RUNTIME_BIN: &str = "purge_runtime";
const LAMBDA_ENTRY: &str = "bootstrap";

#[derive(Parser)]
#[command(name = "xtask", about = "Checks and packaging for the cache purge worker")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// fmt + clippy, then the core and lambda test suites
    Ci {
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Zip `purge_runtime` as a `provided.al2023` bootstrap; one artifact
    /// serves every PURGE_CATEGORY deployment
    Package {
        #[arg(long, env = "LAMBDA_TARGET", default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        #[arg(long)]
        debug: bool,
        #[arg(long, default_value = "infra/cache_purge/dist")]
        out_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CiJob {
    Lint,
    Test,
    Check,
}

fn cargo(args: &[&str]) -> Result<(), String> {
    eprintln!("+ cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .map_err(|error| format!("could not start cargo: {error}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("`cargo {}` exited with {status}", args.join(" ")))
    }
}

fn lint() -> Result<(), String> {
    cargo(&["fmt", "--all", "--", "--check"])?;
    cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
}

fn test() -> Result<(), String> {
    for package in ["cache_purge_core", "cache_purge_lambda"] {
        cargo(&["test", "-p", package])?;
    }
    Ok(())
}

/// Writes `binary` as the single executable entry Lambda's custom runtime
/// expects.
fn write_bootstrap_zip<W: Write + Seek>(binary: &[u8], sink: W) -> ZipResult<W> {
    let mut zip = ZipWriter::new(sink);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file(LAMBDA_ENTRY, options)?;
    zip.write_all(binary)?;
    zip.finish()
}

fn package(target: &str, debug: bool, out_dir: &Path) -> Result<PathBuf, String> {
    let mut args = vec!["build", "-p", "cache_purge_lambda", "--bin", RUNTIME_BIN];
    args.extend(["--target", target]);
    if !debug {
        args.push("--release");
    }
    cargo(&args)?;

    let binary_path = Path::new("target")
        .join(target)
        .join(if debug { "debug" } else { "release" })
        .join(RUNTIME_BIN);
    let binary = fs::read(&binary_path)
        .map_err(|error| format!("cannot read {}: {error}", binary_path.display()))?;

    fs::create_dir_all(out_dir)
        .map_err(|error| format!("cannot create {}: {error}", out_dir.display()))?;
    let zip_path = out_dir.join(format!("{RUNTIME_BIN}.zip"));
    let file = fs::File::create(&zip_path)
        .map_err(|error| format!("cannot create {}: {error}", zip_path.display()))?;
    write_bootstrap_zip(&binary, file)
        .map_err(|error| format!("cannot write {}: {error}", zip_path.display()))?;
    Ok(zip_path)
}

fn main() -> ExitCode {
    let outcome = match Cli::parse().command {
        Task::Ci { job: CiJob::Lint } => lint(),
        Task::Ci { job: CiJob::Test } => test(),
        Task::Ci { job: CiJob::Check } => lint().and_then(|()| test()),
        Task::Package {
            target,
            debug,
            out_dir,
        } => package(&target, debug, &out_dir)
            .map(|zip_path| eprintln!("packaged {}", zip_path.display())),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("xtask: {message}");
            ExitCode::FAILURE
        }
    }
}
