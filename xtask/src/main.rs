use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_PACKAGE: &str = "submission_relay_lambda";
const LAMBDA_BINARY: &str = "submission_relay";
const DIST_DIR: &str = "infra/submission_relay/dist";
/// Entry name the `provided.al2023` runtime executes.
const BOOTSTRAP_ENTRY: &str = "bootstrap";

type TaskResult = Result<(), String>;

#[derive(Parser)]
#[command(name = "xtask", about = "Checks and packaging for the submission relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy and the crate test suites
    Ci {
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Build the relay binary and zip it as a Lambda `bootstrap`
    ServerlessPackage {
        #[arg(
            long,
            env = "RELAY_LAMBDA_TARGET",
            default_value = "x86_64-unknown-linux-gnu"
        )]
        target: String,
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
        /// Directory the zip is written to
        #[arg(long, default_value = DIST_DIR)]
        out_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CiJob {
    Lint,
    Test,
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

/// One cross-compiled relay binary and where its zip lands.
struct LambdaArtifact<'a> {
    target: &'a str,
    profile: BuildProfile,
    out_dir: &'a Path,
}

impl LambdaArtifact<'_> {
    fn build_args(&self) -> Vec<&str> {
        let mut args = vec![
            "build",
            "-p",
            LAMBDA_PACKAGE,
            "--bin",
            LAMBDA_BINARY,
            "--target",
            self.target,
        ];
        if matches!(self.profile, BuildProfile::Release) {
            args.push("--release");
        }
        args
    }

    fn binary_path(&self) -> PathBuf {
        let profile_dir = match self.profile {
            BuildProfile::Debug => "debug",
            BuildProfile::Release => "release",
        };
        Path::new("target")
            .join(self.target)
            .join(profile_dir)
            .join(LAMBDA_BINARY)
    }

    fn zip_path(&self) -> PathBuf {
        self.out_dir.join(format!("{LAMBDA_BINARY}.zip"))
    }

    fn package(&self) -> TaskResult {
        cargo(&self.build_args())?;

        let binary_path = self.binary_path();
        let binary = fs::read(&binary_path)
            .map_err(|error| format!("cannot read {}: {error}", binary_path.display()))?;
        fs::create_dir_all(self.out_dir)
            .map_err(|error| format!("cannot create {}: {error}", self.out_dir.display()))?;

        let zip_path = self.zip_path();
        write_bootstrap_zip(&binary, &zip_path)?;
        eprintln!("packaged {} ({} bytes)", zip_path.display(), binary.len());
        Ok(())
    }
}

fn write_bootstrap_zip(binary: &[u8], zip_path: &Path) -> TaskResult {
    let zip_error = |error: zip::result::ZipError| format!("{}: {error}", zip_path.display());

    let file = fs::File::create(zip_path)
        .map_err(|error| format!("cannot create {}: {error}", zip_path.display()))?;
    let mut archive = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    archive
        .start_file(BOOTSTRAP_ENTRY, options)
        .map_err(zip_error)?;
    archive
        .write_all(binary)
        .map_err(|error| format!("{}: {error}", zip_path.display()))?;
    archive.finish().map_err(zip_error)?;
    Ok(())
}

fn cargo(args: &[&str]) -> TaskResult {
    eprintln!("+ cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .map_err(|error| format!("failed to spawn cargo: {error}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("`cargo {}` exited with {status}", args.join(" ")))
    }
}

fn ci(job: CiJob) -> TaskResult {
    if matches!(job, CiJob::Lint | CiJob::Check) {
        cargo(&["fmt", "--all", "--", "--check"])?;
        cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?;
    }
    if matches!(job, CiJob::Test | CiJob::Check) {
        cargo(&["test", "-p", "submission_relay_core"])?;
        cargo(&["test", "-p", LAMBDA_PACKAGE])?;
    }
    Ok(())
}

fn main() {
    let result = match Cli::parse().command {
        Commands::Ci { job } => ci(job),
        Commands::ServerlessPackage {
            target,
            profile,
            out_dir,
        } => {
            let artifact = LambdaArtifact {
                target: &target,
                profile,
                out_dir: &out_dir,
            };
            artifact.package()
        }
    };

    if let Err(message) = result {
        eprintln!("xtask: {message}");
        exit(1);
    }
}
