//! awimport - upload munki imports to AirWatch
//!
//! Usage:
//!   awimport import [OPTIONS]   # Run one import (usually from the pipeline)
//!   awimport config-path        # Show where the default config file lives
//!
//! Every import option can also come from the environment variable named in
//! `--help`, or from `awimport.toml`.

mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use awimport_core::config::{self, AirWatchConfig, ImporterConfig, MunkiConfig};
use awimport_core::importer::{AssignmentOutcome, ImportCommand, ImportOutcome, ImportReport};
use awimport_core::output::ProcessorOutput;
use awimport_core::request::{ArtifactPaths, ImporterSummary};

use crate::logging::LogFormat;

#[derive(Parser)]
#[command(name = "awimport")]
#[command(about = "Upload munki packages to AirWatch", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config dir>/awimport/awimport.toml)
    #[arg(long, global = true, env = "AWIMPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload the latest import and assign it
    Import(Box<ImportArgs>),

    /// Print the default config file location
    ConfigPath,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Output variables and report as JSON
    Json,
}

#[derive(Args)]
struct ImportArgs {
    /// Path to the munki repo
    #[arg(long, env = "MUNKI_REPO_PATH", value_parser = pipeline_path)]
    repo_path: Option<PathBuf>,

    /// Import even if nothing new was reported (any value but empty/0/false/no)
    #[arg(long, env = "FORCE_IMPORT")]
    force_import: Option<String>,

    /// Base URL of the AirWatch server (e.g. https://myorg.awmdm.com)
    #[arg(long, env = "AIRWATCH_URL")]
    url: Option<String>,

    /// Group ID of the organization group files are uploaded to
    #[arg(long, env = "AIRWATCH_GROUPID")]
    group_id: Option<String>,

    /// AirWatch API token
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// AirWatch API username
    #[arg(long, env = "API_USERNAME")]
    username: Option<String>,

    /// AirWatch API user password
    #[arg(long, env = "API_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Smart group the app is assigned to; assignment is skipped when unset
    #[arg(long, env = "SMART_GROUP_NAME")]
    smart_group: Option<String>,

    /// How AirWatch deploys the app (Auto or OnDemand)
    #[arg(long, env = "PUSH_MODE")]
    push_mode: Option<String>,

    /// Hour of day (0-23) the deployment should begin; blank means unset
    #[arg(long, env = "DEPLOYMENT_TIME")]
    deployment_time: Option<String>,

    /// Request timeout in seconds; uploads only use it as a stall limit
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Connect timeout, in seconds
    #[arg(long)]
    connect_timeout_secs: Option<u64>,

    /// Installer path in the repo, as reported by the importer
    #[arg(long, env = "PKG_REPO_PATH", value_parser = pipeline_path)]
    pkg: Option<PathBuf>,

    /// Pkginfo path in the repo, as reported by the importer
    #[arg(long, env = "PKGINFO_REPO_PATH", value_parser = pipeline_path)]
    pkginfo: Option<PathBuf>,

    /// Icon path in the repo
    #[arg(long, env = "ICON_REPO_PATH", value_parser = pipeline_path)]
    icon: Option<PathBuf>,

    /// App name from the importer summary
    #[arg(long, env = "MUNKI_IMPORTER_NAME", default_value = "")]
    app_name: String,

    /// App version from the importer summary
    #[arg(long, env = "MUNKI_IMPORTER_VERSION", default_value = "")]
    app_version: String,

    /// Pkginfo path from the importer summary; set only when something was imported
    #[arg(long, env = "MUNKI_IMPORTER_PKGINFO_PATH", value_parser = pipeline_path)]
    imported_pkginfo: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,
}

/// Path values from the pipeline may be exported empty; keep them so the
/// core can treat them as absent instead of failing argument parsing.
fn pipeline_path(value: &str) -> std::result::Result<PathBuf, std::convert::Infallible> {
    Ok(PathBuf::from(value))
}

impl ImportArgs {
    /// The flag/environment layer, placed over the config file.
    fn config_layer(&self) -> Result<ImporterConfig> {
        let deployment_time = self
            .deployment_time
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| {
                value
                    .parse::<u32>()
                    .with_context(|| format!("Invalid deployment time `{}`", value))
            })
            .transpose()?;

        Ok(ImporterConfig {
            airwatch: AirWatchConfig {
                url: self.url.clone(),
                group_id: self.group_id.clone(),
                api_token: self.api_token.clone(),
                username: self.username.clone(),
                password: self.password.clone(),
                smart_group_name: self.smart_group.clone(),
                push_mode: self.push_mode.clone(),
                deployment_time,
                timeout_secs: self.timeout_secs,
                connect_timeout_secs: self.connect_timeout_secs,
            },
            munki: MunkiConfig {
                repo_path: self
                    .repo_path
                    .clone()
                    .filter(|path| !path.as_os_str().is_empty()),
                force_import: self.force_import.as_deref().map(config::parse_flag),
            },
        })
    }

    fn summary(&self) -> ImporterSummary {
        let summary = ImporterSummary::new(&self.app_name, &self.app_version);
        match &self.imported_pkginfo {
            Some(path) => summary.with_pkginfo_path(path),
            None => summary,
        }
    }

    fn artifacts(&self) -> ArtifactPaths {
        ArtifactPaths {
            installer: self.pkg.clone(),
            metadata: self.pkginfo.clone(),
            icon: self.icon.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format)?;

    match cli.command {
        Commands::Import(args) => run_import(cli.config, *args).await,
        Commands::ConfigPath => {
            match config::default_config_path() {
                Some(path) => println!("{}", path.display()),
                None => anyhow::bail!("Could not determine config directory"),
            }
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    output: &'a ProcessorOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a ImportReport>,
}

async fn run_import(config_path: Option<PathBuf>, args: ImportArgs) -> Result<()> {
    let file_layer = config::load_config(config_path.as_deref())?;
    let request = file_layer
        .merge(args.config_layer()?)
        .into_request(args.summary(), args.artifacts())?;

    let result = ImportCommand::new().execute(&request).await;
    let output = ProcessorOutput::from_result(&result);

    match args.format {
        OutputFormat::Json => {
            let json = JsonOutput {
                output: &output,
                report: result.as_ref().ok(),
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            if let Ok(report) = &result {
                print_report(report);
            }
        }
    }

    result?;
    Ok(())
}

fn print_report(report: &ImportReport) {
    match &report.outcome {
        ImportOutcome::Skipped { .. } => {
            println!("No updates so nothing to import to AirWatch");
        }
        ImportOutcome::Imported(app) => {
            println!("Imported {} {} to AirWatch", report.name, report.version);
            println!("  OG ID:        {}", app.og_id);
            println!("  App ID:       {}", app.app_id);
            println!("  Pkg blob:     {}", app.installer_blob_id);
            println!("  Pkginfo blob: {}", app.metadata_blob_id);
            if !app.icon_blob_id.is_empty() {
                println!("  Icon blob:    {}", app.icon_blob_id);
            }
            match &app.assignment {
                AssignmentOutcome::Assigned {
                    smart_group,
                    smart_group_id,
                } => println!("  Assigned to:  {} ({})", smart_group, smart_group_id),
                AssignmentOutcome::Failed { smart_group, .. } => {
                    println!("  Assignment to {} failed", smart_group)
                }
                AssignmentOutcome::Skipped => println!("  Not assigned"),
            }
        }
    }

    for warning in &report.warnings {
        println!("warning: {}", warning);
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, ImportArgs};
    use awimport_core::config::{AirWatchConfig, ImporterConfig};
    use awimport_core::gate::{self, GateDecision};
    use clap::{CommandFactory, Parser};

    fn import_args(extra: &[&str]) -> ImportArgs {
        let mut argv = vec!["awimport", "import"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Import(args) => *args,
            Commands::ConfigPath => panic!("expected the import subcommand"),
        }
    }

    #[test]
    fn pipeline_variables_map_to_import_options() {
        let cli = Cli::command();
        let import = cli.find_subcommand("import").unwrap();
        let env_of = |id: &str| {
            import
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .and_then(|env| env.to_str())
                .map(str::to_string)
        };

        let expected = [
            ("repo_path", "MUNKI_REPO_PATH"),
            ("force_import", "FORCE_IMPORT"),
            ("url", "AIRWATCH_URL"),
            ("group_id", "AIRWATCH_GROUPID"),
            ("api_token", "API_TOKEN"),
            ("username", "API_USERNAME"),
            ("password", "API_PASSWORD"),
            ("smart_group", "SMART_GROUP_NAME"),
            ("push_mode", "PUSH_MODE"),
            ("deployment_time", "DEPLOYMENT_TIME"),
            ("pkg", "PKG_REPO_PATH"),
            ("pkginfo", "PKGINFO_REPO_PATH"),
            ("icon", "ICON_REPO_PATH"),
            ("app_name", "MUNKI_IMPORTER_NAME"),
            ("app_version", "MUNKI_IMPORTER_VERSION"),
            ("imported_pkginfo", "MUNKI_IMPORTER_PKGINFO_PATH"),
        ];
        for (id, env) in expected {
            assert_eq!(env_of(id).as_deref(), Some(env), "argument {}", id);
        }
    }

    #[test]
    fn import_flags_fill_the_config_layer() {
        let args = import_args(&[
            "--repo-path",
            "/repo",
            "--url",
            "https://org.example.com",
            "--group-id",
            "GRP1",
            "--force-import",
            "0",
            "--push-mode",
            "OnDemand",
            "--deployment-time",
            "22",
            "--pkg",
            "pkgs/app.pkg",
        ]);
        let layer = args.config_layer().unwrap();

        assert_eq!(layer.airwatch.url.as_deref(), Some("https://org.example.com"));
        assert_eq!(layer.airwatch.group_id.as_deref(), Some("GRP1"));
        assert_eq!(layer.airwatch.push_mode.as_deref(), Some("OnDemand"));
        assert_eq!(layer.airwatch.deployment_time, Some(22));
        assert_eq!(layer.munki.force_import, Some(false));
        assert_eq!(
            args.artifacts().installer.as_deref(),
            Some(std::path::Path::new("pkgs/app.pkg"))
        );
    }

    #[test]
    fn blank_deployment_time_is_unset() {
        let args = import_args(&["--deployment-time", ""]);
        assert_eq!(args.config_layer().unwrap().airwatch.deployment_time, None);

        let args = import_args(&["--deployment-time", "  "]);
        assert_eq!(args.config_layer().unwrap().airwatch.deployment_time, None);
    }

    #[test]
    fn non_numeric_deployment_time_is_rejected() {
        let args = import_args(&["--deployment-time", "tonight"]);
        let err = args.config_layer().unwrap_err();
        assert!(err.to_string().contains("tonight"));
    }

    #[test]
    fn blank_paths_parse_as_absent() {
        let args = import_args(&["--repo-path", "", "--icon", "", "--imported-pkginfo", ""]);
        let layer = args.config_layer().unwrap();

        assert_eq!(layer.munki.repo_path, None);
        assert_eq!(gate::evaluate(&args.summary(), false), GateDecision::NothingNew);
    }

    #[test]
    fn flags_override_the_config_file() {
        let file = ImporterConfig {
            airwatch: AirWatchConfig {
                url: Some("https://file.example.com".into()),
                group_id: Some("FILEGRP".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let args = import_args(&["--url", "https://flag.example.com"]);

        let merged = file.merge(args.config_layer().unwrap());
        assert_eq!(merged.airwatch.url.as_deref(), Some("https://flag.example.com"));
        assert_eq!(merged.airwatch.group_id.as_deref(), Some("FILEGRP"));
    }

    #[test]
    fn summary_without_imported_pkginfo_keeps_the_gate_closed() {
        let args = import_args(&["--app-name", "App", "--app-version", "1.0"]);
        assert_eq!(gate::evaluate(&args.summary(), false), GateDecision::NothingNew);

        let args = import_args(&["--app-name", "App", "--imported-pkginfo", ""]);
        assert_eq!(gate::evaluate(&args.summary(), false), GateDecision::NothingNew);

        let args = import_args(&["--imported-pkginfo", "pkgsinfo/app.pkginfo"]);
        assert_eq!(gate::evaluate(&args.summary(), false), GateDecision::Import);
    }
}
