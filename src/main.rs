//! ssl-tool - command-line front end
//!
//! Each subcommand resolves its inputs (flags, config defaults, or prompts in
//! `--interactive` mode), checks that input files exist, and calls one library
//! operation. Any error is printed once and the process exits with status 1.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=ssl_tool=debug`).

mod prompt;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ssl_tool::config::{AppConfig, SubjectInput, DEFAULT_CONFIG_PATH};
use ssl_tool::{expiry, fingerprint, generator, pem_codec, subject, verify};

#[derive(Parser)]
#[command(name = "ssl-tool")]
#[command(about = "SSL Tool is a CLI for managing SSL certificates")]
#[command(version)]
struct Cli {
    /// Prompt for every value instead of requiring flags
    #[arg(short, long, global = true)]
    interactive: bool,

    /// Path to the configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a default configuration file
    GenerateConfig {
        /// Where to write the file (defaults to --config)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Generate a new CSR and private key
    GenerateCsr {
        /// Domain name for the CSR
        #[arg(long)]
        domain: Option<String>,

        /// Country (2 letters)
        #[arg(long)]
        country: Option<String>,

        /// Locality (City)
        #[arg(long)]
        locality: Option<String>,

        /// Organization
        #[arg(long)]
        organization: Option<String>,
    },

    /// Extract information from a CRT or CSR and save it to the config file
    ExtractInfo {
        /// Path to the CRT or CSR file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Where to save the extracted defaults (defaults to --config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also print a summary of the file
        #[arg(long)]
        show: bool,
    },

    /// Check how many days until a certificate expires
    CheckExpiration {
        /// Path to the certificate file
        #[arg(long)]
        cert: Option<PathBuf>,
    },

    /// Show the SHA256 fingerprint of a certificate
    Fingerprint {
        /// Path to the certificate file
        #[arg(long)]
        cert: Option<PathBuf>,
    },

    /// Verify that a private key, CSR and certificate match
    VerifyHashes {
        /// Path to the private key file
        #[arg(long)]
        key: Option<PathBuf>,

        /// Path to the CSR file
        #[arg(long)]
        csr: Option<PathBuf>,

        /// Path to the certificate file
        #[arg(long)]
        cert: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    init_logging();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let interactive = cli.interactive;
    match cli.command {
        Commands::GenerateConfig { output } => {
            let path = output.unwrap_or(cli.config);
            AppConfig::template().save(&path)?;
            println!("Configuration template written to {}", path.display());
        }
        Commands::GenerateCsr {
            domain,
            country,
            locality,
            organization,
        } => {
            let config = AppConfig::load_if_exists(&cli.config).context("Error loading config")?;
            debug!(config = %cli.config.display(), "loaded subject defaults");
            let mut input = SubjectInput {
                domain,
                country,
                locality,
                organization,
            }
            .with_defaults(&config);

            if interactive {
                input = prompt_subject(input)?;
            }
            let params = input.require_all()?;
            let generated = generator::generate(&params)?;
            println!(
                "Files generated successfully:\n- Private Key: {}\n- CSR: {}",
                generated.key_path().display(),
                generated.csr_path().display()
            );
        }
        Commands::ExtractInfo { file, output, show } => {
            let file = resolve_path(interactive, "Path to CRT or CSR file", file, "file")?;
            require_file(&file, "input")?;

            let metadata = subject::extract_file(&file)?;
            if show {
                let artifact = pem_codec::decode(&pem_codec::read_file(&file)?)?;
                print!("{}", subject::describe(&artifact.parse()?)?);
            }

            let output = output.unwrap_or(cli.config);
            AppConfig::from(metadata).save(&output)?;
            println!("Information saved to {}", output.display());
        }
        Commands::CheckExpiration { cert } => {
            let cert = resolve_path(interactive, "Path to certificate (.crt)", cert, "cert")?;
            require_file(&cert, "certificate")?;

            let days = expiry::days_until_expiry_file(&cert)?;
            println!("Certificate expires in {} days.", days);
        }
        Commands::Fingerprint { cert } => {
            let cert = resolve_path(interactive, "Path to certificate (.crt)", cert, "cert")?;
            require_file(&cert, "certificate")?;

            let fp = fingerprint::fingerprint_file(&cert)?;
            println!("SHA256 Fingerprint: {}", fp);
        }
        Commands::VerifyHashes {
            key,
            csr,
            cert,
            json,
        } => {
            let (key, csr, cert) = if interactive {
                (
                    resolve_path(true, "Path to private key (.key)", key, "key")?,
                    resolve_path(true, "Path to CSR (.csr)", csr, "csr")?,
                    resolve_path(true, "Path to certificate (.crt)", cert, "cert")?,
                )
            } else {
                match (key, csr, cert) {
                    (Some(key), Some(csr), Some(cert)) => (key, csr, cert),
                    _ => bail!(
                        "missing required parameters: --key, --csr, --cert. Provide flags or use --interactive"
                    ),
                }
            };
            require_file(&key, "key")?;
            require_file(&csr, "csr")?;
            require_file(&cert, "certificate")?;

            let report = verify::verify_files(&key, &csr, &cert)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.matched {
                println!("Hashes match! The private key, CSR, and certificate are consistent.");
            } else {
                println!(
                    "Hashes do not match:\n- Key: {}\n- CSR: {}\n- Certificate: {}",
                    report.hashes.key, report.hashes.csr, report.hashes.cert
                );
            }
        }
    }
    Ok(())
}

fn prompt_subject(input: SubjectInput) -> Result<SubjectInput> {
    let ask = |label: &str, current: Option<String>| -> Result<Option<String>> {
        let answer = prompt::prompt_for(label, current.as_deref().unwrap_or_default())?;
        Ok(Some(answer).filter(|a| !a.is_empty()))
    };
    Ok(SubjectInput {
        domain: ask("Domain", input.domain)?,
        country: ask("Country (2 letters)", input.country)?,
        locality: ask("Locality (City)", input.locality)?,
        organization: ask("Organization", input.organization)?,
    })
}

/// Take a path from its flag, or prompt for it in interactive mode
fn resolve_path(
    interactive: bool,
    label: &str,
    value: Option<PathBuf>,
    flag: &str,
) -> Result<PathBuf> {
    let path = if interactive {
        let current = value
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        PathBuf::from(prompt::prompt_for(label, &current)?)
    } else {
        match value {
            Some(path) => path,
            None => bail!("please provide --{} or use --interactive", flag),
        }
    };
    if path.as_os_str().is_empty() {
        bail!("{} cannot be empty", flag);
    }
    Ok(path)
}

fn require_file(path: &Path, what: &str) -> Result<()> {
    if !path.is_file() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_csr() {
        let cli = Cli::try_parse_from([
            "ssl-tool",
            "generate-csr",
            "--domain",
            "example.com",
            "--country",
            "US",
            "--locality",
            "New York",
            "--organization",
            "TestOrg",
        ])
        .unwrap();
        assert!(!cli.interactive);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        match cli.command {
            Commands::GenerateCsr {
                domain, locality, ..
            } => {
                assert_eq!(domain.as_deref(), Some("example.com"));
                assert_eq!(locality.as_deref(), Some("New York"));
            }
            _ => panic!("Wrong command"),
        }
    }

    #[test]
    fn test_verify_requires_all_paths() {
        let cli = Cli::try_parse_from(["ssl-tool", "verify-hashes", "--key", "a.key"]).unwrap();
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("missing required parameters"));
    }

    #[test]
    fn test_missing_certificate_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.crt");
        let cli = Cli::try_parse_from([
            "ssl-tool",
            "fingerprint",
            "--cert",
            missing.to_str().unwrap(),
        ])
        .unwrap();
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("certificate file does not exist"));
    }

    #[test]
    fn test_extract_info_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let generated = generator::KeyCsrGenerator::new(generator::SubjectParams::new(
            "example.com",
            "US",
            "New York",
            "TestOrg",
        ))
        .output_root(dir.path())
        .generate()
        .unwrap();
        let output = dir.path().join("extracted.toml");

        let cli = Cli::try_parse_from([
            "ssl-tool",
            "extract-info",
            "--file",
            generated.csr_path().to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).unwrap();

        let config = AppConfig::from_file(&output).unwrap();
        assert_eq!(config.default_domain.as_deref(), Some("example.com"));
        assert_eq!(config.default_locality, "New York");
        assert_eq!(config.default_key_size, 2048);
    }
}
