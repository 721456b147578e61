// vdisk/src/main.rs

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use vdisk::utils::{LogLevel, failure, header, quote_if_needed, set_log_level, success};
use vdisk::{Config, Context, log_error, log_info, log_normal, run_batch, run_line};

#[derive(Parser)]
#[command(name = "vdisk", version, about = "VDIC virtual disk command interpreter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the disk images (overrides the config file)
    #[arg(long, global = true)]
    disk_dir: Option<PathBuf>,

    /// Print every executed line and layout details
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print command results and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script of commands, one per line
    Exec {
        /// Script path
        script: PathBuf,
    },
    /// Read commands from standard input until `exit` or end of input
    Shell,
    /// Run a single command, e.g. `vdisk run mkdisk -size=5`
    Run {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    set_log_level(if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    });

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.disk_dir {
        config = config.with_disk_dir(dir);
    }
    log_info!("Disk directory: {}", config.disk_dir.display());
    let mut ctx = Context::new(config);

    match cli.command {
        Commands::Exec { script } => {
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("Failed to read script {}", script.display()))?;
            log_info!("{}", header(&format!("Running {}", script.display())));

            let report = run_batch(&mut ctx, &text);
            for line in &report.lines {
                if line.starts_with("[ERROR]") {
                    eprintln!("{}", failure(line));
                } else {
                    println!("{line}");
                }
            }
            if !report.is_success() {
                anyhow::bail!(
                    "{} of {} commands failed",
                    report.failures,
                    report.executed
                );
            }
            log_info!(
                "{}",
                success(&format!("{} commands executed", report.executed))
            );
        }
        Commands::Shell => {
            log_normal!("Type exit to leave");
            let stdin = io::stdin();
            let mut lines = stdin.lock().lines();
            loop {
                print!("vdisk> ");
                io::stdout().flush()?;
                let Some(line) = lines.next() else { break };
                let line = line?;
                let trimmed = line.trim();
                if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
                    break;
                }
                match run_line(&mut ctx, &line) {
                    Ok(Some(message)) => println!("{message}"),
                    Ok(None) => {}
                    Err(e) => log_error!("{e}"),
                }
            }
        }
        Commands::Run { command } => {
            let line = command
                .iter()
                .map(|arg| quote_if_needed(arg))
                .collect::<Vec<_>>()
                .join(" ");
            match run_line(&mut ctx, &line) {
                Ok(Some(message)) => println!("{message}"),
                Ok(None) => {}
                Err(e) => anyhow::bail!(e),
            }
        }
    }

    Ok(())
}
