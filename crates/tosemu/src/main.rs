use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use kernel::trap::{Dispatcher, TRAP_BIOS, TRAP_GEMDOS, TRAP_XBIOS};
use kernel::{KernelConfig, Machine};
use tosemu::report;
use tracing_subscriber::EnvFilter;
use vm::host_interface::StdHost;

/// Atari ST TOS user-mode emulator tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Host directory mapped to C:\ (overrides TOS_BASE_PATH)
    #[arg(long, global = true)]
    base_path: Option<PathBuf>,

    /// Log every syscall (overrides TOSEMU_TRACE)
    #[arg(long, global = true)]
    trace_syscalls: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a program and print its header, basepage and memory map
    Inspect {
        /// Path to the .PRG/.TOS/.TTP file
        binary: PathBuf,
        /// Command line passed to the program
        args: Vec<String>,
    },
    /// List the GEMDOS, BIOS and XBIOS calls and which ones are serviced
    Calls,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn config(args: &Args) -> KernelConfig {
    let mut config = KernelConfig::from_env();
    if let Some(path) = &args.base_path {
        config.base_path = path.clone();
    }
    config.trace_syscalls |= args.trace_syscalls;
    config
}

fn section(title: &str) {
    println!();
    println!("{}", title.bold().blue());
    println!("{}", "=".repeat(title.len()).blue());
}

fn run(args: Args) -> Result<()> {
    let config = config(&args);
    match &args.command {
        Command::Inspect { binary, args } => inspect(config, binary, args),
        Command::Calls => calls(&config),
    }
}

fn inspect(config: KernelConfig, binary: &Path, args: &[String]) -> Result<()> {
    let program = fs::read(binary).with_context(|| format!("reading {}", binary.display()))?;
    let mut machine = Machine::new(config, StdHost::new()).context("setting up the sandbox")?;
    let image = machine
        .load(&program, args)
        .with_context(|| format!("loading {}", binary.display()))?
        .clone();

    println!("{} {}", "📦".bold(), binary.display().to_string().yellow());
    section("Header");
    report::header_lines(&image).iter().for_each(|line| println!("  {line}"));
    section("Basepage");
    report::basepage_lines(&image).iter().for_each(|line| println!("  {line}"));
    section("Memory map");
    report::memory_map_lines(machine.space())
        .iter()
        .for_each(|line| println!("  {line}"));
    println!("  {}", report::heap_line(&image));
    println!(
        "\n{} entry point 0x{:06x}",
        "✓".green().bold(),
        image.entry_point()
    );

    machine.terminate();
    Ok(())
}

fn calls(config: &KernelConfig) -> Result<()> {
    let dispatcher = Dispatcher::new(config.trace_syscalls);
    for vector in [TRAP_GEMDOS, TRAP_BIOS, TRAP_XBIOS] {
        let table = dispatcher.table(vector)?;
        section(&format!("{} (trap vector 0x{vector:02x})", table.subsystem()));
        for line in report::call_lines(table) {
            if line.ends_with("implemented") {
                println!("  {}", line.green());
            } else {
                println!("  {line}");
            }
        }
    }
    Ok(())
}
