//! pagesim - paged memory allocation simulator
//!
//! Drives a [`PagedMemory`] from a command console and re-renders its state
//! after every mutating command.
//!
//! Usage:
//!   pagesim                              # interactive, 1K memory, 64-byte pages
//!   pagesim -m 4K -p 256 --unique-names  # custom geometry
//!   pagesim --script demo.txt -v         # run commands from a file, log at info

mod console;
mod logger;
mod render;

use clap::Parser;
use pagesim_mem::{
    ExternalPolicy, MemoryConfig, NamePolicy, PagedMemory, DEFAULT_PAGE_SIZE, DEFAULT_TOTAL_MEMORY,
};
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use console::Session;

#[derive(Parser)]
#[command(name = "pagesim")]
#[command(about = "Simulate fixed-size paged memory allocation")]
struct Args {
    /// Total simulated memory (e.g., 1024, 4K, 1M)
    #[arg(short, long, value_parser = parse_size, default_value_t = DEFAULT_TOTAL_MEMORY)]
    memory: usize,

    /// Bytes per page (e.g., 64, 4K)
    #[arg(short, long, value_parser = parse_size, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Reject allocations that reuse a live segment name
    #[arg(long)]
    unique_names: bool,

    /// Count only free bytes outside the largest free run as external fragmentation
    #[arg(long)]
    strict_external: bool,

    /// Read commands from a file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn memory_config(&self) -> MemoryConfig {
        let names = if self.unique_names {
            NamePolicy::Unique
        } else {
            NamePolicy::AllowDuplicates
        };
        let external = if self.strict_external {
            ExternalPolicy::OutsideLargestRun
        } else {
            ExternalPolicy::TotalFree
        };
        MemoryConfig::new(self.memory, self.page_size)
            .with_name_policy(names)
            .with_external_policy(external)
    }
}

/// Byte count with optional K/M/G suffix
fn parse_size(s: &str) -> Result<usize, String> {
    let upper = s.trim().to_uppercase();
    let (num_str, mult) = if upper.ends_with('G') || upper.ends_with("GB") {
        (upper.trim_end_matches("GB").trim_end_matches('G'), 1024 * 1024 * 1024)
    } else if upper.ends_with('M') || upper.ends_with("MB") {
        (upper.trim_end_matches("MB").trim_end_matches('M'), 1024 * 1024)
    } else if upper.ends_with('K') || upper.ends_with("KB") {
        (upper.trim_end_matches("KB").trim_end_matches('K'), 1024)
    } else {
        (upper.as_str(), 1)
    };

    num_str
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_mul(mult))
        .ok_or_else(|| format!("invalid size: {}", s))
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = logger::init(logger::level_for(args.verbose)) {
        eprintln!("pagesim: {}", err);
    }

    let memory = match PagedMemory::new(args.memory_config()) {
        Ok(memory) => memory,
        Err(err) => {
            eprintln!("pagesim: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let mut session = Session::new(memory);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match &args.script {
        Some(path) => match File::open(path) {
            Ok(file) => session.run(BufReader::new(file), &mut out, false),
            Err(err) => {
                eprintln!("pagesim: {}: {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            session.run(stdin.lock(), &mut out, interactive)
        }
    };

    log::info!("session ended: {:?}", session.memory().stats());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pagesim: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1024"), Ok(1024));
        assert_eq!(parse_size("4K"), Ok(4096));
        assert_eq!(parse_size("4kb"), Ok(4096));
        assert_eq!(parse_size("1M"), Ok(1024 * 1024));
        assert!(parse_size("").is_err());
        assert!(parse_size("-1").is_err());
        assert!(parse_size("lots").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["pagesim"]);
        let config = args.memory_config();
        assert_eq!(config, MemoryConfig::default());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_policies() {
        let args = Args::parse_from([
            "pagesim",
            "-m",
            "2K",
            "-p",
            "128",
            "--unique-names",
            "--strict-external",
            "-vv",
        ]);
        let config = args.memory_config();
        assert_eq!(config.total_memory, 2048);
        assert_eq!(config.page_size, 128);
        assert_eq!(config.names, NamePolicy::Unique);
        assert_eq!(config.external, ExternalPolicy::OutsideLargestRun);
        assert_eq!(logger::level_for(args.verbose), log::LevelFilter::Debug);
    }

    #[test]
    fn test_args_oversized_geometry_is_rejected() {
        let args = Args::parse_from(["pagesim", "-m", "1G", "-p", "1"]);
        assert!(PagedMemory::new(args.memory_config()).is_err());
    }

    #[test]
    fn test_args_verify() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
