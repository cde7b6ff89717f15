//! Command console
//!
//! Reads one command per line and drives the allocator. Every mutating
//! command is followed by a fresh snapshot render; errors become alerts and
//! never end the session.

use crate::render;
use pagesim_mem::PagedMemory;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const HELP: &str = "\
Commands:
  alloc <name> <size>   allocate a segment of <size> bytes
  free <name>           deallocate every segment named <name>
  access <addr>         probe a byte address
  compact               move allocated pages to the front
  reset                 reinitialize memory and statistics
  show                  pages, segments and statistics
  stats                 statistics and fragmentation only
  help                  this text
  quit                  leave";

/// Parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Alloc { name: String, size: usize },
    Free { name: String },
    Access { addr: usize },
    Compact,
    Reset,
    Show,
    Stats,
    Help,
    Quit,
}

impl Command {
    /// Whether the command can change allocator state
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Command::Alloc { .. }
                | Command::Free { .. }
                | Command::Access { .. }
                | Command::Compact
                | Command::Reset
        )
    }
}

/// Input the console could not turn into a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0} (try 'help')")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("not a non-negative integer: {0}")]
    InvalidNumber(String),
}

fn parse_number(word: &str) -> Result<usize, CommandError> {
    let parsed = match word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => word.parse(),
    };
    parsed.map_err(|_| CommandError::InvalidNumber(word.into()))
}

/// Parse one input line; `Ok(None)` for blank lines and `#` comments
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["alloc", name, size] => Command::Alloc {
            name: (*name).into(),
            size: parse_number(size)?,
        },
        ["alloc", ..] => return Err(CommandError::Usage("alloc <name> <size>")),
        ["free", name] => Command::Free { name: (*name).into() },
        ["free", ..] => return Err(CommandError::Usage("free <name>")),
        ["access", addr] => Command::Access { addr: parse_number(addr)? },
        ["access", ..] => return Err(CommandError::Usage("access <addr>")),
        ["compact"] => Command::Compact,
        ["reset"] => Command::Reset,
        ["show"] => Command::Show,
        ["stats"] => Command::Stats,
        ["help"] | ["?"] => Command::Help,
        ["quit"] | ["exit"] => Command::Quit,
        [word, ..] => return Err(CommandError::Unknown((*word).into())),
        [] => return Ok(None),
    };
    Ok(Some(command))
}

/// Whether the session keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Console session over one allocator
pub struct Session {
    memory: PagedMemory,
}

impl Session {
    pub fn new(memory: PagedMemory) -> Self {
        Self { memory }
    }

    pub fn memory(&self) -> &PagedMemory {
        &self.memory
    }

    /// Run one command, then re-render if it could have changed state
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<Flow> {
        let mutates = command.mutates();
        match command {
            Command::Alloc { name, size } => match self.memory.allocate(&name, size) {
                Ok(pages) => writeln!(out, "Allocated {} ({} bytes) on pages {:?}", name, size, pages)?,
                Err(err) => render::alert(out, err)?,
            },
            Command::Free { name } => {
                let released = self.memory.deallocate(&name);
                if released.segments == 0 {
                    writeln!(out, "No segment named {}", name)?;
                } else {
                    writeln!(
                        out,
                        "Freed {}: {} segment(s), {} page(s)",
                        name, released.segments, released.pages
                    )?;
                }
            }
            Command::Access { addr } => match self.memory.access_address(addr) {
                Ok(hit) => render::hit(out, addr, &hit)?,
                Err(err) => render::alert(out, err)?,
            },
            Command::Compact => {
                let moved = self.memory.compact();
                writeln!(out, "Compacted: {} page(s) moved", moved)?;
            }
            Command::Reset => {
                self.memory.initialize();
                writeln!(out, "Memory reset")?;
            }
            Command::Show => {
                render::all(out, &self.memory.snapshot(), &self.memory.fragmentation())?;
            }
            Command::Stats => {
                render::stats(out, &self.memory.snapshot(), &self.memory.fragmentation())?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }

        if mutates {
            render::all(out, &self.memory.snapshot(), &self.memory.fragmentation())?;
        }
        Ok(Flow::Continue)
    }

    /// Read commands until end of input or `quit`
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W, prompt: bool) -> io::Result<()> {
        if prompt {
            write!(out, "pagesim> ")?;
            out.flush()?;
        }
        for line in input.lines() {
            let line = line?;
            let flow = match parse_line(&line) {
                Ok(Some(command)) => self.execute(command, out)?,
                Ok(None) => Flow::Continue,
                Err(err) => {
                    render::alert(out, err)?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
            if prompt {
                write!(out, "pagesim> ")?;
                out.flush()?;
            }
        }
        out.flush()
    }
}
