use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Offset, Utc};
use clap::{Parser, ValueEnum};

/// Filter JSON records with a FIQL query.
///
/// Records are read from a file or stdin and the matching ones are written to
/// stdout as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "fiql-filter", author, version, about, long_about = None)]
pub struct Cli {
    /// Query to evaluate, e.g. 'name==ada*;born<1900'
    #[arg(env = "FIQL_QUERY")]
    pub query: String,

    /// Input file (default: stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Input format (auto-detected from the extension if omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<InputFormat>,

    /// Field holding dates: RFC 3339 strings, date literals or epoch millis
    #[arg(long = "instant", value_name = "FIELD")]
    pub instants: Vec<String>,

    /// Zone for date literals without an offset, e.g. +01:00
    #[arg(long, value_parser = parse_offset, default_value = "+00:00")]
    pub offset: FixedOffset,

    /// Turn \n, \t and \r in query literals into control characters
    #[arg(long)]
    pub unescape_control_sequences: bool,

    /// Print the number of matching records instead of the records
    #[arg(short, long)]
    pub count: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The explicit format, else the one implied by the input extension.
    pub fn input_format(&self) -> InputFormat {
        self.format
            .or_else(|| self.input.as_deref().and_then(InputFormat::from_path))
            .unwrap_or(InputFormat::Jsonl)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum InputFormat {
    /// A JSON array of objects, or a single object
    #[value(name = "json")]
    Json,
    /// One JSON object per line
    #[value(name = "jsonl", alias = "ndjson")]
    Jsonl,
}

impl InputFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "json" => Some(InputFormat::Json),
            "jsonl" | "ndjson" => Some(InputFormat::Jsonl),
            _ => None,
        }
    }
}

/// Parses `Z`, `UTC` or a `±HH:MM` offset (the colon is optional).
pub fn parse_offset(raw: &str) -> Result<FixedOffset, String> {
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }
    raw.parse::<FixedOffset>()
        .map_err(|err| format!("invalid offset '{raw}': expected ±HH:MM ({err})"))
}
