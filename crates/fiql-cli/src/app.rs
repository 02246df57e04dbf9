use std::fs::File;
use std::io::{self, BufReader, Write};

use anyhow::{Context, Result};
use fiql::{EvalOptions, Evaluator, FieldMap};

use crate::cli::Cli;
use crate::records::{read_objects, RecordBuilder};

/// Reads the input, filters it and writes matches (or their count) to `out`.
///
/// Returns the number of matching records.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<usize> {
    let evaluator = Evaluator::new(
        EvalOptions::default()
            .offset(cli.offset)
            .unescape_control_sequences(cli.unescape_control_sequences),
    );

    // Structural errors do not depend on the record.
    if let Err(err) = evaluator.evaluate(&cli.query, &FieldMap::new()) {
        if err.is_syntax() {
            return Err(err).context("Query: invalid syntax");
        }
    }

    let format = cli.input_format();
    let objects = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Input: failed to open {}", path.display()))?;
            read_objects(BufReader::new(file), format)?
        }
        None => read_objects(io::stdin().lock(), format)?,
    };
    tracing::info!("Read {} records ({:?})", objects.len(), format);

    let builder = RecordBuilder::new(cli.instants.iter().cloned(), cli.offset);

    let mut matches = 0;
    for (index, object) in objects.iter().enumerate() {
        let record = builder
            .build(object)
            .with_context(|| format!("Record {index}"))?;
        let hit = evaluator
            .evaluate(&cli.query, &record)
            .with_context(|| format!("Query: failed on record {index}"))?;
        if !hit {
            continue;
        }
        matches += 1;
        if !cli.count {
            serde_json::to_writer(&mut *out, object).context("Output: failed to write record")?;
            writeln!(out).context("Output: failed to write record")?;
        }
    }

    if cli.count {
        writeln!(out, "{matches}").context("Output: failed to write count")?;
    }
    tracing::info!("{} of {} records matched", matches, objects.len());

    Ok(matches)
}
