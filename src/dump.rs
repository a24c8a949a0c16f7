use crate::experiment::Samples;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct Record<'a> {
    sample: &'a str,
    value: f64,
}

/// Write both samples as CSV, one observation per row
pub fn write_samples(out: impl Write, samples: &Samples) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    let rows = samples
        .a
        .iter()
        .map(|&value| Record { sample: "a", value })
        .chain(samples.b.iter().map(|&value| Record { sample: "b", value }));
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn dump(path: &Path, samples: &Samples) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Couldn't create {}", path.display()))?;
    write_samples(file, samples)
}
