//! Runs the filter as a line-oriented pipeline stage.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::event::Event;
use crate::filter::{FilterOutcome, ZipkinFilter};

/// Counters for one run over an input stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub decoded: u64,
    pub failed: u64,
    /// Lines passed through verbatim because they were not UTF-8 JSON objects.
    pub passed_through: u64,
}

/// Read newline-delimited JSON events from `input`, run `filter` over each
/// and write them to `output`, one per line.
///
/// Blank lines are dropped. Lines that are not UTF-8 JSON objects are
/// written out unchanged.
pub fn run(filter: &ZipkinFilter, mut input: impl BufRead, mut output: impl Write) -> Result<RunStats> {
    let mut stats = RunStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input
            .read_until(b'\n', &mut buf)
            .context("failed reading event")?
            == 0
        {
            break;
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match serde_json::from_slice::<Event>(line) {
            Ok(mut event) => {
                match filter.filter(&mut event) {
                    FilterOutcome::Decoded(_) => stats.decoded += 1,
                    FilterOutcome::Failed { .. } => stats.failed += 1,
                }
                serde_json::to_writer(&mut output, &event).context("failed writing event")?;
            }
            Err(err) => {
                log::warn!(error:% = err; "passing through line that is not a JSON object");
                stats.passed_through += 1;
                output.write_all(line).context("failed writing event")?;
            }
        }
        output.write_all(b"\n").context("failed writing event")?;
    }

    output.flush().context("failed flushing output")?;
    Ok(stats)
}
