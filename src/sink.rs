// src/sink.rs
//! Batched score output.

use std::io::{BufWriter, Write};

use crate::error::Result;
use crate::export::ScoreRow;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Destination for the dense score table. Rows for one (user, post) key are
/// written at most once per run, so implementations may insert or overwrite.
pub trait ScoreSink {
    /// Writes one batch.
    ///
    /// # Errors
    /// Returns error if the underlying store rejects the batch.
    fn write_batch(&mut self, rows: &[ScoreRow]) -> Result<()>;

    /// Flushes anything still buffered.
    ///
    /// # Errors
    /// Returns error if the final flush fails.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// One JSON object per line.
pub struct JsonLinesSink<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    /// Returns error if the flush fails.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::RankError::from(e.into_error()))
    }
}

impl<W: Write> ScoreSink for JsonLinesSink<W> {
    fn write_batch(&mut self, rows: &[ScoreRow]) -> Result<()> {
        for row in rows {
            serde_json::to_writer(&mut self.writer, row)?;
            self.writer.write_all(b"\n")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Feeds `rows` to `sink` in chunks of `batch_size` and returns the number of
/// rows written.
///
/// # Errors
/// Returns the first error raised by the sink.
pub fn write_scores(sink: &mut dyn ScoreSink, rows: &[ScoreRow], batch_size: usize) -> Result<usize> {
    let mut written = 0;
    for batch in rows.chunks(batch_size.max(1)) {
        sink.write_batch(batch)?;
        written += batch.len();
        log::debug!("Wrote batch of {} scores ({written} total)", batch.len());
    }
    sink.finish()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Batches(Vec<usize>);

    impl ScoreSink for Batches {
        fn write_batch(&mut self, rows: &[ScoreRow]) -> Result<()> {
            self.0.push(rows.len());
            Ok(())
        }
    }

    fn rows(n: i64) -> Vec<ScoreRow> {
        (0..n)
            .map(|i| ScoreRow {
                user_id: 1,
                post_id: i,
                score: 1,
            })
            .collect()
    }

    #[test]
    fn rows_are_chunked() {
        let mut sink = Batches::default();
        let written = write_scores(&mut sink, &rows(2500), DEFAULT_BATCH_SIZE).unwrap();
        assert_eq!(written, 2500);
        assert_eq!(sink.0, vec![1000, 1000, 500]);
    }

    #[test]
    fn zero_batch_size_still_writes() {
        let mut sink = Batches::default();
        assert_eq!(write_scores(&mut sink, &rows(3), 0).unwrap(), 3);
        assert_eq!(sink.0, vec![1, 1, 1]);
    }

    #[test]
    fn json_lines_write_one_row_per_line() {
        let mut sink = JsonLinesSink::new(Vec::new());
        write_scores(&mut sink, &rows(2), 10).unwrap();
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "{\"user_id\":1,\"post_id\":0,\"score\":1}\n{\"user_id\":1,\"post_id\":1,\"score\":1}\n"
        );
    }
}
