use std::io::{BufWriter, Write};

use super::encode_record;

/// Buffered record writer producing streams in the acquisition format.
pub struct SampleWriter<W: Write> {
    writer: BufWriter<W>,
    samples_written: u64,
}

impl<W: Write> SampleWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: BufWriter::new(sink),
            samples_written: 0,
        }
    }

    pub fn write_sample(&mut self, sample: i32) -> std::io::Result<()> {
        self.writer.write_all(&encode_record(sample))?;
        self.samples_written += 1;
        Ok(())
    }

    pub fn write_samples<I>(&mut self, samples: I) -> std::io::Result<()>
    where
        I: IntoIterator<Item = i32>,
    {
        for sample in samples {
            self.write_sample(sample)?;
        }
        Ok(())
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Flush buffered records and hand back the sink.
    pub fn finish(self) -> std::io::Result<W> {
        self.writer.into_inner().map_err(|err| err.into_error())
    }
}
