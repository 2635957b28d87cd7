use std::io::{BufReader, ErrorKind, Read};

use super::{decode_record, RECORD_LEN};

pub(crate) const READ_BUFFER_LEN: usize = 1 << 16;

/// Lazy sample sequence over a record stream.
///
/// Yields one sample per whole record. A trailing partial record ends the
/// sequence quietly. The first read error is yielded once, after which the
/// reader is exhausted.
pub struct SampleReader<R> {
    reader: BufReader<R>,
    record: [u8; RECORD_LEN],
    samples_read: u64,
    trailing_bytes: usize,
    done: bool,
}

impl<R: Read> SampleReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::with_capacity(READ_BUFFER_LEN, source),
            record: [0; RECORD_LEN],
            samples_read: 0,
            trailing_bytes: 0,
            done: false,
        }
    }

    /// Samples yielded so far.
    pub fn samples_read(&self) -> u64 {
        self.samples_read
    }

    /// Bytes of an incomplete final record that were dropped at end of stream.
    pub fn trailing_bytes(&self) -> usize {
        self.trailing_bytes
    }

    /// Fill the record buffer. Returns the number of bytes read, which is less
    /// than `RECORD_LEN` only at end of stream.
    fn fill_record(&mut self) -> std::io::Result<usize> {
        let mut filled = 0;
        while filled < RECORD_LEN {
            match self.reader.read(&mut self.record[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for SampleReader<R> {
    type Item = std::io::Result<i32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.fill_record() {
            Ok(RECORD_LEN) => {
                self.samples_read += 1;
                Some(Ok(decode_record(self.record)))
            }
            Ok(partial) => {
                self.trailing_bytes = partial;
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for SampleReader<R> {}
