use crate::err::{DecodeError, DecodeResult};
use crate::trace_record::{TRACE_RECORD_HEADER_SIZE, TraceRecord, TraceRecordHeader};

use log::trace;
use std::io::{self, Read};

/// Reads consecutive trace records from a byte stream.
///
/// Iteration stops at a clean end of stream. After the first error the stream position is
/// unknown, so the iterator is fused and yields nothing further.
pub struct TraceParser<R: Read> {
    input: R,
    offset: u64,
    done: bool,
}

impl<R: Read> TraceParser<R> {
    pub fn new(input: R) -> Self {
        TraceParser {
            input,
            offset: 0,
            done: false,
        }
    }

    /// Offset of the next record in the stream.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn read_record(&mut self) -> DecodeResult<Option<TraceRecord>> {
        let record_offset = self.offset;

        let mut buf = [0_u8; TRACE_RECORD_HEADER_SIZE];
        let filled = read_fully(&mut self.input, &mut buf)?;
        if filled == 0 {
            return Ok(None);
        }
        if filled < TRACE_RECORD_HEADER_SIZE {
            return Err(DecodeError::TruncatedRecord {
                offset: record_offset,
                need: TRACE_RECORD_HEADER_SIZE,
                have: filled,
            });
        }

        let (header, endianness) = TraceRecordHeader::from_bytes(&buf, record_offset)?;

        let pdu_len = usize::from(header.pdu_len);
        let mut payload = vec![0_u8; pdu_len];
        let filled = read_fully(&mut self.input, &mut payload)?;
        if filled < pdu_len {
            return Err(DecodeError::TruncatedRecord {
                offset: record_offset,
                need: TRACE_RECORD_HEADER_SIZE + pdu_len,
                have: TRACE_RECORD_HEADER_SIZE + filled,
            });
        }

        self.offset += (TRACE_RECORD_HEADER_SIZE + pdu_len) as u64;
        trace!(
            "decoded record {} at offset {} ({} payload bytes)",
            header.sequence, record_offset, pdu_len
        );

        Ok(Some(TraceRecord {
            header,
            endianness,
            payload,
        }))
    }
}

impl<R: Read> Iterator for TraceParser<R> {
    type Item = DecodeResult<TraceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Like `read_exact`, but reports how many bytes were read before the end of the stream.
fn read_fully<R: Read>(input: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
