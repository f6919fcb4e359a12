use crate::action::{ActionFlags, ActionKind};
use crate::err::{DecodeError, DecodeResult};
use crate::trace_event::{COMM_LEN, Device, Timestamp, TraceEvent};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor, Read, Write};

/// `magic & TRACE_MAGIC_MASK` of every record, the low byte holds the format version.
pub const TRACE_MAGIC: u32 = 0x6561_7400;
pub const TRACE_MAGIC_MASK: u32 = 0xffff_ff00;
pub const TRACE_VERSION: u8 = 0x07;

pub const TRACE_RECORD_HEADER_SIZE: usize = 64;

/// Byte order a trace file was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Detects the byte order of a record from its leading magic.
    pub fn detect(magic: [u8; 4]) -> Option<Endianness> {
        if LittleEndian::read_u32(&magic) & TRACE_MAGIC_MASK == TRACE_MAGIC {
            Some(Endianness::Little)
        } else if BigEndian::read_u32(&magic) & TRACE_MAGIC_MASK == TRACE_MAGIC {
            Some(Endianness::Big)
        } else {
            None
        }
    }
}

/// The fixed size header in front of every trace record.
///
/// Layout (64 bytes):
///
/// | offset | size | field |
/// |--------|------|-------|
/// | 0  | 4  | magic + version |
/// | 4  | 4  | sequence |
/// | 8  | 8  | time (ns) |
/// | 16 | 8  | sector |
/// | 24 | 4  | bytes |
/// | 28 | 4  | action (code in the low half, category flags in the high half) |
/// | 32 | 4  | pid |
/// | 36 | 4  | device (`dev_t`) |
/// | 40 | 4  | cpu |
/// | 44 | 2  | error |
/// | 46 | 2  | pdu length |
/// | 48 | 16 | comm |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecordHeader {
    pub version: u8,
    pub sequence: u32,
    pub time: u64,
    pub sector: u64,
    pub bytes: u32,
    pub action: u32,
    pub pid: u32,
    pub device: u32,
    pub cpu: u32,
    pub error: u16,
    pub pdu_len: u16,
    pub comm: [u8; COMM_LEN],
}

impl TraceRecordHeader {
    /// Decodes a header, detecting its byte order from the magic.
    ///
    /// `offset` is only used for error reporting.
    pub fn from_bytes(
        buf: &[u8; TRACE_RECORD_HEADER_SIZE],
        offset: u64,
    ) -> DecodeResult<(TraceRecordHeader, Endianness)> {
        let magic = [buf[0], buf[1], buf[2], buf[3]];
        let endianness =
            Endianness::detect(magic).ok_or(DecodeError::InvalidRecordMagic { offset, magic })?;

        let mut cursor = Cursor::new(&buf[..]);
        let header = match endianness {
            Endianness::Little => Self::read_fields::<LittleEndian>(&mut cursor)?,
            Endianness::Big => Self::read_fields::<BigEndian>(&mut cursor)?,
        };

        Ok((header, endianness))
    }

    fn read_fields<B: ByteOrder>(input: &mut Cursor<&[u8]>) -> io::Result<TraceRecordHeader> {
        let magic = input.read_u32::<B>()?;
        let sequence = input.read_u32::<B>()?;
        let time = input.read_u64::<B>()?;
        let sector = input.read_u64::<B>()?;
        let bytes = input.read_u32::<B>()?;
        let action = input.read_u32::<B>()?;
        let pid = input.read_u32::<B>()?;
        let device = input.read_u32::<B>()?;
        let cpu = input.read_u32::<B>()?;
        let error = input.read_u16::<B>()?;
        let pdu_len = input.read_u16::<B>()?;

        let mut comm = [0_u8; COMM_LEN];
        input.read_exact(&mut comm)?;

        Ok(TraceRecordHeader {
            version: (magic & !TRACE_MAGIC_MASK) as u8,
            sequence,
            time,
            sector,
            bytes,
            action,
            pid,
            device,
            cpu,
            error,
            pdu_len,
            comm,
        })
    }

    /// Encodes the header in the byte order `B`.
    pub fn write_to<B: ByteOrder, W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_u32::<B>(TRACE_MAGIC | u32::from(self.version))?;
        out.write_u32::<B>(self.sequence)?;
        out.write_u64::<B>(self.time)?;
        out.write_u64::<B>(self.sector)?;
        out.write_u32::<B>(self.bytes)?;
        out.write_u32::<B>(self.action)?;
        out.write_u32::<B>(self.pid)?;
        out.write_u32::<B>(self.device)?;
        out.write_u32::<B>(self.cpu)?;
        out.write_u16::<B>(self.error)?;
        out.write_u16::<B>(self.pdu_len)?;
        out.write_all(&self.comm)
    }

    /// The action code stored in the low half of the action word.
    pub fn action_code(&self) -> u16 {
        (self.action & 0xffff) as u16
    }
}

/// A decoded record: the header plus its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    pub header: TraceRecordHeader,
    pub endianness: Endianness,
    pub payload: Vec<u8>,
}

impl TraceRecord {
    pub fn cpu(&self) -> u32 {
        self.header.cpu
    }

    pub fn action_kind(&self) -> Option<ActionKind> {
        ActionKind::from_code(self.header.action_code())
    }

    pub fn into_event(self) -> TraceEvent {
        let action_kind = self.action_kind();
        let header = self.header;

        TraceEvent {
            device: Device::from_dev_t(header.device),
            sequence: u64::from(header.sequence),
            time: Timestamp::from_nanos(header.time),
            pid: header.pid,
            comm: TraceEvent::comm_from_bytes(&header.comm),
            sector: header.sector,
            byte_count: header.bytes,
            error: i32::from(header.error),
            action_flags: ActionFlags::from_action_word(header.action),
            action_kind,
            action_code: header.action_code(),
            payload: self.payload,
        }
    }
}
