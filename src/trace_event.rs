use crate::action::{ActionFlags, ActionKind, RwbsFlags};
use crate::pdu;
use std::fmt;

const MINOR_BITS: u32 = 20;
const MINOR_MASK: u32 = (1 << MINOR_BITS) - 1;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Size of a sector as reported by `%n` and the default layout.
pub const SECTOR_SHIFT: u32 = 9;

/// Maximal length of a process name.
pub const COMM_LEN: usize = 16;

/// A block device, as a `major,minor` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Device {
    pub major: u32,
    pub minor: u32,
}

impl Device {
    pub fn new(major: u32, minor: u32) -> Self {
        Device { major, minor }
    }

    /// Unpacks a kernel `dev_t` (12 bit major, 20 bit minor).
    pub fn from_dev_t(dev: u32) -> Self {
        Device {
            major: dev >> MINOR_BITS,
            minor: dev & MINOR_MASK,
        }
    }

    pub fn to_dev_t(self) -> u32 {
        (self.major << MINOR_BITS) | (self.minor & MINOR_MASK)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3},{:<3}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp {
    pub seconds: u64,
    /// Always below one second.
    pub nanoseconds: u32,
}

impl Timestamp {
    pub fn from_nanos(nanos: u64) -> Self {
        Timestamp {
            seconds: nanos / NANOS_PER_SEC,
            nanoseconds: (nanos % NANOS_PER_SEC) as u32,
        }
    }
}

/// A single decoded trace event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraceEvent {
    pub device: Device,
    pub sequence: u64,
    pub time: Timestamp,
    pub pid: u32,
    pub comm: String,
    pub sector: u64,
    pub byte_count: u32,
    pub error: i32,
    pub action_flags: ActionFlags,
    /// `None` when the event carried an action code outside the known set.
    pub action_kind: Option<ActionKind>,
    /// The raw action code the event was decoded from, 0 for events built by hand.
    pub action_code: u16,
    pub payload: Vec<u8>,
}

impl TraceEvent {
    /// Transfer length in 512 byte sectors.
    pub fn sector_count(&self) -> u32 {
        self.byte_count >> SECTOR_SHIFT
    }

    pub fn rwbs(&self) -> RwbsFlags {
        pdu::rwbs(self.action_flags)
    }

    /// Decodes a NUL padded process name.
    pub fn comm_from_bytes(raw: &[u8]) -> String {
        let raw = &raw[..raw.len().min(COMM_LEN)];
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        String::from_utf8_lossy(&raw[..end]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_device_from_dev_t() {
        let device = Device::from_dev_t((8 << 20) | 16);
        assert_eq!(device, Device::new(8, 16));
        assert_eq!(device.to_dev_t(), (8 << 20) | 16);
        assert_eq!(device.to_string(), "  8,16 ");
    }

    #[test]
    fn test_timestamp_split() {
        let ts = Timestamp::from_nanos(3_000_000_042);
        assert_eq!(ts.seconds, 3);
        assert_eq!(ts.nanoseconds, 42);
    }

    #[test]
    fn test_sector_count() {
        let event = TraceEvent {
            byte_count: 4096,
            ..Default::default()
        };
        assert_eq!(event.sector_count(), 8);
    }

    #[test]
    fn test_comm_is_nul_trimmed() {
        assert_eq!(TraceEvent::comm_from_bytes(b"kworker/0:1\0\0\0\0\0"), "kworker/0:1");
        assert_eq!(
            TraceEvent::comm_from_bytes(b"a-very-long-process-name"),
            "a-very-long-proc"
        );
    }
}
