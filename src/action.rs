use bitflags::bitflags;
use std::fmt;

/// Number of bits the category flags are shifted by inside a raw action word.
pub const ACTION_CATEGORY_SHIFT: u32 = 16;

bitflags! {
    /// Category bits of a trace action word (the upper half of the raw `action` field).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ActionFlags: u16 {
        const READ     = 1 << 0;
        const WRITE    = 1 << 1;
        const BARRIER  = 1 << 2;
        const SYNC     = 1 << 3;
        const QUEUE    = 1 << 4;
        const REQUEUE  = 1 << 5;
        const ISSUE    = 1 << 6;
        const COMPLETE = 1 << 7;
        const FS       = 1 << 8;
        /// Packet command, the payload is a raw command block.
        const PC       = 1 << 9;
        const NOTIFY   = 1 << 10;
        const AHEAD    = 1 << 11;
        const META     = 1 << 12;
        const DISCARD  = 1 << 13;
        const DRV_DATA = 1 << 14;
        const FUA      = 1 << 15;
    }
}

impl ActionFlags {
    /// Extracts the category bits from a raw action word.
    pub fn from_action_word(action: u32) -> Self {
        ActionFlags::from_bits_retain((action >> ACTION_CATEGORY_SHIFT) as u16)
    }

    pub fn is_pc(self) -> bool {
        self.contains(ActionFlags::PC)
    }
}

/// What happened to an I/O request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    Remap,
    BackMerge,
    Complete,
    Issue,
    FrontMerge,
    GetRequest,
    Insert,
    Merge,
    Plug,
    Queue,
    Requeue,
    SleepRequest,
    UnplugTimer,
    UnplugIo,
    Bounce,
    Split,
}

impl ActionKind {
    /// Every kind a format template may be registered for.
    ///
    /// `Insert` is missing on purpose: insert events always use the default layout.
    pub const OVERRIDABLE: [ActionKind; 15] = [
        ActionKind::Remap,
        ActionKind::BackMerge,
        ActionKind::Complete,
        ActionKind::Issue,
        ActionKind::FrontMerge,
        ActionKind::GetRequest,
        ActionKind::Merge,
        ActionKind::Plug,
        ActionKind::Queue,
        ActionKind::Requeue,
        ActionKind::SleepRequest,
        ActionKind::UnplugTimer,
        ActionKind::UnplugIo,
        ActionKind::Bounce,
        ActionKind::Split,
    ];

    pub fn letter(self) -> char {
        match self {
            ActionKind::Remap => 'A',
            ActionKind::BackMerge => 'B',
            ActionKind::Complete => 'C',
            ActionKind::Issue => 'D',
            ActionKind::FrontMerge => 'F',
            ActionKind::GetRequest => 'G',
            ActionKind::Insert => 'I',
            ActionKind::Merge => 'M',
            ActionKind::Plug => 'P',
            ActionKind::Queue => 'Q',
            ActionKind::Requeue => 'R',
            ActionKind::SleepRequest => 'S',
            ActionKind::UnplugTimer => 'T',
            ActionKind::UnplugIo => 'U',
            ActionKind::Bounce => 'W',
            ActionKind::Split => 'X',
        }
    }

    pub fn from_letter(letter: char) -> Option<ActionKind> {
        let kind = match letter {
            'A' => ActionKind::Remap,
            'B' => ActionKind::BackMerge,
            'C' => ActionKind::Complete,
            'D' => ActionKind::Issue,
            'F' => ActionKind::FrontMerge,
            'G' => ActionKind::GetRequest,
            'I' => ActionKind::Insert,
            'M' => ActionKind::Merge,
            'P' => ActionKind::Plug,
            'Q' => ActionKind::Queue,
            'R' => ActionKind::Requeue,
            'S' => ActionKind::SleepRequest,
            'T' => ActionKind::UnplugTimer,
            'U' => ActionKind::UnplugIo,
            'W' => ActionKind::Bounce,
            'X' => ActionKind::Split,
            _ => return None,
        };
        Some(kind)
    }

    /// Maps the action code stored in the lower half of a raw action word.
    pub fn from_code(code: u16) -> Option<ActionKind> {
        let kind = match code {
            1 => ActionKind::Queue,
            2 => ActionKind::BackMerge,
            3 => ActionKind::FrontMerge,
            4 => ActionKind::GetRequest,
            5 => ActionKind::SleepRequest,
            6 => ActionKind::Requeue,
            7 => ActionKind::Issue,
            8 => ActionKind::Complete,
            9 => ActionKind::Plug,
            10 => ActionKind::UnplugIo,
            11 => ActionKind::UnplugTimer,
            12 => ActionKind::Insert,
            13 => ActionKind::Split,
            14 => ActionKind::Bounce,
            15 => ActionKind::Remap,
            _ => return None,
        };
        Some(kind)
    }

    /// The default label printed by `%a` and by the default header.
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Remap => "A",
            ActionKind::BackMerge => "B",
            ActionKind::Complete => "C",
            ActionKind::Issue => "D",
            ActionKind::FrontMerge => "F",
            ActionKind::GetRequest => "G",
            ActionKind::Insert => "I",
            ActionKind::Merge => "M",
            ActionKind::Plug => "P",
            ActionKind::Queue => "Q",
            ActionKind::Requeue => "R",
            ActionKind::SleepRequest => "S",
            ActionKind::UnplugTimer => "T",
            ActionKind::UnplugIo => "U",
            ActionKind::Bounce => "W",
            ActionKind::Split => "X",
        }
    }

    pub fn is_overridable(self) -> bool {
        self != ActionKind::Insert
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// The short read/write, barrier, sync summary of an action (`R`, `WS`, `RBS`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RwbsFlags {
    buf: [u8; 3],
    len: usize,
}

impl RwbsFlags {
    pub fn from_flags(flags: ActionFlags) -> Self {
        let mut buf = [0_u8; 3];
        let mut len = 0;

        buf[len] = if flags.contains(ActionFlags::WRITE) {
            b'W'
        } else {
            b'R'
        };
        len += 1;

        if flags.contains(ActionFlags::BARRIER) {
            buf[len] = b'B';
            len += 1;
        }
        if flags.contains(ActionFlags::SYNC) {
            buf[len] = b'S';
            len += 1;
        }

        RwbsFlags { buf, len }
    }

    pub fn as_str(&self) -> &str {
        // Only ever holds ASCII letters.
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or("R")
    }
}

impl fmt::Display for RwbsFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
