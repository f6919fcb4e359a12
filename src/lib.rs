#![deny(unused_must_use)]
#![forbid(unsafe_code)]
// Don't allow dbg! prints in release.
#![cfg_attr(not(debug_assertions), deny(clippy::dbg_macro))]

//! Text rendering of block I/O trace records.
//!
//! Every event is rendered either with the built-in layout for its action, or with a
//! user supplied template registered for that action in [`FormatOverrides`]:
//!
//! ```
//! use blkfmt::{ActionKind, FormatOverrides, RenderContext, Renderer, TraceEvent};
//!
//! let mut overrides = FormatOverrides::new();
//! overrides.register("Q,%p %S + %n [%C]\\n").unwrap();
//! let renderer = Renderer::new(overrides);
//!
//! let event = TraceEvent {
//!     pid: 42,
//!     sector: 2048,
//!     byte_count: 4096,
//!     comm: "dd".to_owned(),
//!     action_kind: Some(ActionKind::Queue),
//!     ..Default::default()
//! };
//!
//! let line = renderer
//!     .render_to_string(ActionKind::Queue, &RenderContext::new(0, &event))
//!     .unwrap();
//! assert_eq!(line, "42 2048 + 8 [dd]\n");
//! ```

pub mod action;
pub mod err;
pub mod format;
pub mod pdu;
mod renderer;
mod trace_event;
mod trace_parser;
mod trace_record;
mod utils;

pub use action::{ActionFlags, ActionKind, RwbsFlags};
pub use err::{DecodeError, FormatError};
pub use format::FormatOverrides;
pub use renderer::{RenderContext, Renderer, UNKNOWN_ACTION_LABEL};
pub use trace_event::{COMM_LEN, Device, SECTOR_SHIFT, Timestamp, TraceEvent};
pub use trace_parser::TraceParser;
pub use trace_record::{
    Endianness, TRACE_MAGIC, TRACE_RECORD_HEADER_SIZE, TRACE_VERSION, TraceRecord,
    TraceRecordHeader,
};
