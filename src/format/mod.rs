//! Text rendering of trace events.
//!
//! - `registry`: per-action user templates (`-F <kind>,<fmt>` / `-f <fmt>`)
//! - `template`: the `%[-][width]<field>` template interpreter
//! - `field`: resolution of a single field letter against an event
//! - `default`: the built-in layout used when no template is registered

pub(crate) mod default;
pub(crate) mod field;
mod registry;
pub(crate) mod template;

pub use registry::FormatOverrides;
