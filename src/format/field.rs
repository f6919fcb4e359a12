use crate::err::{FormatError, Result};
use crate::pdu;
use crate::renderer::RenderContext;

use std::fmt::{Display, Write};
use std::iter;

/// Width of the nanoseconds field when the directive does not set one.
const DEFAULT_NANOS_WIDTH: usize = 9;

/// The `-` and width part of a `%-12x` directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FieldSpec {
    pub left_justify: bool,
    pub width: Option<usize>,
}

/// Appends the value of the field named by `field` to `out`.
///
/// Unknown field letters are echoed back as-is.
pub(crate) fn write_field(
    out: &mut String,
    field: char,
    spec: FieldSpec,
    ctx: &RenderContext<'_>,
) -> Result<()> {
    let event = ctx.event;

    match field {
        'a' => write_padded(out, spec, ctx.label)?,
        'c' => write_padded(out, spec, ctx.cpu)?,
        'C' => write_padded(out, spec, &event.comm)?,
        'd' => write_padded(out, spec, event.rwbs())?,
        // width ignored
        'D' => write!(out, "{}", event.device)?,
        'e' => write_padded(out, spec, event.error)?,
        'M' => write_padded(out, spec, event.device.major)?,
        'm' => write_padded(out, spec, event.device.minor)?,
        'n' => write_padded(out, spec, event.sector_count())?,
        'N' => write_padded(out, spec, event.byte_count)?,
        'p' => write_padded(out, spec, event.pid)?,
        // width ignored
        'P' => {
            pdu::write_pdu_dump(out, ctx.payload());
        }
        's' => write_padded(out, spec, event.sequence as i64)?,
        'S' => write_padded(out, spec, event.sector)?,
        't' => {
            let width = spec.width.unwrap_or(DEFAULT_NANOS_WIDTH);
            write_zero_padded(out, width, event.time.nanoseconds)?;
        }
        'T' => write_padded(out, spec, event.time.seconds)?,
        'u' => {
            let elapsed = ctx.elapsed.ok_or(FormatError::MissingElapsed)?;
            write_padded(out, spec, elapsed / 1000)?;
        }
        'U' => write_padded(out, spec, pdu::read_be_u64(ctx.payload())?)?,
        other => write_padded(out, spec, other)?,
    }

    Ok(())
}

/// Writes `value`, padded with spaces up to the field width. Never truncates.
fn write_padded(out: &mut String, spec: FieldSpec, value: impl Display) -> Result<()> {
    let start = out.len();
    write!(out, "{value}")?;

    if let Some(width) = spec.width {
        let written = out[start..].chars().count();
        if written < width {
            let fill = width - written;
            if spec.left_justify {
                out.extend(iter::repeat_n(' ', fill));
            } else {
                out.insert_str(start, &" ".repeat(fill));
            }
        }
    }

    Ok(())
}

fn write_zero_padded(out: &mut String, width: usize, value: impl Display) -> Result<()> {
    let start = out.len();
    write!(out, "{value}")?;

    let written = out.len() - start;
    if written < width {
        out.insert_str(start, &"0".repeat(width - written));
    }

    Ok(())
}
