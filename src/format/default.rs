use crate::action::ActionKind;
use crate::err::Result;
use crate::pdu;
use crate::renderer::RenderContext;

use log::warn;
use std::fmt::Write;

/// Writes the fixed header every default line starts with:
/// `major,minor cpu sequence seconds.nanoseconds pid action rwbs `.
pub(crate) fn write_header(out: &mut String, ctx: &RenderContext<'_>) -> Result<()> {
    let event = ctx.event;

    write!(
        out,
        "{} {:>2} {:>8} {:>5}.{:09} {:>5} {:>2} {:>3} ",
        event.device,
        ctx.cpu,
        event.sequence as i64,
        event.time.seconds,
        event.time.nanoseconds,
        event.pid,
        ctx.label,
        event.rwbs(),
    )?;

    Ok(())
}

/// Writes the default line for `kind`: the header followed by the action specific body.
///
/// `Requeue` has no body, only the header is written (without a line break).
pub(crate) fn write_default(
    out: &mut String,
    kind: ActionKind,
    ctx: &RenderContext<'_>,
) -> Result<()> {
    write_header(out, ctx)?;

    let event = ctx.event;
    let is_pc = event.action_flags.is_pc();

    match kind {
        ActionKind::Complete => {
            if is_pc {
                write_parenthesized_dump(out, ctx.payload());
            } else {
                write!(out, "{} + {} ", event.sector, event.sector_count())?;
                write_elapsed(out, ctx)?;
            }
            writeln!(out, "[{}]", event.error)?;
        }
        ActionKind::Issue | ActionKind::Insert | ActionKind::Queue | ActionKind::Bounce => {
            if is_pc {
                write!(out, "{} ", event.byte_count)?;
                write_parenthesized_dump(out, ctx.payload());
            } else {
                write!(out, "{} + {} ", event.sector, event.sector_count())?;
                write_elapsed(out, ctx)?;
            }
            writeln!(out, "[{}]", event.comm)?;
        }
        ActionKind::BackMerge
        | ActionKind::FrontMerge
        | ActionKind::Merge
        | ActionKind::GetRequest
        | ActionKind::SleepRequest => {
            writeln!(
                out,
                "{} + {} [{}]",
                event.sector,
                event.sector_count(),
                event.comm
            )?;
        }
        ActionKind::Plug => {
            writeln!(out, "[{}]", event.comm)?;
        }
        ActionKind::UnplugIo | ActionKind::UnplugTimer => {
            let depth = pdu::read_be_u64(ctx.payload())?;
            writeln!(out, "[{}] {}", event.comm, depth)?;
        }
        ActionKind::Remap => {
            let remap = pdu::read_remap(ctx.payload())?;
            writeln!(
                out,
                "{} + {} <- ({},{}) {}",
                remap.sector,
                event.sector_count(),
                remap.device.major,
                remap.device.minor,
                event.sector
            )?;
        }
        ActionKind::Split => {
            let split_sector = pdu::read_be_u64(ctx.payload())?;
            writeln!(out, "{} / {} [{}]", event.sector, split_sector, event.comm)?;
        }
        // Requeues can be given a template, but have no built-in body.
        ActionKind::Requeue => warn!("Unknown action {}", kind.letter()),
    }

    Ok(())
}

fn write_parenthesized_dump(out: &mut String, payload: &[u8]) {
    if payload.is_empty() {
        return;
    }
    out.push('(');
    pdu::write_pdu_dump(out, payload);
    out.push_str(") ");
}

fn write_elapsed(out: &mut String, ctx: &RenderContext<'_>) -> Result<()> {
    if let Some(elapsed) = ctx.elapsed {
        write!(out, "({elapsed:>8}) ")?;
    }
    Ok(())
}
