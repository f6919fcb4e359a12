use crate::action::ActionKind;
use crate::err::Result;
use crate::format::FormatOverrides;
use crate::format::default::{write_default, write_header};
use crate::format::template::expand_template;
use crate::trace_event::TraceEvent;

use log::warn;
use std::io::Write;

/// Label used for events whose action could not be classified.
pub const UNKNOWN_ACTION_LABEL: &str = "?";

/// Everything a single render call needs to know about an event.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// CPU the event was recorded on.
    pub cpu: u32,
    pub event: &'a TraceEvent,
    /// Text printed by `%a` and by the default header.
    pub label: &'a str,
    /// Time since a correlated earlier event in nanoseconds, `None` when unknown.
    pub elapsed: Option<u64>,
}

impl<'a> RenderContext<'a> {
    pub fn new(cpu: u32, event: &'a TraceEvent) -> Self {
        RenderContext {
            cpu,
            event,
            label: event
                .action_kind
                .map_or(UNKNOWN_ACTION_LABEL, ActionKind::label),
            elapsed: None,
        }
    }

    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn with_elapsed(mut self, elapsed: Option<u64>) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn payload(&self) -> &'a [u8] {
        &self.event.payload
    }
}

/// Renders trace events as text lines, using the registered templates where present.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    overrides: FormatOverrides,
}

impl Renderer {
    pub fn new(overrides: FormatOverrides) -> Self {
        Renderer { overrides }
    }

    pub fn overrides(&self) -> &FormatOverrides {
        &self.overrides
    }

    /// Renders a single event as `kind`.
    ///
    /// The line is only written to `out` once it was fully rendered, a failing field never
    /// leaves a partial line behind.
    pub fn render<W: Write>(
        &self,
        out: &mut W,
        kind: ActionKind,
        ctx: &RenderContext<'_>,
    ) -> Result<()> {
        let line = self.render_to_string(kind, ctx)?;
        out.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Renders an event whose action was decoded externally as a single letter.
    ///
    /// Letters outside the known set only produce the default header, and a warning.
    pub fn render_letter<W: Write>(
        &self,
        out: &mut W,
        letter: char,
        ctx: &RenderContext<'_>,
    ) -> Result<()> {
        match ActionKind::from_letter(letter) {
            Some(kind) => self.render(out, kind, ctx),
            None => {
                warn!("Unknown action {letter}");
                self.render_header_only(out, ctx)
            }
        }
    }

    /// Renders an event using its own decoded action kind.
    pub fn render_event<W: Write>(&self, out: &mut W, ctx: &RenderContext<'_>) -> Result<()> {
        match ctx.event.action_kind {
            Some(kind) => self.render(out, kind, ctx),
            None => {
                warn!("Unknown action code {}", ctx.event.action_code);
                self.render_header_only(out, ctx)
            }
        }
    }

    pub fn render_to_string(&self, kind: ActionKind, ctx: &RenderContext<'_>) -> Result<String> {
        let mut line = String::with_capacity(128);

        match self.overrides.lookup(kind) {
            Some(template) => expand_template(&mut line, template, ctx)?,
            None => write_default(&mut line, kind, ctx)?,
        }

        Ok(line)
    }

    fn render_header_only<W: Write>(&self, out: &mut W, ctx: &RenderContext<'_>) -> Result<()> {
        let mut line = String::with_capacity(64);
        write_header(&mut line, ctx)?;
        out.write_all(line.as_bytes())?;
        Ok(())
    }
}
