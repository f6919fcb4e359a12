use crate::err::{FormatError, Result};
use crate::format::field::{FieldSpec, write_field};
use crate::renderer::RenderContext;

use std::iter::Peekable;
use std::str::Chars;

/// Field widths above this are clamped.
pub(crate) const MAX_FIELD_WIDTH: usize = u16::MAX as usize;

/// Expands `template` for a single event, appending the result to `out`.
///
/// `%[-][width]<field>` directives are resolved against `ctx`, `%%` is a literal `%`,
/// and `\b`, `\n`, `\r`, `\t` are the usual escapes. Everything else is copied through.
pub(crate) fn expand_template(
    out: &mut String,
    template: &str,
    ctx: &RenderContext<'_>,
) -> Result<()> {
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '%' => match chars.peek().copied() {
                // A lone `%` at the end of the template.
                None => out.push('%'),
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                Some(_) => {
                    let spec = parse_field_spec(&mut chars);
                    // `%-12` at the very end has no field letter and prints nothing.
                    if let Some(field) = chars.next() {
                        write_field(out, field, spec, ctx)?;
                    }
                }
            },
            '\\' => {
                let escaped = chars.next().ok_or(FormatError::DanglingEscape)?;
                out.push(unescape(escaped)?);
            }
            other => out.push(other),
        }
    }

    Ok(())
}

fn parse_field_spec(chars: &mut Peekable<Chars<'_>>) -> FieldSpec {
    let left_justify = chars.next_if_eq(&'-').is_some();

    let mut width: Option<usize> = None;
    while let Some(digit) = chars.next_if(char::is_ascii_digit) {
        let digit = digit.to_digit(10).unwrap_or(0) as usize;
        width = Some(
            width
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit)
                .min(MAX_FIELD_WIDTH),
        );
    }

    FieldSpec {
        left_justify,
        width,
    }
}

fn unescape(c: char) -> Result<char> {
    match c {
        'b' => Ok('\u{8}'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        found => Err(FormatError::InvalidEscape { found }),
    }
}
