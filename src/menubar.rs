use std::io::Write;

use crossterm::{cursor, queue, style, terminal};

/// Key hints shown on the top row while the sequence plays.
pub const HINTS: &[&str] = &["[r] reset calibration", "[q][Esc] quit"];

/// Print a hint, bolding text inside `[...]` brackets and dimming the rest.
pub fn print_hint(out: &mut impl Write, item: &str) -> anyhow::Result<()> {
    let mut rest = item;
    while !rest.is_empty() {
        let (run, attr, tail) = match rest.find('[') {
            Some(0) => {
                let end = rest.find(']').map_or(rest.len(), |close| close + 1);
                (&rest[..end], style::Attribute::Bold, &rest[end..])
            }
            Some(open) => (&rest[..open], style::Attribute::Dim, &rest[open..]),
            None => (rest, style::Attribute::Dim, ""),
        };
        queue!(
            out,
            style::SetAttribute(attr),
            style::Print(run),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        rest = tail;
    }
    Ok(())
}

/// Draw the hint bar on row 0.
pub fn render_hints(out: &mut impl Write) -> anyhow::Result<()> {
    queue!(
        out,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(" "),
    )?;
    for (i, item) in HINTS.iter().enumerate() {
        if i > 0 {
            queue!(out, style::Print("  "))?;
        }
        print_hint(out, item)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_text_survives_styling() {
        let mut buf = Vec::new();
        print_hint(&mut buf, "[r] reset calibration").unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("[r]"));
        assert!(out.contains(" reset calibration"));
    }
}
