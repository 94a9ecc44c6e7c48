#![forbid(unsafe_code)]

//! Console rendition of the observable dictionary demo window.
//!
//! Button presses arrive as text, from `--script` or one per line on stdin.
//! After each press the window prints the notifications its bound view
//! received, then the Keys / Values / Count it now shows.

pub mod cli;
pub mod window;

use std::io::{self, Write};

use tracing::warn;

pub use window::{Button, DemoError, DemoWindow};

/// Feed `presses` to `window`, writing the display to `out` after each.
///
/// Recoverable errors (unknown button, nothing to remove, ...) are reported
/// inline and the loop continues. I/O errors end it.
pub fn run<I, W>(
    window: &mut DemoWindow,
    presses: I,
    show_status: bool,
    out: &mut W,
) -> Result<(), DemoError>
where
    I: IntoIterator<Item = io::Result<String>>,
    W: Write,
{
    writeln!(out, "{}", window.render())?;
    for line in presses {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(out, "> {}", line.trim())?;
        let pressed = line
            .parse::<Button>()
            .and_then(|button| Ok((button, window.press(button)?)));
        match pressed {
            Ok((button, output)) => {
                for event in window.take_events() {
                    writeln!(out, "  {event}")?;
                }
                if let Some(output) = output {
                    writeln!(out, "{output}")?;
                }
                writeln!(out, "{}", window.render())?;
                // The Status button already printed the record.
                if show_status && button != Button::Status {
                    match window.status() {
                        Ok(status) => writeln!(out, "{status}")?,
                        Err(err) => report(out, &err)?,
                    }
                }
            }
            Err(err) if err.is_recoverable() => report(out, &err)?,
            Err(err) => return Err(err),
        }
    }
    out.flush()?;
    Ok(())
}

fn report<W: Write>(out: &mut W, err: &DemoError) -> io::Result<()> {
    warn!(%err, "button press rejected");
    writeln!(out, "error: {err}")
}
