//! Character-by-character reveal of the prediction.

use std::io::{self, Write};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::AppSection;

/// Timing of the reveal; disabled prints whole lines.
#[derive(Debug, Clone, Copy)]
pub struct Reveal {
    enabled: bool,
    title_delay: Duration,
    result_delay: Duration,
    pause: Duration,
}

impl Reveal {
    pub fn from_config(app: &AppSection, enabled: bool) -> Self {
        Self {
            enabled,
            title_delay: app.title_delay(),
            result_delay: app.result_delay(),
            pause: app.pause(),
        }
    }

    pub fn instant() -> Self {
        Self {
            enabled: false,
            title_delay: Duration::ZERO,
            result_delay: Duration::ZERO,
            pause: Duration::ZERO,
        }
    }

    /// Writes the title, pauses, then writes the formatted time.
    pub async fn show<W: Write>(&self, out: &mut W, title: &str, result: &str) -> io::Result<()> {
        if !self.enabled {
            writeln!(out, "{}", title)?;
            return writeln!(out, "{}", result);
        }

        type_out(out, title, self.title_delay).await?;
        sleep(self.pause).await;
        type_out(out, result, self.result_delay).await
    }
}

/// Writes `text` one character at a time, then a newline.
pub async fn type_out<W: Write>(out: &mut W, text: &str, delay: Duration) -> io::Result<()> {
    let mut buf = [0u8; 4];
    for c in text.chars() {
        out.write_all(c.encode_utf8(&mut buf).as_bytes())?;
        out.flush()?;
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
    writeln!(out)?;
    out.flush()
}
