use std::io::{BufRead, Write};

use tracing::{info, warn};

use crate::generators::{CharacterClass, generate};
use crate::settings::Settings;

const HELP: &str = "\
keys: l/u/n/s toggle lowercase/uppercase/numeric/special, g generate,
      r reset, ? help, q quit; =<number> on its own line sets the length";

/// Keyboard-shortcut loop: every non-whitespace character of a line is one
/// key press.
pub struct Session {
    settings: Settings,
}

enum Flow {
    Continue,
    Quit,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", HELP)?;
        writeln!(out, "{}", self.settings)?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();

            if let Some(length) = line.strip_prefix('=') {
                match self.settings.set_length(length) {
                    Ok(_) => writeln!(out, "{}", self.settings)?,
                    Err(e) => writeln!(out, "error: {}", e)?,
                }
                continue;
            }

            for key in line.chars().filter(|c| !c.is_whitespace()) {
                if let Flow::Quit = self.press(key, out)? {
                    info!("session ended by user");
                    return Ok(());
                }
            }
        }

        info!("session ended at end of input");
        Ok(())
    }

    fn press<W: Write>(&mut self, key: char, out: &mut W) -> std::io::Result<Flow> {
        if let Some(class) = CharacterClass::from_shortcut(key) {
            self.settings.toggle(class);
            writeln!(out, "{}", self.settings)?;
            return Ok(Flow::Continue);
        }

        match key {
            'g' => match self.settings.request().and_then(|request| generate(&request)) {
                Ok(sequence) => writeln!(out, "{}", sequence)?,
                Err(e) => {
                    warn!(error = %e, "generation failed");
                    writeln!(out, "error: {}", e)?;
                }
            },
            'r' => {
                self.settings.reset();
                writeln!(out, "{}", self.settings)?;
            }
            '?' => writeln!(out, "{}", HELP)?,
            'q' => return Ok(Flow::Quit),
            other => writeln!(out, "unknown key `{}`, press ? for help", other)?,
        }

        Ok(Flow::Continue)
    }
}
