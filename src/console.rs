use anyhow::Result;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Line-based operator prompts over any reader/writer pair
pub struct Console<R, W> {
    input: R,
    output: W,
}

pub type StdConsole = Console<StdinLock<'static>, Stdout>;

pub fn stdio() -> StdConsole {
    Console::new(io::stdin().lock(), io::stdout())
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `prompt` and read one line without its line ending.
    ///
    /// Returns `None` once the input is exhausted.
    pub fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            log::debug!("End of input at prompt: {prompt:?}");
            return Ok(None);
        }
        let answer = line.trim_end_matches(['\r', '\n']).to_owned();
        log::trace!("{prompt:?} -> {answer:?}");
        Ok(Some(answer))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R, W: Write> Write for Console<R, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}
