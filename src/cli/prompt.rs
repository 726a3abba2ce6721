//! Line-oriented prompting.
//!
//! Input comes from a [`LineReader`] so the interactive session can run
//! against stdin or a scripted source.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source of input lines. `Ok(None)` means end of input.
#[async_trait]
pub trait LineReader: Send {
    async fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Reads lines from the process's standard input.
///
/// Each read runs on the blocking pool so an interrupt can still be
/// observed while waiting for the user.
#[derive(Debug, Default)]
pub struct StdinLines;

#[async_trait]
impl LineReader for StdinLines {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        tokio::task::spawn_blocking(|| -> io::Result<Option<String>> {
            let mut line = String::new();
            let n = io::stdin().lock().read_line(&mut line)?;
            Ok((n > 0).then_some(line))
        })
        .await
        .map_err(io::Error::other)?
    }
}

/// A fixed list of lines, handed out in order.
#[derive(Debug, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl LineReader for ScriptedLines {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Writes prompts and reads trimmed answers.
pub struct Prompter<R, W> {
    reader: R,
    out: W,
}

impl<R: LineReader, W: Write + Send> Prompter<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self { reader, out }
    }

    /// Show `prompt` and wait for a line. Returns the trimmed answer, or
    /// `None` once input is exhausted.
    pub async fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;
        let line = self.reader.read_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    /// Print a full line.
    pub fn say(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.out, "{}", msg)?;
        self.out.flush()
    }

    /// The output sink, for writing reports between prompts.
    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Consume the prompter, returning its output sink.
    pub fn into_output(self) -> W {
        self.out
    }
}
