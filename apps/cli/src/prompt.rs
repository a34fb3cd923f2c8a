//! Terminal interaction.
//!
//! Commands talk to the user through [`Prompt`]. On a real terminal that is
//! [`ConsolePrompt`] (dialoguer widgets); piped input and tests use
//! [`LinePrompt`], which reads one answer per line.

use console::Term;
use dialoguer::{Confirm, Input, Select};
use std::fmt::{self, Display};
use std::io::{self, BufRead, Write};

pub trait Prompt {
    /// Show a line of text to the user.
    fn say(&mut self, line: impl Display) -> io::Result<()>;

    /// Write a command's result document.
    fn print(&mut self, document: &str) -> io::Result<()>;

    /// Read free text. `None` when input has ended.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Pick one of `options`, given as `(key, label)` pairs. Returns the index,
    /// or `None` when the user backs out or input has ended.
    fn choose(&mut self, prompt: &str, options: &[(&str, &str)]) -> io::Result<Option<usize>>;

    /// Yes/no question, defaulting to no.
    fn confirm(&mut self, prompt: &str) -> io::Result<Option<bool>>;
}

/// Interactive widgets on the attached terminal.
pub struct ConsolePrompt {
    out: Term,
    term: Term,
}

impl ConsolePrompt {
    /// With `json` set, everything except result documents goes to stderr.
    pub fn new(json: bool) -> Self {
        Self {
            out: if json { Term::stderr() } else { Term::stdout() },
            term: Term::stderr(),
        }
    }
}

impl Prompt for ConsolePrompt {
    fn say(&mut self, line: impl Display) -> io::Result<()> {
        self.out.write_line(&line.to_string())
    }

    fn print(&mut self, document: &str) -> io::Result<()> {
        Term::stdout().write_line(document)
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text_on(&self.term)
            .map(Some)
            .map_err(io::Error::other)
    }

    fn choose(&mut self, prompt: &str, options: &[(&str, &str)]) -> io::Result<Option<usize>> {
        let items: Vec<String> = options.iter().map(|(key, label)| format!("[{key}] {label}")).collect();
        Select::new()
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact_on_opt(&self.term)
            .map_err(io::Error::other)
    }

    fn confirm(&mut self, prompt: &str) -> io::Result<Option<bool>> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact_on_opt(&self.term)
            .map_err(io::Error::other)
    }
}

/// Line-based prompting over any reader and writer.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
    prompts_on_stderr: bool,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            prompts_on_stderr: false,
        }
    }

    /// Send prompts and messages to stderr so `output` only carries results.
    pub fn with_prompts_on_stderr(mut self) -> Self {
        self.prompts_on_stderr = true;
        self
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn chatter(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        if self.prompts_on_stderr {
            let mut stderr = io::stderr();
            stderr.write_fmt(args)?;
            stderr.flush()
        } else {
            self.output.write_fmt(args)?;
            self.output.flush()
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn say(&mut self, line: impl Display) -> io::Result<()> {
        self.chatter(format_args!("{line}\n"))
    }

    fn print(&mut self, document: &str) -> io::Result<()> {
        writeln!(self.output, "{document}")
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.chatter(format_args!("{prompt}: "))?;
        self.read_line()
    }

    fn choose(&mut self, prompt: &str, options: &[(&str, &str)]) -> io::Result<Option<usize>> {
        let menu: Vec<String> = options.iter().map(|(key, label)| format!("[{key}] {label}")).collect();
        let menu = menu.join("  ");

        loop {
            self.chatter(format_args!("{prompt}  {menu}: "))?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let picked = line.trim();
            if let Some(index) = options.iter().position(|(key, _)| key.eq_ignore_ascii_case(picked)) {
                return Ok(Some(index));
            }
            self.chatter(format_args!("Please choose {}.\n", key_list(options)))?;
        }
    }

    fn confirm(&mut self, prompt: &str) -> io::Result<Option<bool>> {
        self.chatter(format_args!("{prompt} [y/N]: "))?;
        let Some(line) = self.read_line()? else {
            return Ok(None);
        };
        let answer = line.trim();
        Ok(Some(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")))
    }
}

/// "1, 2 or 3"
fn key_list(options: &[(&str, &str)]) -> String {
    let keys: Vec<&str> = options.iter().map(|(key, _)| *key).collect();
    match keys.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {last}", rest.join(", ")),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    }
}
