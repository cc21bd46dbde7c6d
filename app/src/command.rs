//! Line commands typed at the `todo>` prompt.

use anyhow::{anyhow, bail, Context, Result};

pub const HELP: &str = "\
commands:
  add <text>     create a todo (bare 'add' re-submits the form)
  toggle <n>     mark row n done / not done
  delete <n>     delete row n
  list           redraw the list
  help           show this message
  quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Empty text submits the form as it stands.
    Add(String),
    /// 1-based row number.
    Toggle(usize),
    /// 1-based row number.
    Delete(usize),
    List,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "add" | "a" => Command::Add(rest.to_string()),
            "toggle" | "t" => Command::Toggle(row_number(rest)?),
            "delete" | "d" | "rm" => Command::Delete(row_number(rest)?),
            "list" | "ls" => Command::List,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("unknown command '{other}' (try 'help')"),
        };
        Ok(Some(command))
    }
}

fn row_number(arg: &str) -> Result<usize> {
    if arg.is_empty() {
        return Err(anyhow!("expected a row number"));
    }
    let n: usize = arg
        .parse()
        .with_context(|| format!("'{arg}' is not a row number"))?;
    if n == 0 {
        bail!("rows are numbered from 1");
    }
    Ok(n)
}
