use std::str::FromStr;

use anyhow::{Error, anyhow, bail};

use crate::selection::Category;

/// Requests delivered to the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Select(Category, String),
    Deselect(Category, String),
    Toggle(Category, String),
    /// Replace the whole set with the listed names.
    Only(Category, Vec<String>),
    SelectAll(Category),
    SelectNone(Category),
    ToggleOverlay,
    TogglePlayback,
    Reload,
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    /// Parse one line of the text command language, e.g. `select tag x`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| anyhow!("empty command"))?;
        let mut category = || -> Result<Category, Error> {
            words
                .next()
                .ok_or_else(|| anyhow!("`{verb}` needs a category"))?
                .parse()
        };
        let cmd = match verb {
            "next" | "n" => Self::Next,
            "prev" | "previous" | "p" => Self::Previous,
            "overlay" => Self::ToggleOverlay,
            "play" | "pause" => Self::TogglePlayback,
            "reload" => Self::Reload,
            "quit" | "exit" | "q" => Self::Quit,
            "all" => Self::SelectAll(category()?),
            "none" => Self::SelectNone(category()?),
            "select" | "deselect" | "toggle" | "only" => {
                let category = category()?;
                let names: Vec<String> = words.by_ref().map(str::to_owned).collect();
                if verb == "only" {
                    return Ok(Self::Only(category, names));
                }
                // Names may contain spaces; the rest of the line is the name.
                let name = names.join(" ");
                if name.is_empty() {
                    bail!("`{verb} {category}` needs a name");
                }
                match verb {
                    "select" => Self::Select(category, name),
                    "deselect" => Self::Deselect(category, name),
                    _ => Self::Toggle(category, name),
                }
            }
            other => bail!("unknown command `{other}`"),
        };
        if let Some(extra) = words.next() {
            bail!("unexpected argument `{extra}` after `{verb}`");
        }
        Ok(cmd)
    }
}
