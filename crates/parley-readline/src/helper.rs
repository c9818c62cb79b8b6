//! Line-editing support: command completion, image path completion, usage
//! hints and command highlighting.

use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::commands::COMMANDS;

/// Command whose argument is a file path.
const ATTACH_COMMAND: &str = "/image";

/// Placeholder shown after a command that still needs its argument.
const ATTACH_USAGE: &str = "<path to a png, jpg, gif or webp file>";

/// Splits `line` into the slash command and whatever follows it.
fn split_command(line: &str) -> Option<(&str, Option<&str>)> {
    if !line.starts_with('/') {
        return None;
    }
    Some(match line.split_once(' ') {
        Some((name, rest)) => (name, Some(rest)),
        None => (line, None),
    })
}

/// Hint for the text typed so far: the rest of a partial command name, or
/// the usage of a command awaiting its argument.
pub fn command_hint(line: &str) -> Option<String> {
    match split_command(line)? {
        (name, None) => COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(name) && cmd.len() > name.len())
            .map(|cmd| cmd[name.len()..].to_string()),
        (ATTACH_COMMAND, Some(rest)) if rest.trim().is_empty() => Some(ATTACH_USAGE.to_string()),
        _ => None,
    }
}

/// Colors a known command cyan and an unrecognized one red. The argument
/// and plain messages are left as typed.
pub fn highlight_command(line: &str) -> Cow<'_, str> {
    let Some((name, rest)) = split_command(line) else {
        return Borrowed(line);
    };
    let complete = rest.is_some();
    let known = COMMANDS.contains(&name);
    let partial = !complete && COMMANDS.iter().any(|cmd| cmd.starts_with(name));

    let colored_name = if known || partial {
        name.bright_cyan()
    } else {
        name.red()
    };
    match rest {
        Some(rest) => Owned(format!("{colored_name} {rest}")),
        None => Owned(colored_name.to_string()),
    }
}

/// rustyline helper for the chat prompt.
pub struct CliHelper {
    files: FilenameCompleter,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            files: FilenameCompleter::new(),
        }
    }
}

impl Default for CliHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];

        match split_command(typed) {
            Some((ATTACH_COMMAND, Some(_))) => self.files.complete_path(line, pos),
            Some((name, None)) => {
                let candidates = COMMANDS
                    .iter()
                    .filter(|cmd| cmd.starts_with(name))
                    .map(|cmd| Pair {
                        display: cmd.to_string(),
                        replacement: cmd.to_string(),
                    })
                    .collect();
                Ok((0, candidates))
            }
            _ => Ok((pos, Vec::new())),
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        highlight_command(line)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        // Only hint at the end of the line.
        if pos < line.len() {
            return None;
        }
        command_hint(line)
    }
}

impl Validator for CliHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_completes_partial_command() {
        assert_eq!(command_hint("/his"), Some("tory".to_string()));
        assert_eq!(command_hint("/history"), None);
        assert_eq!(command_hint("olá"), None);
    }

    #[test]
    fn test_hint_shows_image_usage_until_path_is_typed() {
        assert_eq!(command_hint("/image"), None);
        assert_eq!(command_hint("/image "), Some(ATTACH_USAGE.to_string()));
        assert_eq!(command_hint("/image  "), Some(ATTACH_USAGE.to_string()));
        assert_eq!(command_hint("/image foto.png"), None);
        assert_eq!(command_hint("/clear "), None);
    }

    #[test]
    fn test_highlight_leaves_messages_untouched() {
        assert!(matches!(highlight_command("bom dia"), Borrowed("bom dia")));
    }

    #[test]
    fn test_highlight_keeps_argument_text() {
        colored::control::set_override(false);
        assert_eq!(highlight_command("/image ./a b.png"), "/image ./a b.png");
        assert_eq!(highlight_command("/nope"), "/nope");
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("/image x.png"), Some(("/image", Some("x.png"))));
        assert_eq!(split_command("/clear"), Some(("/clear", None)));
        assert_eq!(split_command("hello"), None);
    }
}
