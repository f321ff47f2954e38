//! Command line tokenizer used by hosts that receive a raw line.

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

/// Splits a command line into tokens, shell style.
///
/// Handles:
/// - Whitespace-separated tokens
/// - Single quotes (taken literally) and double quotes
/// - Backslash escapes outside single quotes
///
/// An unterminated quote runs to the end of the line. `""` yields an empty
/// token.
pub fn split_command_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote = Quote::None;
    // Set once the current token has started, so that `""` is kept.
    let mut started = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Quote::Single, '\'') | (Quote::Double, '"') => quote = Quote::None,
            (Quote::Single, c) => current.push(c),
            (_, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                started = true;
            }
            (Quote::Double, c) => current.push(c),
            (Quote::None, '\'') => {
                quote = Quote::Single;
                started = true;
            }
            (Quote::None, '"') => {
                quote = Quote::Double;
                started = true;
            }
            (Quote::None, c) if c.is_whitespace() => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            (Quote::None, c) => {
                current.push(c);
                started = true;
            }
        }
    }

    if started {
        tokens.push(current);
    }

    tokens
}

/// Splits a command line into the command name and its arguments.
///
/// Returns `None` for a blank line.
pub fn parse_command_line(line: &str) -> Option<(String, Vec<String>)> {
    let mut tokens = split_command_line(line).into_iter();
    let name = tokens.next()?;
    Some((name, tokens.collect()))
}
