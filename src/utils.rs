//! Small helpers for logging and the interactive prompt.

use std::io::{self, BufRead, Write};

/// Truncate a string for logging purposes.
///
/// Strings longer than `max` characters are cut at a character boundary and
/// suffixed with `"…(+N bytes)"`, where `N` is the number of bytes dropped.
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Print `prompt`, read one line from `input` and return it trimmed and
/// uppercased.
///
/// # Arguments
///
/// * `prompt` - Text written to `output` before reading
/// * `input` - Where the answer is read from (stdin in the binary)
/// * `output` - Where the prompt goes; stderr in the binary, so a JSON
///   report on stdout stays parseable
///
/// # Returns
///
/// The symbol, or `None` on EOF or a blank answer.
pub fn prompt_symbol<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<String>> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let symbol = line.trim().to_uppercase();
    Ok((!symbol.is_empty()).then_some(symbol))
}

/// Use `given` when present, otherwise ask for a symbol with [`prompt_symbol`].
///
/// Either way the symbol comes back trimmed and uppercased, and a blank value
/// is treated as no symbol at all.
pub fn resolve_symbol<R: BufRead, W: Write>(
    given: Option<&str>,
    input: &mut R,
    prompt_output: &mut W,
) -> io::Result<Option<String>> {
    match given {
        Some(s) => Ok(Some(s.trim().to_uppercase()).filter(|s| !s.is_empty())),
        None => prompt_symbol("Enter stock ticker symbol: ", input, prompt_output),
    }
}
