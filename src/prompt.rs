//! Interactive prompting for `--interactive` mode.

use std::io::{self, BufRead, Write};

/// Ask for a value on stdin, keeping `default` when the answer is empty
pub fn prompt_for(label: &str, default: &str) -> io::Result<String> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    prompt_with(&mut stdin.lock(), &mut stdout, label, default)
}

pub fn prompt_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    default: &str,
) -> io::Result<String> {
    if default.is_empty() {
        write!(output, "{}: ", label)?;
    } else {
        write!(output, "{} [{}]: ", label, default)?;
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    if answer.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(answer.to_string())
    }
}
