//! POSIX shell-word splitting for action inputs.
//!
//! [`shlex::split`] treats an unquoted `#` at the start of a word as a
//! comment and drops the rest of the line. Action inputs are file lists and
//! ruff arguments where `#` is an ordinary character, so word-initial `#`
//! is escaped before splitting.

/// Split `value` into words, or `None` on unbalanced quotes or a trailing
/// backslash.
pub fn split(value: &str) -> Option<Vec<String>> {
    shlex::split(&escape_comment_starts(value))
}

fn escape_comment_starts(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    let mut word_start = true;

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' | '\n' => {
                out.push(c);
                word_start = true;
                continue;
            }
            '#' if word_start => out.push_str("\\#"),
            '\\' => {
                out.push(c);
                out.extend(chars.next());
            }
            '\'' => {
                out.push(c);
                for quoted in chars.by_ref() {
                    out.push(quoted);
                    if quoted == '\'' {
                        break;
                    }
                }
            }
            '"' => {
                out.push(c);
                while let Some(quoted) = chars.next() {
                    out.push(quoted);
                    match quoted {
                        '\\' => out.extend(chars.next()),
                        '"' => break,
                        _ => {}
                    }
                }
            }
            _ => out.push(c),
        }
        word_start = false;
    }
    out
}
