//! Minimal LaTeX cleanup for display and label generation.
//!
//! Full transliteration is left to the host; this only removes grouping
//! braces and accent commands so that `{\"O}zt{\"u}rk` sorts and labels as
//! `Ozturk`.

/// Strip braces and single-character accent commands.
pub fn strip_latex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' | '}' => {}
            '~' => out.push(' '),
            '\\' => match chars.peek().copied() {
                // Accents like \" \' \` \^ \~ \= \. apply to the next letter.
                Some(next) if !next.is_alphanumeric() => {
                    chars.next();
                    if next == '&' || next == '%' || next == '$' || next == '_' || next == '#' {
                        out.push(next);
                    }
                }
                Some(_) => {
                    let mut command = String::new();
                    while let Some(&next) = chars.peek() {
                        if next.is_ascii_alphabetic() {
                            command.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    match command.as_str() {
                        "ss" => out.push('ß'),
                        "ae" => out.push('æ'),
                        "AE" => out.push('Æ'),
                        "oe" => out.push('œ'),
                        "OE" => out.push('Œ'),
                        "o" => out.push('ø'),
                        "O" => out.push('Ø'),
                        "l" => out.push('ł'),
                        "L" => out.push('Ł'),
                        "i" => out.push('i'),
                        "aa" => out.push('å'),
                        "AA" => out.push('Å'),
                        // Accent commands with a letter argument (\c{c}, \v{s}, \u{a}) and
                        // unknown commands vanish, keeping their argument.
                        _ => {}
                    }
                    if chars.peek() == Some(&' ') && !command.is_empty() {
                        chars.next();
                    }
                }
                None => {}
            },
            _ => out.push(c),
        }
    }
    out
}
