pub fn escape_string(str: &str) -> String {
    let mut res = String::new();

    for ch in str.chars() {
        match ch {
            '\\' => res.push_str("\\\\"),
            '\t' => res.push_str("\\t"),
            '\n' => res.push_str("\\n"),
            '\r' => res.push_str("\\r"),
            '\x0b' => res.push_str("\\v"),
            '\x0c' => res.push_str("\\f"),
            '"' => res.push_str("\\\""),
            ch => res.push(ch),
        }
    }

    res
}

/// Strip the double quotes from a quoted BNF literal and resolve its escapes.
/// Unknown escapes are kept verbatim.
pub fn unquote(src: &str) -> String {
    let inner = src
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(src);

    let mut res = String::new();
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('t') => res.push('\t'),
                Some('n') => res.push('\n'),
                Some('r') => res.push('\r'),
                Some('v') => res.push('\x0b'),
                Some('f') => res.push('\x0c'),
                Some(ch @ ('\\' | '"')) => res.push(ch),
                Some(ch) => {
                    res.push('\\');
                    res.push(ch);
                }
                None => res.push('\\'),
            }
        } else {
            res.push(ch);
        }
    }

    res
}
