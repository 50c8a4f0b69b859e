use memchr::{memchr3, memchr_iter};

/// Appends `value` with the dialect escapes applied, without surrounding quotes.
pub fn escape_string_into(out: &mut String, value: &str) {
    let bytes = value.as_bytes();
    if memchr3(b'"', b'\\', b'\n', bytes).is_none() && !bytes.iter().any(|b| *b < 0x20) {
        out.push_str(value);
        return;
    }
    let mut start = 0;
    for (idx, byte) in bytes.iter().enumerate() {
        let escaped = match byte {
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            b'\x08' => "\\b",
            b'\x0c' => "\\f",
            b'"' => "\\\"",
            b'\\' => "\\\\",
            _ => continue,
        };
        if start < idx {
            out.push_str(&value[start..idx]);
        }
        out.push_str(escaped);
        start = idx + 1;
    }
    if start < value.len() {
        out.push_str(&value[start..]);
    }
}

pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    escape_string_into(&mut out, value);
    out.push('"');
    out
}

pub fn count_quotes(line: &str) -> usize {
    memchr_iter(b'"', line.as_bytes()).count()
}

/// `name` -> `Name`, the accessor suffix convention.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
