#[derive(Clone)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

/// Scan ASCII digits from `start`; returns the end index and the digits.
pub(super) fn scan_digits(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let end = scan_while(bytes, start, |b| b.is_ascii_digit());
    if end == start {
        None
    } else {
        std::str::from_utf8(&bytes[start..end])
            .ok()
            .map(|digits| (end, digits))
    }
}

/// Scan a placeholder name (`[A-Za-z_][A-Za-z0-9_]*`) from `start`.
pub(super) fn scan_name(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let first = *bytes.get(start)?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let end = scan_while(bytes, start + 1, |b| b.is_ascii_alphanumeric() || b == b'_');
    std::str::from_utf8(&bytes[start..end])
        .ok()
        .map(|name| (end, name))
}

fn scan_while(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut idx = start;
    while idx < bytes.len() && pred(bytes[idx]) {
        idx += 1;
    }
    idx
}
