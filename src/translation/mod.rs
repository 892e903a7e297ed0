use std::borrow::Cow;

use crate::error::DatabaseError;

mod parsers;
mod scanner;

use parsers::{
    is_block_comment_end, is_block_comment_start, is_line_comment_start, matches_tag,
    try_start_dollar_quote,
};
use scanner::{State, scan_digits, scan_name};

/// A statement rewritten to PostgreSQL `$N` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated<'a> {
    /// The rewritten SQL; borrowed when nothing needed rewriting.
    pub sql: Cow<'a, str>,
    /// Placeholder names in `$N` order (`names[0]` is `$1`). Empty for
    /// statements using positional placeholders.
    pub names: Vec<String>,
}

/// Rewrite `?`, `?N` and `:name` placeholders to PostgreSQL's `$N` form.
///
/// Bare `?` are numbered in order of appearance. Each distinct `:name` gets the
/// number of its first appearance, and repeats reuse it. Existing `$N`
/// placeholders and `::type` casts are left alone.
///
/// Warning: the scanner skips quoted strings, comments and dollar-quoted blocks
/// with a lightweight state machine. It does not know about operators that use
/// `?` (the JSONB `?`, `?|`, `?&` family) or array slices like `a[lo:hi]`; use
/// `$N` placeholders directly in such statements.
/// ```rust
/// use tietokanta::translation::to_postgres_placeholders;
///
/// let t = to_postgres_placeholders("select * from t where a = :a and b = :b or a = :a")?;
/// assert_eq!(t.sql, "select * from t where a = $1 and b = $2 or a = $1");
/// assert_eq!(t.names, vec!["a".to_string(), "b".to_string()]);
/// # Ok::<(), tietokanta::DatabaseError>(())
/// ```
///
/// # Errors
/// Returns `DatabaseError::Parameter` when positional and named placeholders are mixed.
pub fn to_postgres_placeholders(sql: &str) -> Result<Translated<'_>, DatabaseError> {
    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut names: Vec<String> = Vec::new();
    let mut bare_count = 0usize;
    let mut saw_positional = false;
    let mut state = State::Normal;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' => {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = advance;
                    }
                }
                b'?' => {
                    saw_positional = true;
                    let (end, number) = match scan_digits(bytes, idx + 1) {
                        Some((end, digits)) => (end, digits.to_string()),
                        None => {
                            bare_count += 1;
                            (idx + 1, bare_count.to_string())
                        }
                    };
                    splice(&mut out, sql, &mut copied, idx, end, &number);
                    idx = end;
                    continue;
                }
                b':' => {
                    if bytes.get(idx + 1) == Some(&b':') {
                        idx += 2;
                        continue;
                    }
                    if let Some((end, name)) = scan_name(bytes, idx + 1) {
                        let number = match names.iter().position(|n| n == name) {
                            Some(pos) => pos + 1,
                            None => {
                                names.push(name.to_string());
                                names.len()
                            }
                        };
                        splice(&mut out, sql, &mut copied, idx, end, &number.to_string());
                        idx = end;
                        continue;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    idx += tag.len() + 1;
                    state = State::Normal;
                }
            }
        }
        idx += 1;
    }

    if saw_positional && !names.is_empty() {
        return Err(DatabaseError::Parameter(
            "cannot mix positional (?) and named (:name) placeholders".into(),
        ));
    }

    let sql = match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    };
    Ok(Translated { sql, names })
}

/// Replace `sql[start..end]` with `$number`, copying anything skipped since the
/// last replacement.
fn splice(
    out: &mut Option<String>,
    sql: &str,
    copied: &mut usize,
    start: usize,
    end: usize,
    number: &str,
) {
    let buf = out.get_or_insert_with(|| String::with_capacity(sql.len() + 8));
    buf.push_str(&sql[*copied..start]);
    buf.push('$');
    buf.push_str(number);
    *copied = end;
}
