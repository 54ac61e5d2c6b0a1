//! SQL statement-termination rule.

use crate::registry::{CheckContext, RuleOptions};
use codefix_types::{CheckStatus, Details, RuleError};

/// After stripping comments, a non-empty SQL file must end with `;`.
pub(crate) fn check_sql_semi_colon(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    _details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    let stripped = strip_comments(ctx.content);
    let trimmed = stripped.trim_ascii();
    Ok(if trimmed.is_empty() || trimmed.ends_with(b";") {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    })
}

pub(crate) fn fix_sql_semi_colon(
    src: &[u8],
    dst: &mut Vec<u8>,
    _opts: &RuleOptions,
) -> Result<(), RuleError> {
    dst.extend_from_slice(src);
    dst.extend_from_slice(b"\n;\n");
    Ok(())
}

#[derive(Clone, Copy, PartialEq)]
enum State {
    Normal,
    /// Inside a `'...'` literal; `''` is an escaped quote, not a terminator.
    Quoted,
    LineComment,
    BlockComment,
}

/// Remove `--` line comments and `/* */` block comments, leaving quoted
/// literals intact.
fn strip_comments(sql: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(sql.len());
    let mut state = State::Normal;
    let mut i = 0;
    while i < sql.len() {
        let b = sql[i];
        let next = sql.get(i + 1).copied();
        match state {
            State::Normal => match (b, next) {
                (b'-', Some(b'-')) => {
                    state = State::LineComment;
                    i += 2;
                    continue;
                }
                (b'/', Some(b'*')) => {
                    state = State::BlockComment;
                    i += 2;
                    continue;
                }
                (b'\'', _) => {
                    state = State::Quoted;
                    out.push(b);
                }
                _ => out.push(b),
            },
            State::Quoted => {
                out.push(b);
                if b == b'\'' {
                    if next == Some(b'\'') {
                        out.push(b'\'');
                        i += 2;
                        continue;
                    }
                    state = State::Normal;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    out.push(b);
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    state = State::Normal;
                    i += 2;
                    continue;
                }
            }
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use pretty_assertions::assert_eq;

    fn run(content: &[u8]) -> CheckStatus {
        let ctx = CheckContext {
            path: Utf8Path::new("a.sql"),
            content,
        };
        let mut details = Details::default();
        check_sql_semi_colon(&ctx, &RuleOptions::new(), &mut details).unwrap()
    }

    #[test]
    fn terminated_statement_passes() {
        assert_eq!(run(b"SELECT 1;\n"), CheckStatus::Pass);
        assert_eq!(run(b"SELECT 1;\n-- trailing comment\n"), CheckStatus::Pass);
        assert_eq!(run(b"SELECT 1; /* done */\n"), CheckStatus::Pass);
    }

    #[test]
    fn unterminated_statement_fails() {
        assert_eq!(run(b"SELECT 1\n"), CheckStatus::Fail);
        assert_eq!(run(b"SELECT 1 -- ;\n"), CheckStatus::Fail);
    }

    #[test]
    fn comment_only_file_passes() {
        assert_eq!(run(b"-- nothing here\n/* or here */\n"), CheckStatus::Pass);
        assert_eq!(run(b""), CheckStatus::Pass);
    }

    #[test]
    fn quoted_literals_are_not_comments() {
        // `--` and `/*` inside a string literal are data.
        assert_eq!(run(b"SELECT '--not a comment';\n"), CheckStatus::Pass);
        assert_eq!(run(b"SELECT 'a/*b' "), CheckStatus::Fail);
        // Escaped quote keeps us inside the literal.
        assert_eq!(run(b"SELECT 'it''s -- fine';\n"), CheckStatus::Pass);
    }

    #[test]
    fn fix_appends_semicolon_line() {
        let mut out = Vec::new();
        fix_sql_semi_colon(b"SELECT 1\n", &mut out, &RuleOptions::new()).unwrap();
        assert_eq!(out, b"SELECT 1\n\n;\n");
    }
}
