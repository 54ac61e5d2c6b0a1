//! Whitespace and indentation rules.

use crate::registry::{CheckContext, RuleOptions};
use codefix_types::{CheckStatus, Details, RuleError};

const INDENT: &[u8] = b"    ";

pub(crate) fn check_invalidpath(
    _ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    _details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    Ok(CheckStatus::Fail)
}

pub(crate) fn check_notabs(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    _details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    Ok(if ctx.content.contains(&b'\t') {
        CheckStatus::Fail
    } else {
        CheckStatus::Pass
    })
}

pub(crate) fn fix_notabs(
    src: &[u8],
    dst: &mut Vec<u8>,
    _opts: &RuleOptions,
) -> Result<(), RuleError> {
    for &b in src {
        if b == b'\t' {
            dst.extend_from_slice(INDENT);
        } else {
            dst.push(b);
        }
    }
    Ok(())
}

pub(crate) fn check_nocr(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    _details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    Ok(if ctx.content.contains(&b'\r') {
        CheckStatus::Fail
    } else {
        CheckStatus::Pass
    })
}

pub(crate) fn fix_nocr(src: &[u8], dst: &mut Vec<u8>, _opts: &RuleOptions) -> Result<(), RuleError> {
    dst.extend(src.iter().copied().filter(|&b| b != b'\r'));
    Ok(())
}

pub(crate) fn check_notrailingws(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    _details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    for line in ctx.content.split(|&b| b == b'\n') {
        let line = trim_end(line, |b| b == b'\r');
        if matches!(line.last(), Some(b' ' | b'\t')) {
            return Ok(CheckStatus::Fail);
        }
    }
    Ok(CheckStatus::Pass)
}

pub(crate) fn fix_notrailingws(
    src: &[u8],
    dst: &mut Vec<u8>,
    _opts: &RuleOptions,
) -> Result<(), RuleError> {
    for line in src.split_inclusive(|&b| b == b'\n') {
        let trimmed = trim_end(line, |b| b.is_ascii_whitespace());
        dst.extend_from_slice(trimmed);
        dst.push(b'\n');
    }
    Ok(())
}

/// Leading indentation must be a multiple of 4 spaces. Lines whose first
/// non-space byte is `*` sitting one column past a 4-space boundary are
/// block-comment continuations (`/** ... */`) and are exempt.
pub(crate) fn check_indent4(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    _details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    for line in ctx.content.split(|&b| b == b'\n') {
        let Some(col) = line.iter().position(|&b| b != b' ') else {
            continue;
        };
        if col % 4 != 0 && !(line[col] == b'*' && col % 4 == 1) {
            return Ok(CheckStatus::Fail);
        }
    }
    Ok(CheckStatus::Pass)
}

fn trim_end(mut line: &[u8], matches: impl Fn(u8) -> bool) -> &[u8] {
    while let Some((&last, rest)) = line.split_last() {
        if !matches(last) {
            break;
        }
        line = rest;
    }
    line
}
