//! Byte-level encoding rules.

use crate::registry::{CheckContext, RuleOptions};
use codefix_types::{CheckStatus, Details, RuleError};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub(crate) fn check_utf8(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    match std::str::from_utf8(ctx.content) {
        Ok(_) => Ok(CheckStatus::Pass),
        Err(err) => {
            let line = line_of_offset(ctx.content, err.valid_up_to());
            details.push(format!("invalid UTF-8 sequence: {err}"), Some(line), None);
            Ok(CheckStatus::Fail)
        }
    }
}

pub(crate) fn check_ascii(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    _details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    Ok(if ctx.content.is_ascii() {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    })
}

pub(crate) fn check_nobom(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    _details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    Ok(if ctx.content.starts_with(UTF8_BOM) {
        CheckStatus::Fail
    } else {
        CheckStatus::Pass
    })
}

/// 1-based line number of a byte offset.
pub(crate) fn line_of_offset(content: &[u8], offset: usize) -> u32 {
    let upto = offset.min(content.len());
    content[..upto].iter().filter(|&&b| b == b'\n').count() as u32 + 1
}
