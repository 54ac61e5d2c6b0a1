//! Structured-format rules: JSON, YAML, XML well-formedness and layout.

use anyhow::Context as _;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, Event};
use serde::Deserialize as _;

use crate::registry::{CheckContext, RuleOptions};
use codefix_types::{CheckStatus, Details, RuleError};

pub(crate) fn check_json(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    match serde_json::from_slice::<serde_json::Value>(ctx.content) {
        Ok(_) => Ok(CheckStatus::Pass),
        Err(err) => {
            details.push(
                err.to_string(),
                Some(err.line() as u32),
                Some(err.column() as u32),
            );
            Ok(CheckStatus::Fail)
        }
    }
}

pub(crate) fn check_yaml(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    // Multi-document streams are valid YAML; validate every document.
    for doc in serde_yaml::Deserializer::from_slice(ctx.content) {
        if let Err(err) = serde_yaml::Value::deserialize(doc) {
            let (line, column) = err
                .location()
                .map(|loc| (Some(loc.line() as u32), Some(loc.column() as u32)))
                .unwrap_or((None, None));
            details.push(err.to_string(), line, column);
            return Ok(CheckStatus::Fail);
        }
    }
    Ok(CheckStatus::Pass)
}

pub(crate) fn check_xml(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    let mut reader = Reader::from_reader(ctx.content);
    reader.config_mut().check_end_names = true;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => return Ok(CheckStatus::Pass),
            Ok(_) => {}
            Err(err) => {
                let (line, column) = line_col(ctx.content, reader.buffer_position() as usize);
                details.push(err.to_string(), Some(line), Some(column));
                return Ok(CheckStatus::Fail);
            }
        }
        buf.clear();
    }
}

/// A file passes when it is byte-identical to its own pretty-printed form.
pub(crate) fn check_xmlfmt(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    _details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    let formatted = pretty_print(ctx.content).map_err(RuleError::Exec)?;
    Ok(if formatted == ctx.content {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    })
}

pub(crate) fn fix_xmlfmt(
    src: &[u8],
    dst: &mut Vec<u8>,
    _opts: &RuleOptions,
) -> Result<(), RuleError> {
    let formatted = pretty_print(src).map_err(RuleError::Exec)?;
    dst.extend_from_slice(&formatted);
    Ok(())
}

/// Re-serialize with 4-space indentation and a canonical XML declaration.
fn pretty_print(content: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut reader = Reader::from_reader(content);
    let config = reader.config_mut();
    config.check_end_names = true;
    config.trim_text(true);

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .context("writing XML declaration")?;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).context("parsing XML")? {
            Event::Eof => break,
            // The source declaration is replaced by the canonical one above.
            Event::Decl(_) => {}
            event => writer.write_event(event).context("writing XML event")?,
        }
        buf.clear();
    }

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

/// 1-based line and column of a byte offset.
fn line_col(content: &[u8], offset: usize) -> (u32, u32) {
    let upto = offset.min(content.len());
    let line = content[..upto].iter().filter(|&&b| b == b'\n').count() as u32 + 1;
    let line_start = content[..upto]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    (line, (upto - line_start) as u32 + 1)
}
