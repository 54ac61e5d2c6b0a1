//! Directory-scoped rules: these match on the file's path rather than only
//! its content, and carry per-rule dynamic failure messages.

use std::process::{Command, Stdio};
use std::sync::LazyLock;

use camino::Utf8Path;
use regex::Regex;
use tracing::debug;

use crate::registry::{CheckContext, RuleOptions};
use codefix_types::{CheckStatus, Details, RuleError};

static TICKET_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+-[0-9]+").unwrap());
static SET_ROLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)set +role +to +\w+").unwrap());
static SET_SCHEMA_OWNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^ *select +\w+\.set_project_schema_owner_role *\( *'\w+' *\) *;").unwrap()
});
static PSQL_CD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^ *\\cd +").unwrap());
static PSQL_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^ *\\i +(\S+)").unwrap());

const MIGRATION_EXTENSIONS: &[&str] = &[".sql_diff", ".py", ".yml", ".txt", ".md"];

/// Hand `*.sql` files under the database tree to an external SQL parser.
pub(crate) fn check_database_dir(
    ctx: &CheckContext<'_>,
    opts: &RuleOptions,
    details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    if ctx.path.as_str().contains("database/lounge") || ctx.path.extension() != Some("sql") {
        return Ok(CheckStatus::Pass);
    }

    let parser = opts
        .get("parser-bin")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            RuleError::Config("SQL parser binary not configured, set the \"parser-bin\" option".into())
        })?;
    if !Utf8Path::new(parser).is_file() {
        return Err(RuleError::Config(format!(
            "SQL parser binary not found at {parser}"
        )));
    }

    debug!(%parser, path = %ctx.path, "running external SQL parser");
    let status = Command::new(parser)
        .args(["-q", "-c", "-i", ctx.path.as_str()])
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(status) if status.success() => Ok(CheckStatus::Pass),
        Ok(_) => Ok(CheckStatus::Fail),
        Err(err) => {
            details.push(format!("failed to run {parser}: {err}"), None, None);
            Ok(CheckStatus::Fail)
        }
    }
}

/// Migration directory layout: allowed extensions, ticket-named parent
/// directory, filename prefixed with the parent directory name.
pub(crate) fn check_sql_diff_dir(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    _details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    let path = ctx.path.as_str();
    if !MIGRATION_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return Ok(CheckStatus::FailWith(
            "migration files should use .sql_diff, .py, .yml, .md or .txt extension".into(),
        ));
    }

    let parent = ctx.path.parent().and_then(Utf8Path::file_name);
    let Some(parent) = parent.filter(|dir| TICKET_DIR.is_match(dir)) else {
        return Ok(CheckStatus::FailWith(
            "patch should be located in a directory named after its ticket".into(),
        ));
    };

    let filename = ctx.path.file_name().unwrap_or_default();
    if !filename.starts_with(parent) {
        return Ok(CheckStatus::FailWith(
            "filename should start with the parent directory name".into(),
        ));
    }

    Ok(CheckStatus::Pass)
}

/// Migration SQL conventions: a role switch, no `\cd`, includes rooted at
/// `database/`, and a register/unregister call matching the filename.
pub(crate) fn check_sql_diff_sql(
    ctx: &CheckContext<'_>,
    _opts: &RuleOptions,
    _details: &mut Details,
) -> Result<CheckStatus, RuleError> {
    let filename = ctx.path.file_name().unwrap_or_default();
    if filename.ends_with(".py") || filename.ends_with(".yml") {
        return Ok(CheckStatus::Pass);
    }

    let sql = String::from_utf8_lossy(ctx.content);

    if !SET_ROLE.is_match(&sql) && !SET_SCHEMA_OWNER.is_match(&sql) {
        return Ok(CheckStatus::FailWith(
            "set role to ..; or SELECT <schema>.set_project_schema_owner_role('..'); \
             must be present in a db diff"
                .into(),
        ));
    }

    if PSQL_CD.is_match(&sql) {
        return Ok(CheckStatus::FailWith(
            "\\cd is not allowed in db diffs".into(),
        ));
    }

    for capture in PSQL_INCLUDE.captures_iter(&sql) {
        if !capture[1].starts_with("database/") {
            return Ok(CheckStatus::FailWith(
                "include path (\\i) should start with the database/ directory".into(),
            ));
        }
    }

    if filename.contains("rollback") {
        let Some(patch_name) = filename.strip_suffix(".rollback.sql_diff") else {
            return Ok(CheckStatus::FailWith(
                "rollback script should have .rollback.sql_diff extension".into(),
            ));
        };
        if !patch_call("unregister_patch", patch_name)?.is_match(&sql) {
            return Ok(CheckStatus::FailWith(
                "unregister patch not found or patch name does not match the filename".into(),
            ));
        }
    } else {
        let patch_name = filename.strip_suffix(".sql_diff").unwrap_or(filename);
        if !patch_call("register_patch", patch_name)?.is_match(&sql) {
            return Ok(CheckStatus::FailWith(
                "register patch not found or patch name does not match the filename".into(),
            ));
        }
    }

    Ok(CheckStatus::Pass)
}

fn patch_call(function: &str, patch_name: &str) -> Result<Regex, RuleError> {
    let pattern = format!(
        r"(?im)^ *select +_v\.{function} *\( *'{}'",
        regex::escape(patch_name)
    );
    Regex::new(&pattern).map_err(|err| RuleError::Exec(err.into()))
}
