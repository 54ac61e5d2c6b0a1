/// A line/column-scoped diagnostic attached to one rule failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub message: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl Detail {
    /// Render in the reporting format: `line L, col C: msg`, `line L: msg`,
    /// or just `msg`.
    pub fn render(&self) -> String {
        match (self.line, self.column) {
            (Some(line), Some(col)) => format!("line {line}, col {col}: {}", self.message),
            (Some(line), None) => format!("line {line}: {}", self.message),
            _ => self.message.clone(),
        }
    }
}

/// Sink for the detail records produced during a single check invocation.
///
/// The dispatcher hands a sink to each check and either drains it into the
/// recorded violation (on failure) or clears it (on pass), so records never
/// leak into the next rule's report.
#[derive(Debug, Default)]
pub struct Details(Vec<Detail>);

impl Details {
    pub fn push(&mut self, message: impl Into<String>, line: Option<u32>, column: Option<u32>) {
        self.0.push(Detail {
            message: message.into(),
            line,
            column,
        });
    }

    pub fn drain(&mut self) -> Vec<Detail> {
        std::mem::take(&mut self.0)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
