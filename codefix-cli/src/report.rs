//! Plain-text rendering of a validation session.

use codefix_engine::Session;

/// One `<path>: <message>` line per violation, detail lines when verbose,
/// nothing at all when quiet.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    pub verbose: bool,
    pub quiet: bool,
}

impl Reporter {
    pub fn print(&self, session: &Session) {
        if self.quiet {
            return;
        }
        for notice in session.notices() {
            println!("{notice}");
        }
        for violation in session.violations() {
            println!("{}: {}", violation.path, violation.message);
            if self.verbose {
                for detail in &violation.details {
                    println!("  {}", detail.render());
                }
            }
        }
    }
}
