//! Export of solution lists as text.
//!
//! An `ExportPlan` counts the rows it would produce before rendering
//! anything, so callers can ask for confirmation on very large unfolded
//! exports and drop the plan instead.

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::settings::settings;
use crate::solution::{ParsedSolutions, Solution};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportScope {
    All,
    /// References of the solutions passing the current filters.
    Filtered(Vec<usize>),
    /// References of the solutions on the current page.
    Page(Vec<usize>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportForm {
    #[default]
    Folded,
    Unfolded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// One sentence per line.
    #[default]
    Plain,
    /// One double-quoted sentence per line, inner quotes doubled.
    Delimited,
}

impl ParsedSolutions {
    /// Number of concrete sentences the list unfolds to.
    pub fn unfolded_count(&self) -> u128 {
        self.solutions()
            .iter()
            .map(Solution::variation_count)
            .fold(0u128, u128::saturating_add)
    }
}

#[derive(Debug)]
pub struct ExportPlan<'a> {
    solutions: Vec<&'a Solution>,
    form: ExportForm,
    format: ExportFormat,
    rows: u128,
}

impl<'a> ExportPlan<'a> {
    /// Unknown references in a scope are skipped.
    pub fn new(list: &'a ParsedSolutions, scope: &ExportScope, form: ExportForm, format: ExportFormat) -> Self {
        let solutions: Vec<&Solution> = match scope {
            ExportScope::All => list.solutions().iter().collect(),
            ExportScope::Filtered(refs) | ExportScope::Page(refs) => {
                refs.iter().filter_map(|&r| list.get(r)).collect()
            }
        };
        let rows = match form {
            ExportForm::Folded => solutions.len() as u128,
            ExportForm::Unfolded => solutions
                .iter()
                .map(|s| s.variation_count())
                .fold(0u128, u128::saturating_add),
        };
        debug!(?form, ?format, rows, "export planned");
        Self {
            solutions,
            form,
            format,
            rows,
        }
    }

    pub fn rows(&self) -> u128 {
        self.rows
    }

    pub fn needs_confirmation(&self) -> bool {
        self.rows > settings().export.confirm_threshold as u128
    }

    pub fn render(&self) -> String {
        let _span = debug_span!("export_render", rows = self.rows).entered();
        let mut out = String::new();
        for solution in &self.solutions {
            let lines = match self.form {
                ExportForm::Folded => vec![solution.text()],
                ExportForm::Unfolded => solution.variations(),
            };
            for line in lines {
                match self.format {
                    ExportFormat::Plain => out.push_str(&line),
                    ExportFormat::Delimited => {
                        out.push('"');
                        out.push_str(&line.replace('"', "\"\""));
                        out.push('"');
                    }
                }
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    fn compact(patterns: &[&str]) -> ParsedSolutions {
        let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        ParsedSolutions::from_patterns(&patterns, &Locale::new("en"))
    }

    #[test]
    fn test_folded_plain() {
        let list = compact(&["I [am/'m] happy", "Hello"]);
        let plan = ExportPlan::new(&list, &ExportScope::All, ExportForm::Folded, ExportFormat::Plain);
        assert_eq!(plan.rows(), 2);
        assert_eq!(plan.render(), "I [am/'m] happy\nHello\n");
    }

    #[test]
    fn test_unfolded_delimited() {
        let list = compact(&["I [am/'m] \"happy\""]);
        let plan = ExportPlan::new(&list, &ExportScope::All, ExportForm::Unfolded, ExportFormat::Delimited);
        assert_eq!(plan.rows(), 2);
        assert_eq!(
            plan.render(),
            "\"I am \"\"happy\"\"\"\n\"I'm \"\"happy\"\"\"\n"
        );
    }

    #[test]
    fn test_scope_references() {
        let list = compact(&["a", "b", "c"]);
        let plan = ExportPlan::new(
            &list,
            &ExportScope::Page(vec![2, 0, 9]),
            ExportForm::Folded,
            ExportFormat::Plain,
        );
        assert_eq!(plan.render(), "c\na\n");
    }

    #[test]
    fn test_large_export_needs_confirmation() {
        // 2^12 = 4096 variations, above the default threshold
        let pattern = "[a/b] ".repeat(12);
        let list = compact(&[pattern.trim()]);
        assert_eq!(list.unfolded_count(), 4096);
        let unfolded = ExportPlan::new(&list, &ExportScope::All, ExportForm::Unfolded, ExportFormat::Plain);
        assert!(unfolded.needs_confirmation());
        let folded = ExportPlan::new(&list, &ExportScope::All, ExportForm::Folded, ExportFormat::Plain);
        assert!(!folded.needs_confirmation());
    }
}
