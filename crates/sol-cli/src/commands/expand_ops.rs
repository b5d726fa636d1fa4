use std::path::Path;

use serde::Serialize;

use sol_core::solution::{ListKind, ParsedSolutions};

use super::{load_solutions, CliError};

#[derive(Debug, Serialize)]
pub struct ExpandedSolution {
    pub reference: usize,
    pub text: String,
    pub flags: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variations: Option<Vec<String>>,
}

pub fn expand_solutions(list: &ParsedSolutions, unfold: bool) -> Vec<ExpandedSolution> {
    list.solutions()
        .iter()
        .map(|s| ExpandedSolution {
            reference: s.reference,
            text: s.text(),
            flags: s.flags,
            variations: unfold.then(|| s.variations()),
        })
        .collect()
}

/// Text lines: one per solution, or one per variation when unfolding.
pub fn render_lines(expanded: &[ExpandedSolution]) -> Vec<String> {
    expanded
        .iter()
        .flat_map(|e| match &e.variations {
            Some(variations) => variations.clone(),
            None => vec![e.text.clone()],
        })
        .collect()
}

pub fn expand_cmd(payload: &Path, kind: ListKind, unfold: bool, json: bool) -> Result<(), CliError> {
    let list = load_solutions(payload, kind)?;
    let expanded = expand_solutions(&list, unfold);
    if json {
        println!("{}", serde_json::to_string_pretty(&expanded)?);
        return Ok(());
    }
    for line in render_lines(&expanded) {
        println!("{line}");
    }
    eprintln!(
        "{} solutions ({:?}, locale {}), {} variations",
        list.len(),
        list.kind(),
        list.locale(),
        list.unfolded_count()
    );
    Ok(())
}
