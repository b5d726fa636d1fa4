use std::path::Path;

use serde::Serialize;

use sol_core::solution::{ListKind, ParsedSolutions};
use sol_view::sort::{sort_references, SortOrder};

use super::{column_width, format_score, load_solutions, pad, CliError, MatchFlags};

#[derive(Debug, Clone, Serialize)]
pub struct ScoreRow {
    pub rank: usize,
    pub reference: usize,
    pub score: Option<f64>,
    pub text: String,
}

/// Score `answer` and return the `n` best solutions, best first.
pub fn score_rows(list: &mut ParsedSolutions, answer: &str, flags: MatchFlags, n: usize) -> Vec<ScoreRow> {
    list.build_matching(flags.options());
    list.score(answer);
    let mut refs: Vec<usize> = (0..list.len()).collect();
    sort_references(list, &mut refs, SortOrder::default());
    refs.into_iter()
        .take(n)
        .enumerate()
        .filter_map(|(i, r)| {
            list.get(r).map(|s| ScoreRow {
                rank: i + 1,
                reference: r,
                score: s.score,
                text: s.text(),
            })
        })
        .collect()
}

pub fn render_table(rows: &[ScoreRow]) -> String {
    let scores: Vec<String> = rows.iter().map(|r| format_score(r.score)).collect();
    let refs: Vec<String> = rows.iter().map(|r| format!("#{}", r.reference)).collect();
    let score_w = column_width(scores.iter().map(String::as_str));
    let ref_w = column_width(refs.iter().map(String::as_str));
    let mut out = String::new();
    for ((row, score), reference) in rows.iter().zip(&scores).zip(&refs) {
        out.push_str(&format!(
            "{:>3}  {}  {}  {}\n",
            row.rank,
            pad(score, score_w),
            pad(reference, ref_w),
            row.text
        ));
    }
    out
}

pub fn score_cmd(
    payload: &Path,
    kind: ListKind,
    answer: &str,
    flags: MatchFlags,
    n: usize,
    json: bool,
) -> Result<(), CliError> {
    let mut list = load_solutions(payload, kind)?;
    let rows = score_rows(&mut list, answer, flags, n);
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.iter().all(|r| r.score.is_none()) {
        println!("(empty answer, nothing scored)");
    } else {
        print!("{}", render_table(&rows));
    }
    Ok(())
}
