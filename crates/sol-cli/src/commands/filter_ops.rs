use std::path::Path;

use serde::Serialize;

use sol_core::solution::{ListKind, ParsedSolutions};
use sol_view::{ListView, PageSize, SortOrder, ViewParams, ViewSnapshot, WordFilter};

use super::{column_width, format_score, load_solutions, pad, CliError, MatchFlags};

#[derive(Debug, Clone, Default)]
pub struct FilterArgs {
    /// `WORD[:TYPE]` filters that must match.
    pub words: Vec<String>,
    /// `WORD[:TYPE]` filters that must not match.
    pub excludes: Vec<String>,
    /// Flag option names to select.
    pub flags: Vec<String>,
    /// Answer to score before sorting.
    pub answer: Option<String>,
    pub sort: SortOrder,
    pub page: usize,
    pub page_size: PageSize,
    pub matching: MatchFlags,
}

#[derive(Debug, Serialize)]
pub struct FilterOutput {
    pub snapshot: ViewSnapshot,
    pub texts: Vec<String>,
    pub scores: Vec<Option<f64>>,
}

fn parse_filters(args: &FilterArgs) -> Result<Vec<WordFilter>, CliError> {
    let include = args.words.iter().map(|w| (w, false));
    let exclude = args.excludes.iter().map(|w| (w, true));
    include
        .chain(exclude)
        .map(|(spec, excluded)| WordFilter::parse(spec, excluded).ok_or_else(|| CliError::InvalidFilter(spec.clone())))
        .collect()
}

pub fn run_filter(list: &mut ParsedSolutions, args: &FilterArgs) -> Result<FilterOutput, CliError> {
    list.build_matching(args.matching.options());
    if let Some(answer) = &args.answer {
        list.score(answer);
    }

    let mut view = ListView::new();
    let mut params = ViewParams {
        filters: parse_filters(args)?,
        sort: args.sort,
        page: args.page,
        page_size: args.page_size,
        ..ViewParams::default()
    };
    let mut snapshot = view.refresh(list, &params);

    if !args.flags.is_empty() {
        for name in &args.flags {
            let flag = snapshot
                .flags
                .iter()
                .find(|f| &f.name == name)
                .ok_or_else(|| CliError::UnknownFlag {
                    name: name.clone(),
                    offered: if snapshot.flags.is_empty() {
                        "none".to_string()
                    } else {
                        snapshot.flags.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join(", ")
                    },
                })?;
            params.flag_mask |= flag.bit;
        }
        snapshot = view.refresh(list, &params);
    }

    let (texts, scores): (Vec<String>, Vec<Option<f64>>) = snapshot
        .items
        .iter()
        .filter_map(|&r| list.get(r))
        .map(|s| (s.text(), s.score))
        .unzip();
    Ok(FilterOutput {
        snapshot,
        texts,
        scores,
    })
}

pub fn render(output: &FilterOutput) -> String {
    let s = &output.snapshot;
    let mut out = format!(
        "page {}/{} - {} of {} solutions\n",
        s.page + 1,
        s.page_count,
        s.filtered,
        s.total
    );
    if !s.flags.is_empty() {
        let flags: Vec<String> = s
            .flags
            .iter()
            .map(|f| {
                let mark = if s.flag_mask & f.bit != 0 { "*" } else { "" };
                format!("{mark}{} ({})", f.name, f.count)
            })
            .collect();
        out.push_str(&format!("flags: {}\n", flags.join(", ")));
    }
    let scores: Vec<String> = output.scores.iter().map(|&sc| format_score(sc)).collect();
    let refs: Vec<String> = s.items.iter().map(|r| format!("#{r}")).collect();
    let score_w = column_width(scores.iter().map(String::as_str));
    let ref_w = column_width(refs.iter().map(String::as_str));
    for ((reference, score), text) in refs.iter().zip(&scores).zip(&output.texts) {
        out.push_str(&format!("{}  {}  {}\n", pad(reference, ref_w), pad(score, score_w), text));
    }
    out
}

pub fn filter_cmd(payload: &Path, kind: ListKind, args: &FilterArgs, json: bool) -> Result<(), CliError> {
    let mut list = load_solutions(payload, kind)?;
    let output = run_filter(&mut list, args)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render(&output));
    }
    Ok(())
}
