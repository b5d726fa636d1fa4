use std::path::Path;

use sol_core::correction::CorrectionOutcome;
use sol_core::solution::{ListKind, ParsedSolutions};

use super::{load_solutions, CliError, MatchFlags};

/// Score first so that the correction draws on the best solutions.
pub fn correct(list: &mut ParsedSolutions, answer: &str, flags: MatchFlags) -> CorrectionOutcome {
    list.build_matching(flags.options());
    list.score(answer);
    list.build_correction(answer)
}

pub fn describe(list: &ParsedSolutions, outcome: &CorrectionOutcome) -> String {
    match outcome {
        CorrectionOutcome::Correction(c) => format!("#{}  {}\n     {}", c.reference, c.variation, c.render_inline()),
        CorrectionOutcome::None => "no correction needed".to_string(),
        CorrectionOutcome::Unsupported => format!("corrections are not supported for locale {}", list.locale()),
    }
}

pub fn correct_cmd(payload: &Path, kind: ListKind, answer: &str, flags: MatchFlags, json: bool) -> Result<(), CliError> {
    let mut list = load_solutions(payload, kind)?;
    let outcome = correct(&mut list, answer, flags);
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", describe(&list, &outcome));
    }
    Ok(())
}
