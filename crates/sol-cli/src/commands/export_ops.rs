use std::path::Path;

use sol_core::export::{ExportForm, ExportFormat, ExportPlan, ExportScope};
use sol_core::solution::ListKind;

use super::{load_solutions, CliError};

pub fn export_cmd(
    payload: &Path,
    kind: ListKind,
    form: ExportForm,
    format: ExportFormat,
    confirmed: bool,
) -> Result<(), CliError> {
    let list = load_solutions(payload, kind)?;
    let plan = ExportPlan::new(&list, &ExportScope::All, form, format);
    if plan.needs_confirmation() && !confirmed {
        return Err(CliError::NeedsConfirmation { rows: plan.rows() });
    }
    print!("{}", plan.render());
    Ok(())
}
