use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use sol_cli::commands::filter_ops::FilterArgs;
use sol_cli::commands::{
    config_ops, correct_ops, expand_ops, export_ops, filter_ops, score_ops, CliError, MatchFlags,
};
use sol_core::export::{ExportForm, ExportFormat};
use sol_core::solution::ListKind;
use sol_view::{PageSize, SortKind, SortOrder};

#[derive(Parser)]
#[command(name = "soltool", about = "Solution graph and answer-matching diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Expanded,
    Compact,
}

impl From<KindArg> for ListKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Expanded => ListKind::Expanded,
            KindArg::Compact => ListKind::Compact,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Similarity,
    Alphabetical,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormArg {
    Folded,
    Unfolded,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Plain,
    Delimited,
}

#[derive(clap::Args, Clone, Copy)]
struct MatchArgs {
    /// Ignore diacritics when matching
    #[arg(long)]
    ignore_diacritics: bool,
    /// Ignore word order when matching
    #[arg(long)]
    ignore_word_order: bool,
}

impl From<MatchArgs> for MatchFlags {
    fn from(m: MatchArgs) -> Self {
        MatchFlags {
            ignore_diacritics: m.ignore_diacritics,
            ignore_word_order: m.ignore_word_order,
        }
    }
}

fn parse_page_size(s: &str) -> Result<PageSize, String> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(PageSize::All);
    }
    match s.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("expected a positive number or \"all\", got {s:?}")),
        Ok(n) => Ok(PageSize::Fixed(n)),
    }
}

#[derive(Subcommand)]
enum Command {
    /// List the solutions of a challenge payload
    Expand {
        /// JSON challenge payload
        payload: PathBuf,
        /// Preferred representation
        #[arg(long, value_enum, default_value = "expanded")]
        kind: KindArg,
        /// Print every variation of folded solutions
        #[arg(long)]
        unfold: bool,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Score an answer against every solution
    Score {
        /// JSON challenge payload
        payload: PathBuf,
        /// Learner answer
        answer: String,
        #[arg(long, value_enum, default_value = "expanded")]
        kind: KindArg,
        /// Number of solutions to show
        #[arg(short, long, default_value = "10")]
        n: usize,
        #[command(flatten)]
        matching: MatchArgs,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Build the best correction for an answer
    Correct {
        /// JSON challenge payload
        payload: PathBuf,
        /// Learner answer
        answer: String,
        #[arg(long, value_enum, default_value = "compact")]
        kind: KindArg,
        #[command(flatten)]
        matching: MatchArgs,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Filter, sort and page the solutions
    Filter {
        /// JSON challenge payload
        payload: PathBuf,
        #[arg(long, value_enum, default_value = "expanded")]
        kind: KindArg,
        /// Required word, WORD[:exact|start|end|anywhere] (repeatable)
        #[arg(long = "word")]
        words: Vec<String>,
        /// Excluded word, WORD[:exact|start|end|anywhere] (repeatable)
        #[arg(long = "exclude")]
        excludes: Vec<String>,
        /// Flag option to select (repeatable)
        #[arg(long = "flag")]
        flags: Vec<String>,
        /// Score this answer before sorting
        #[arg(long)]
        answer: Option<String>,
        #[arg(long, value_enum, default_value = "similarity")]
        sort: SortArg,
        /// Reverse the default direction of the sort
        #[arg(long)]
        reverse: bool,
        /// Page size: a number or "all"
        #[arg(long, value_parser = parse_page_size)]
        page_size: Option<PageSize>,
        /// Page index (1-based)
        #[arg(long, default_value = "1")]
        page: usize,
        #[command(flatten)]
        matching: MatchArgs,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Export the solutions as text
    Export {
        /// JSON challenge payload
        payload: PathBuf,
        #[arg(long, value_enum, default_value = "compact")]
        kind: KindArg,
        #[arg(long, value_enum, default_value = "folded")]
        form: FormArg,
        #[arg(long, value_enum, default_value = "plain")]
        format: FormatArg,
        /// Skip the large-export confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: PathBuf,
    },
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Expand {
            payload,
            kind,
            unfold,
            json,
        } => expand_ops::expand_cmd(&payload, kind.into(), unfold, json),
        Command::Score {
            payload,
            answer,
            kind,
            n,
            matching,
            json,
        } => score_ops::score_cmd(&payload, kind.into(), &answer, matching.into(), n, json),
        Command::Correct {
            payload,
            answer,
            kind,
            matching,
            json,
        } => correct_ops::correct_cmd(&payload, kind.into(), &answer, matching.into(), json),
        Command::Filter {
            payload,
            kind,
            words,
            excludes,
            flags,
            answer,
            sort,
            reverse,
            page_size,
            page,
            matching,
            json,
        } => {
            let sort = SortOrder::new(match sort {
                SortArg::Similarity => SortKind::Similarity,
                SortArg::Alphabetical => SortKind::Alphabetical,
            });
            let args = FilterArgs {
                words,
                excludes,
                flags,
                answer,
                sort: if reverse { sort.reversed() } else { sort },
                page: page.saturating_sub(1),
                page_size: page_size.unwrap_or_default(),
                matching: matching.into(),
            };
            filter_ops::filter_cmd(&payload, kind.into(), &args, json)
        }
        Command::Export {
            payload,
            kind,
            form,
            format,
            yes,
        } => {
            let form = match form {
                FormArg::Folded => ExportForm::Folded,
                FormArg::Unfolded => ExportForm::Unfolded,
            };
            let format = match format {
                FormatArg::Plain => ExportFormat::Plain,
                FormatArg::Delimited => ExportFormat::Delimited,
            };
            export_ops::export_cmd(&payload, kind.into(), form, format, yes)
        }
        Command::SettingsExport => {
            config_ops::settings_export();
            Ok(())
        }
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        let code = match e {
            CliError::NeedsConfirmation { .. } => 2,
            _ => 1,
        };
        process::exit(code);
    }
}
