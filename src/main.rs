use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tristo_toolbox::app::{self, AppError, CliContext};
use tristo_toolbox::calculator::RatioCalculator;
use tristo_toolbox::record::RecordId;
use tristo_toolbox::session::notice_from;
use tristo_toolbox::{config, conversion, logging, ui_cli};

/// Ratio calculator and saved records for tristo.dev.
#[derive(Debug, Parser)]
#[command(name = "tristo_toolbox_cli", version)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Directory holding saved records (overrides the config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scale a known ratio to a target medium volume
    Calc {
        /// Standard substance volume, e.g. 10ml
        #[arg(long)]
        substance: String,
        /// Standard medium volume, e.g. 1l
        #[arg(long)]
        medium: String,
        /// Target medium volume, e.g. 2l
        #[arg(long)]
        target: String,
        /// Result unit (ml or l); defaults to the substance unit
        #[arg(long)]
        unit: Option<String>,
        /// Rescale the result unit so the value reads between 1 and 1000
        #[arg(long)]
        optimise: bool,
        /// Save the calculation under this label
        #[arg(long)]
        save: Option<String>,
    },
    /// Manage saved records
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },
}

#[derive(Debug, Subcommand)]
enum RecordsAction {
    /// List records in the order they were saved
    List,
    /// Show one record
    Show { id: String },
    /// Delete one record
    Delete { id: String },
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 명령을 실행한다.
fn main() -> ExitCode {
    logging::init("warn");
    match try_run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: Cli) -> Result<(), AppError> {
    let mut cfg = config::load_or_default_at(&cli.config)?;
    if let Some(dir) = cli.data_dir {
        cfg.data_dir = Some(dir);
    }
    let mut ctx = CliContext::open(cfg, cli.config)?;
    match cli.command {
        None => app::run(&mut ctx),
        Some(Command::Calc {
            substance,
            medium,
            target,
            unit,
            optimise,
            save,
        }) => run_calc(&mut ctx, &substance, &medium, &target, unit.as_deref(), optimise, save),
        Some(Command::Records { action }) => run_records(&mut ctx, action),
    }
}

fn run_calc(
    ctx: &mut CliContext,
    substance: &str,
    medium: &str,
    target: &str,
    unit: Option<&str>,
    optimise: bool,
    save: Option<String>,
) -> Result<(), AppError> {
    let substance = conversion::parse_volume(substance)?;
    let medium = conversion::parse_volume(medium)?;
    let target = conversion::parse_volume(target)?;
    let output_unit = match unit {
        Some(u) => Some(conversion::parse_volume_unit(u)?),
        None => ctx.config.default_unit,
    };

    let mut calc = RatioCalculator::with_output_unit(output_unit);
    calc.standard_substance_volume = substance.value.to_string();
    calc.select_substance_unit(substance.unit);
    calc.standard_medium_volume = medium.value.to_string();
    calc.standard_medium_unit = Some(medium.unit);
    calc.target_volume = target.value.to_string();
    calc.target_unit = Some(target.unit);
    if optimise {
        if let Some(notice) = calc.optimise() {
            eprintln!("{notice}");
        }
    }
    println!("{} {}", calc.display_value(), calc.display_unit());

    if let Some(label) = save {
        calc.record_label = label;
        ctx.session.calculator = calc;
        match notice_from(ctx.session.save()) {
            Some(notice) => eprintln!("{notice}"),
            None => eprintln!("Nothing saved: needs a valid result and a non-empty label."),
        }
    }
    Ok(())
}

fn run_records(ctx: &mut CliContext, action: RecordsAction) -> Result<(), AppError> {
    match action {
        RecordsAction::List => {
            if ctx.session.records().is_empty() {
                println!("No records saved");
            }
            for (i, rec) in ctx.session.records().iter().enumerate() {
                println!("{}", ui_cli::format_record(i + 1, rec));
            }
        }
        RecordsAction::Show { id } => {
            let parsed = parse_id(&id)?;
            let rec = ctx
                .session
                .find(parsed)
                .ok_or(AppError::RecordNotFound(id))?;
            println!("{}", ui_cli::format_record(1, rec));
        }
        RecordsAction::Delete { id } => {
            let parsed = parse_id(&id)?;
            match ctx.session.delete(parsed)? {
                Some(notice) => println!("{notice}"),
                None => return Err(AppError::RecordNotFound(id)),
            }
        }
    }
    Ok(())
}

fn parse_id(id: &str) -> Result<RecordId, AppError> {
    id.parse()
        .map_err(|_| AppError::RecordNotFound(id.to_string()))
}
