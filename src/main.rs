use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod add_command;
mod calc_command;
mod console;
mod datetime;
mod duration;
mod export_command;
mod list_command;
mod schedule_command;
mod supabase;
mod time_entry;

use add_command::{AddArgs, AddCommand};
use calc_command::{calc_command, CalcCommand};
use console::{ConsoleMarkdownList, ConsolePresenter};
use export_command::{show_report, ExportArgs, ExportCommand};
use list_command::{ListArgs, ListCommand};
use schedule_command::{render_schedule, ScheduleCommand};
use supabase::SupabaseClient;

/// 勤務時間を記録・集計するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- calc --start 08:00 --end 17:30
/// $ cargo run -- list --sheet piano
/// $ cargo run -- export
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    /// Calculate the duration between two times
    Calc(CalcCommand),
    /// Add an entry to a sheet
    Add(AddArgs),
    /// List the entries of a sheet
    List(ListArgs),
    /// Summarize pay hours per sheet
    Export(ExportArgs),
    /// Show the weekly schedule
    Schedule,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger().context("Failed to initialize logger")?;

    let args = Args::parse();
    match args.subcommand {
        SubCommands::Calc(calc) => calc_command(calc)?,
        SubCommands::Add(add) => {
            let client = SupabaseClient::new().context("Failed to new supabase client")?;
            let entry = AddCommand::new(&client).run(add).await?;
            println!(
                "- {} {} ~ {}: {} ({}, {}h)",
                entry.date_str,
                entry.start_time,
                entry.end_time,
                entry.class_name,
                entry.total_hours,
                entry.pay_hours
            );
        }
        SubCommands::List(list) => {
            let client = SupabaseClient::new().context("Failed to new supabase client")?;
            let entries = ListCommand::new(&client).run(list).await?;
            let mut stdout = io::stdout();
            ConsoleMarkdownList::new(&mut stdout).show_entries(&entries)?;
        }
        SubCommands::Export(export) => {
            let client = SupabaseClient::new().context("Failed to new supabase client")?;
            let summaries = ExportCommand::new(&client).run(export).await?;
            let mut stdout = io::stdout();
            show_report(&mut stdout, &summaries)?;
        }
        SubCommands::Schedule => {
            let client = SupabaseClient::new().context("Failed to new supabase client")?;
            let slots = ScheduleCommand::new(&client).run().await?;
            let mut stdout = io::stdout();
            render_schedule(&mut stdout, &slots)?;
        }
    }

    Ok(())
}

/// ロガーを初期化する。
fn init_logger() -> Result<()> {
    let colors = fern::colors::ColoredLevelConfig::new();
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(io::stderr())
        .apply()
        .context("Failed to apply logger configuration")?;

    Ok(())
}
