use anyhow::{bail, Context, Result};

use crate::duration::{calculate_duration, is_valid_time};

/// `calc`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct CalcCommand {
    #[clap(
        short = 's',
        long = "start",
        help = "Start time in HH:MM format",
        parse(try_from_str = parse_clock),
    )]
    start: String,

    #[clap(
        short = 'e',
        long = "end",
        help = "End time in HH:MM format",
        parse(try_from_str = parse_clock),
    )]
    end: String,
}

/// `calc`サブコマンドの処理を行う。
///
/// 開始・終了時刻から勤務時間を計算して表示する。
/// 終了時刻が開始時刻より前の場合は日付をまたぐ勤務として扱う。
///
/// # Arguments
///
/// * `calc` - `calc`サブコマンドの引数
pub fn calc_command(calc: CalcCommand) -> Result<()> {
    let result = calculate_duration(&calc.start, &calc.end).with_context(|| {
        format!(
            "Failed to calculate duration: {} ~ {}",
            calc.start, calc.end
        )
    })?;

    println!(
        "- {} ~ {}: {} ({}h)",
        calc.start, calc.end, result.total_hours, result.pay_hours
    );

    Ok(())
}

/// 時刻の引数を検証する。
fn parse_clock(s: &str) -> Result<String> {
    if !is_valid_time(s) {
        bail!("Invalid time (expected HH:MM): {}", s);
    }

    Ok(s.to_string())
}
