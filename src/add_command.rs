use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::duration::{calculate_duration, is_valid_time};
use crate::supabase::HoursRepository;
use crate::time_entry::{Entry, NewEntry};

/// `add`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct AddArgs {
    #[clap(long = "sheet", help = "Name of the sheet to add the entry to")]
    sheet: String,

    #[clap(long = "class", help = "Class or activity name")]
    class_name: String,

    #[clap(
        short = 'd',
        long = "date",
        help = "Sets the entry date in the format YYYY-MM-DD",
        parse(try_from_str = parse_date),
    )]
    date: NaiveDate,

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

pub struct AddCommand<'a, T: HoursRepository> {
    repository: &'a T,
}

impl<'a, T: HoursRepository> AddCommand<'a, T> {
    /// 新しい`AddCommand`を返す。
    ///
    /// # Arguments
    /// * `repository` - バックエンドと通信するためのリポジトリ
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `add`サブコマンドの処理を行う。
    ///
    /// シートを名前で検索し、勤務時間を計算したうえでエントリーを登録する。
    /// `total_hours`と`pay_hours`は登録時に計算し、非正規化フィールドとして保存する。
    /// シートが存在しない場合はエラーを返す(シートの作成はアプリケーション側で行う)。
    ///
    /// # Arguments
    ///
    /// * `args` - `add`サブコマンドの引数
    pub async fn run(&self, args: AddArgs) -> Result<Entry> {
        let sheets = self
            .repository
            .read_sheets()
            .await
            .context("Failed to retrieve sheets")?;
        let sheet = sheets
            .iter()
            .find(|sheet| sheet.name == args.sheet)
            .with_context(|| format!("Sheet not found: {}", args.sheet))?;

        let duration = calculate_duration(&args.start, &args.end).with_context(|| {
            format!("Failed to calculate duration: {} ~ {}", args.start, args.end)
        })?;

        let new_entry = NewEntry {
            sheet_id: sheet.id.clone(),
            class_name: args.class_name,
            date_str: args.date,
            start_time: args.start,
            end_time: args.end,
            total_hours: duration.total_hours,
            pay_hours: duration.pay_hours,
        };
        let entry = self
            .repository
            .create_entry(&new_entry)
            .await
            .context("Failed to create entry")?;
        info!("Entry created: {}", entry.id);

        Ok(entry)
    }
}

/// 日付をパースする。
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Failed to parse date: {}", s))
}

/// 時刻の引数を検証する。
fn parse_clock(s: &str) -> Result<String> {
    if !is_valid_time(s) {
        bail!("Invalid time (expected HH:MM): {}", s);
    }

    Ok(s.to_string())
}
