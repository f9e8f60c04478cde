use std::io::Write;

use anyhow::{Context, Ok, Result};
use log::info;

use crate::datetime;
use crate::duration::duration_minutes;
use crate::supabase::HoursRepository;
use crate::time_entry::{Entry, Sheet};

/// `export`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct ExportArgs {
    #[clap(long = "sheet", help = "Export only the named sheet")]
    sheet: Option<String>,
}

/// シートごとの集計結果。
#[derive(Clone, Debug, PartialEq)]
pub struct SheetSummary {
    pub name: String,
    pub entry_count: usize,
    pub total_minutes: u64,
    pub pay_hours: f64,
}

pub struct ExportCommand<'a, T: HoursRepository> {
    repository: &'a T,
}

impl<'a, T: HoursRepository> ExportCommand<'a, T> {
    /// 新しい`ExportCommand`を返す。
    ///
    /// # Arguments
    /// * `repository` - バックエンドと通信するためのリポジトリ
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `export`サブコマンドの処理を行う。
    ///
    /// 全シートのエントリーを取得し、シートごとの支払時間と経過時間を集計して返す。
    /// シート名が指定された場合はそのシートのみを集計する。指定がない場合、
    /// エントリーのないシートは集計対象外とする。
    ///
    /// # Arguments
    ///
    /// * `args` - `export`サブコマンドの引数
    pub async fn run(&self, args: ExportArgs) -> Result<Vec<SheetSummary>> {
        let sheets = self
            .repository
            .read_sheets()
            .await
            .context("Failed to retrieve sheets")?;
        let target_sheets: Vec<Sheet> = match &args.sheet {
            Some(name) => {
                let sheet = sheets
                    .iter()
                    .find(|sheet| sheet.name == *name)
                    .with_context(|| format!("Sheet not found: {}", name))?;
                vec![sheet.clone()]
            }
            None => sheets,
        };

        let mut summaries = Vec::new();
        for sheet in &target_sheets {
            let entries = self
                .repository
                .read_entries(&sheet.id)
                .await
                .with_context(|| format!("Failed to retrieve entries for sheet: {}", sheet.name))?;
            if entries.is_empty() && args.sheet.is_none() {
                continue;
            }

            let summary = summarize_sheet(sheet, &entries)
                .with_context(|| format!("Failed to summarize sheet: {}", sheet.name))?;
            summaries.push(summary);
        }
        info!("Summarized {} sheets", summaries.len());

        Ok(summaries)
    }
}

/// シートのエントリーを集計する。
///
/// 経過時間は開始・終了時刻から計算し直し、支払時間は保存されている
/// `pay_hours`(登録時に丸め済みの値)を合算する。
fn summarize_sheet(sheet: &Sheet, entries: &[Entry]) -> Result<SheetSummary> {
    let total_minutes = entries.iter().try_fold(0u64, |accumulate, entry| {
        let minutes = duration_minutes(&entry.start_time, &entry.end_time)
            .with_context(|| format!("Failed to calculate duration for entry: {}", entry.id))?;
        Ok(accumulate + u64::from(minutes))
    })?;
    let pay_hours = entries.iter().map(|entry| entry.pay_hours).sum();

    Ok(SheetSummary {
        name: sheet.name.clone(),
        entry_count: entries.len(),
        total_minutes,
        pay_hours,
    })
}

/// 経過分をexport用の`HH:MM:SS`形式に変換する。
///
/// エントリーは分単位で記録されるため、秒は常に00となる。
fn format_elapsed(total_minutes: u64) -> String {
    format!("{:02}:{:02}:00", total_minutes / 60, total_minutes % 60)
}

/// 集計結果をMarkdown形式で出力する。
///
/// 見出しには生成日を付ける。
pub fn show_report<W: Write>(writer: &mut W, summaries: &[SheetSummary]) -> Result<()> {
    let generated_on = datetime::now().format("%Y-%m-%d");
    writeln!(writer, "# Hours report ({})", generated_on).context("Failed to write header")?;

    for summary in summaries {
        writeln!(
            writer,
            "- {}: {:.2} pay hours ({} entries, {})",
            summary.name,
            summary.pay_hours,
            summary.entry_count,
            format_elapsed(summary.total_minutes)
        )
        .with_context(|| format!("Failed to write summary for sheet: {}", summary.name))?;
    }

    let grand_total: f64 = summaries.iter().map(|summary| summary.pay_hours).sum();
    writeln!(writer, "\nGrand total: {:.2} pay hours", grand_total)
        .context("Failed to write grand total")?;

    Ok(())
}
