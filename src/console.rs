use std::io::Write;

use anyhow::{Context, Result};

use crate::time_entry::Entry;

/// Consoleにエントリーを表示するためのtrait。
pub trait ConsolePresenter {
    /// エントリーの一覧と支払時間の合計を表示する。
    ///
    /// # Arguments
    ///
    /// * `entries` - 表示するエントリー
    fn show_entries(&mut self, entries: &[Entry]) -> Result<()>;
}

/// エントリーをMarkdownのlist形式で表示する。
pub struct ConsoleMarkdownList<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleMarkdownList<'a, W> {
    /// 新しい`ConsoleMarkdownList`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownList<'a, W> {
    // エントリーを日付、開始時刻の順に並べてlist形式で表示する。
    fn show_entries(&mut self, entries: &[Entry]) -> Result<()> {
        let mut sorted_entries = entries.to_vec();
        sorted_entries.sort_by(|a, b| {
            (a.date_str, a.start_time.as_str()).cmp(&(b.date_str, b.start_time.as_str()))
        });

        let mut total_pay_hours = 0.0;
        for entry in &sorted_entries {
            writeln!(
                self.writer,
                "- {} {} ~ {}: {} ({}, {}h)",
                entry.date_str,
                entry.start_time,
                entry.end_time,
                entry.class_name,
                entry.total_hours,
                entry.pay_hours
            )
            .with_context(|| format!("Failed to write entry: {:?}", entry))?;
            total_pay_hours += entry.pay_hours;
        }
        writeln!(self.writer, "\nTotal pay hours: {:.2}", total_pay_hours)
            .context("Failed to write total pay hours")?;

        Ok(())
    }
}
