use std::io::Write;

use anyhow::{Context, Result};
use log::info;

use crate::supabase::HoursRepository;
use crate::time_entry::ScheduleSlot;

/// 週間予定表の1時間枠のラベル。
pub const TIME_SLOTS: [&str; 12] = [
    "8:00-9:00",
    "9:00-10:00",
    "10:00-11:00",
    "11:00-12:00",
    "12:00-13:00",
    "13:00-14:00",
    "14:00-15:00",
    "15:00-16:00",
    "16:00-17:00",
    "17:00-18:00",
    "18:00-19:00",
    "19:00-20:00",
];

/// 週間予定表の曜日(日〜木)。
pub const DAYS: [&str; 5] = ["Sun", "Mon", "Tue", "Wed", "Thu"];

pub struct ScheduleCommand<'a, T: HoursRepository> {
    repository: &'a T,
}

impl<'a, T: HoursRepository> ScheduleCommand<'a, T> {
    /// 新しい`ScheduleCommand`を返す。
    ///
    /// # Arguments
    /// * `repository` - バックエンドと通信するためのリポジトリ
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `schedule`サブコマンドの処理を行う。
    ///
    /// 週間予定表の全マスを取得して返す。
    pub async fn run(&self) -> Result<Vec<ScheduleSlot>> {
        let slots = self
            .repository
            .read_schedule()
            .await
            .context("Failed to retrieve schedule slots")?;
        info!("Retrieved {} schedule slots", slots.len());

        Ok(slots)
    }
}

/// 週間予定表をMarkdownのtable形式で出力する。
///
/// 行は1時間枠、列は曜日とする。範囲外のマスは表示されない。
pub fn render_schedule<W: Write>(writer: &mut W, slots: &[ScheduleSlot]) -> Result<()> {
    writeln!(writer, "| | {} |", DAYS.join(" | ")).context("Failed to write header")?;
    writeln!(writer, "|{}|", "---|".repeat(DAYS.len() + 1))
        .context("Failed to write header separator")?;

    for (time_slot, label) in TIME_SLOTS.iter().enumerate() {
        let cells: Vec<&str> = (0..DAYS.len())
            .map(|day_index| slot_content(slots, day_index, time_slot))
            .collect();
        writeln!(writer, "| {} | {} |", label, cells.join(" | "))
            .with_context(|| format!("Failed to write row: {}", label))?;
    }

    Ok(())
}

/// 指定されたマスの内容を返す。予定がないマスは空文字列とする。
fn slot_content(slots: &[ScheduleSlot], day_index: usize, time_slot: usize) -> &str {
    slots
        .iter()
        .find(|slot| slot.day_index == day_index && slot.time_slot == time_slot)
        .map(|slot| slot.content.as_str())
        .unwrap_or("")
}
