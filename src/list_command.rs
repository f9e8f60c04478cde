use anyhow::{Context, Result};
use log::info;

use crate::supabase::HoursRepository;
use crate::time_entry::Entry;

/// `list`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct ListArgs {
    #[clap(long = "sheet", help = "Name of the sheet to list")]
    sheet: String,
}

pub struct ListCommand<'a, T: HoursRepository> {
    repository: &'a T,
}

impl<'a, T: HoursRepository> ListCommand<'a, T> {
    /// 新しい`ListCommand`を返す。
    ///
    /// # Arguments
    /// * `repository` - バックエンドと通信するためのリポジトリ
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `list`サブコマンドの処理を行う。
    ///
    /// シートを名前で検索し、そのシートに属するエントリーを取得して返す。
    ///
    /// # Arguments
    ///
    /// * `args` - `list`サブコマンドの引数
    pub async fn run(&self, args: ListArgs) -> Result<Vec<Entry>> {
        let sheets = self
            .repository
            .read_sheets()
            .await
            .context("Failed to retrieve sheets")?;
        let sheet = sheets
            .iter()
            .find(|sheet| sheet.name == args.sheet)
            .with_context(|| format!("Sheet not found: {}", args.sheet))?;

        let entries = self
            .repository
            .read_entries(&sheet.id)
            .await
            .with_context(|| format!("Failed to retrieve entries for sheet: {}", sheet.name))?;
        info!("Retrieved {} entries from sheet: {}", entries.len(), sheet.name);

        Ok(entries)
    }
}
