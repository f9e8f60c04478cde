use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// エントリーの集まりであるシートを表す構造体。
#[derive(Clone, Debug, Deserialize)]
pub struct Sheet {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// 1回の勤務を表すエントリー。
///
/// `total_hours`と`pay_hours`は登録時に計算して保存される非正規化フィールド。
#[derive(Clone, Debug, Deserialize)]
pub struct Entry {
    pub id: String,
    pub sheet_id: String,
    pub class_name: String,
    pub date_str: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub total_hours: String,
    pub pay_hours: f64,
    pub created_at: DateTime<Utc>,
}

/// エントリー登録時に送信するペイロード。
#[derive(Clone, Debug, Serialize)]
pub struct NewEntry {
    pub sheet_id: String,
    pub class_name: String,
    pub date_str: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub total_hours: String,
    pub pay_hours: f64,
}

/// 週間予定表の1マス。
///
/// `day_index`は0〜4(日〜木)、`time_slot`は0〜11(8:00〜20:00の1時間枠)。
#[derive(Clone, Debug, Deserialize)]
pub struct ScheduleSlot {
    pub day_index: usize,
    pub time_slot: usize,
    pub content: String,
}
