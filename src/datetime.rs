use chrono::{DateTime, Utc};

/// 現在のUTC時間を取得する。
///
/// レポートの生成日の記録に利用する。
#[cfg(not(test))]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}


#[cfg(test)]
pub use mock_datetime::now;
