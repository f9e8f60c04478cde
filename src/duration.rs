use anyhow::{bail, Context, Result};

/// `HH:MM`形式の文字列からパースした時刻を表す構造体。
///
/// 時は0〜23、分は0〜59の範囲のみを取る。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hours: u32,
    pub minutes: u32,
}

/// 開始・終了時刻から計算した勤務時間を表す構造体。
///
/// `total_hours`は経過時間の`HH:MM`表記、`pay_hours`は小数2桁に丸めた時間数。
#[derive(Clone, Debug, PartialEq)]
pub struct DurationResult {
    pub total_hours: String,
    pub pay_hours: f64,
}

/// `H:MM`または`HH:MM`形式の文字列をパースする。
///
/// 時は0〜23でゼロ埋めは任意、分は必ず2桁で00〜59のみを受け付ける。
/// 形式に合わない文字列はエラーを返す。
///
/// # Arguments
///
/// * `time_str` - パースする時刻文字列
pub fn parse_time(time_str: &str) -> Result<TimeOfDay> {
    let (hours_str, minutes_str) = time_str
        .split_once(':')
        .with_context(|| format!("Invalid time format: {}", time_str))?;

    if hours_str.is_empty() || hours_str.len() > 2 || minutes_str.len() != 2 {
        bail!("Invalid time format: {}", time_str);
    }
    if !hours_str.chars().all(|c| c.is_ascii_digit())
        || !minutes_str.chars().all(|c| c.is_ascii_digit())
    {
        bail!("Invalid time format: {}", time_str);
    }

    let hours: u32 = hours_str
        .parse()
        .with_context(|| format!("Failed to parse hours: {}", time_str))?;
    let minutes: u32 = minutes_str
        .parse()
        .with_context(|| format!("Failed to parse minutes: {}", time_str))?;
    if hours > 23 || minutes > 59 {
        bail!("Time out of range: {}", time_str);
    }

    Ok(TimeOfDay { hours, minutes })
}

/// 時刻を0時からの経過分に変換する。
pub fn to_minutes(time: &TimeOfDay) -> u32 {
    time.hours * 60 + time.minutes
}

/// 経過分を`HH:MM`形式の文字列に変換する。
///
/// 時間は24で切り捨てず、1800分は`30:00`となる。分は常に60未満。
pub fn format_duration(total_minutes: i64) -> String {
    let minutes = total_minutes.unsigned_abs();
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// 開始・終了時刻の間の経過分を計算する。
///
/// 終了時刻が開始時刻より前の場合は日付をまたぐ勤務として24時間を加算する。
/// 加算は1回のみで、複数日にわたる勤務は表現できない。
/// 開始と終了が同じ場合は0分とする(24時間勤務とはみなさない)。
pub fn duration_minutes(start_time: &str, end_time: &str) -> Result<u32> {
    let start = parse_time(start_time)
        .with_context(|| format!("Failed to parse start time: {}", start_time))?;
    let end = parse_time(end_time)
        .with_context(|| format!("Failed to parse end time: {}", end_time))?;

    let start_minutes = to_minutes(&start);
    let mut end_minutes = to_minutes(&end);

    // 日付をまたぐ勤務
    if end_minutes < start_minutes {
        end_minutes += 24 * 60;
    }

    Ok(end_minutes - start_minutes)
}

/// 開始・終了時刻から勤務時間を計算する。
///
/// 不正な形式の入力はエラーを返す。入力が正しい限り例外的な結果はなく、
/// 同じ入力に対して常に同じ結果を返す。
///
/// # Arguments
///
/// * `start_time` - `HH:MM`形式の開始時刻
/// * `end_time` - `HH:MM`形式の終了時刻
///
/// # Examples
///
/// ```
/// let result = calculate_duration("22:00", "06:00").unwrap();
/// assert_eq!(result.total_hours, "08:00");
/// ```
pub fn calculate_duration(start_time: &str, end_time: &str) -> Result<DurationResult> {
    let minutes = duration_minutes(start_time, end_time)?;

    let total_hours = format_duration(i64::from(minutes));
    // 1/100時間単位への四捨五入。浮動小数点の表現誤差を避けるため整数で計算する。
    let pay_hundredths = (u64::from(minutes) * 10 + 3) / 6;
    let pay_hours = pay_hundredths as f64 / 100.0;

    Ok(DurationResult {
        total_hours,
        pay_hours,
    })
}

/// 時刻文字列が`HH:MM`形式として妥当か判定する。
///
/// `calculate_duration`を呼び出す前の入力チェックとして利用する。
/// 受理する文字列は`parse_time`と完全に一致する。
pub fn is_valid_time(time_str: &str) -> bool {
    parse_time(time_str).is_ok()
}
