use std::env;

use anyhow::{Context, Result};
use log::info;
use reqwest::{header::CONTENT_TYPE, Client};

use crate::time_entry::{Entry, NewEntry, ScheduleSlot, Sheet};

/// バックエンドと通信するためのリポジトリtrait。
#[cfg_attr(test, mockall::automock)]
pub trait HoursRepository {
    /// シートの一覧を取得する。
    async fn read_sheets(&self) -> Result<Vec<Sheet>>;

    /// 指定されたシートのエントリーを取得する。
    ///
    /// # Arguments
    ///
    /// * `sheet_id` - 取得するエントリーが属するシートのID
    async fn read_entries(&self, sheet_id: &str) -> Result<Vec<Entry>>;

    /// エントリーを登録し、保存されたレコードを返す。
    async fn create_entry(&self, entry: &NewEntry) -> Result<Entry>;

    /// 週間予定表の全マスを取得する。
    async fn read_schedule(&self) -> Result<Vec<ScheduleSlot>>;
}

/// Hours TrackerのバックエンドAPI(Supabase PostgREST)と通信するためのクライアント。
///
/// # Examples
///
/// ```
/// let client = SupabaseClient::new().unwrap();
/// let sheets = client.read_sheets().await.unwrap();
/// ```
pub struct SupabaseClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl SupabaseClient {
    /// 新しい`SupabaseClient`を返す。
    ///
    /// 環境変数`HOURS_API_URL`または`HOURS_API_KEY`が設定されていない場合はエラーを返す。
    pub fn new() -> Result<Self> {
        let api_url = env::var("HOURS_API_URL").context("HOURS_API_URL must be set")?;
        let api_key = env::var("HOURS_API_KEY").context("HOURS_API_KEY must be set")?;

        Ok(Self::with_base_url(api_url, api_key))
    }

    /// API URLとキーを指定して新しい`SupabaseClient`を返す。
    pub fn with_base_url(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }

    /// 認証ヘッダを付与したGETリクエストを組み立てる。
    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.api_url, path))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
    }
}

impl HoursRepository for SupabaseClient {
    async fn read_sheets(&self) -> Result<Vec<Sheet>> {
        let sheets = self
            .get("/rest/v1/sheets")
            .query(&[("select", "*"), ("order", "created_at")])
            .send()
            .await
            .with_context(|| format!("Failed to send request to API at {}", self.api_url))?
            .error_for_status()
            .context("Request returned an error status")?
            .json::<Vec<Sheet>>()
            .await
            .context("Failed to deserialize sheets")?;
        info!("Retrieved {} sheets", sheets.len());

        Ok(sheets)
    }

    async fn read_entries(&self, sheet_id: &str) -> Result<Vec<Entry>> {
        let entries = self
            .get("/rest/v1/entries")
            .query(&[
                ("sheet_id", format!("eq.{}", sheet_id).as_str()),
                ("select", "*"),
                ("order", "created_at.desc"),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send request to API at {}", self.api_url))?
            .error_for_status()
            .context("Request returned an error status")?
            .json::<Vec<Entry>>()
            .await
            .context("Failed to deserialize entries")?;
        info!("Retrieved {} entries for sheet {}", entries.len(), sheet_id);

        Ok(entries)
    }

    async fn create_entry(&self, entry: &NewEntry) -> Result<Entry> {
        let created = self
            .client
            .post(format!("{}/rest/v1/entries", self.api_url))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            // PostgRESTは既定では作成したレコードを返さない
            .header("Prefer", "return=representation")
            .json(entry)
            .send()
            .await
            .with_context(|| format!("Failed to send request to API at {}", self.api_url))?
            .error_for_status()
            .context("Request returned an error status")?
            .json::<Vec<Entry>>()
            .await
            .context("Failed to deserialize created entry")?;

        created
            .into_iter()
            .next()
            .context("Empty response for created entry")
    }

    async fn read_schedule(&self) -> Result<Vec<ScheduleSlot>> {
        let slots = self
            .get("/rest/v1/schedule_entries")
            .query(&[("select", "*")])
            .send()
            .await
            .with_context(|| format!("Failed to send request to API at {}", self.api_url))?
            .error_for_status()
            .context("Request returned an error status")?
            .json::<Vec<ScheduleSlot>>()
            .await
            .context("Failed to deserialize schedule slots")?;

        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockito::Matcher;

    use super::*;

    /// シートの一覧が取得できることを確認する。
    #[tokio::test]
    async fn test_read_sheets() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/sheets")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "*".into()),
                Matcher::UrlEncoded("order".into(), "created_at".into()),
            ]))
            .match_header("apikey", "test-key")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(
                serde_json::json!([
                    {
                        "id": "s1",
                        "name": "piano",
                        "created_at": "2024-04-01T00:00:00+00:00"
                    }
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let client = SupabaseClient::with_base_url(server.url(), "test-key".to_string());
        let sheets = client.read_sheets().await.unwrap();

        mock.assert_async().await;
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].id, "s1");
        assert_eq!(sheets[0].name, "piano");
    }

    /// シートを指定してエントリーが取得できることを確認する。
    #[tokio::test]
    async fn test_read_entries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/entries")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("sheet_id".into(), "eq.s1".into()),
                Matcher::UrlEncoded("select".into(), "*".into()),
                Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
            ]))
            .with_status(200)
            .with_body(
                serde_json::json!([
                    {
                        "id": "e1",
                        "sheet_id": "s1",
                        "class_name": "Math",
                        "date_str": "2024-05-01",
                        "start_time": "08:00",
                        "end_time": "09:00",
                        "total_hours": "01:00",
                        "pay_hours": 1.0,
                        "created_at": "2024-05-01T10:00:00+00:00"
                    }
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let client = SupabaseClient::with_base_url(server.url(), "test-key".to_string());
        let entries = client.read_entries("s1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].class_name, "Math");
        assert_eq!(
            entries[0].date_str,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert_eq!(entries[0].pay_hours, 1.0);
    }

    /// エントリーが登録され、保存されたレコードが返ることを確認する。
    #[tokio::test]
    async fn test_create_entry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/entries")
            .match_header("prefer", "return=representation")
            .match_body(Matcher::Json(serde_json::json!({
                "sheet_id": "s1",
                "class_name": "Math",
                "date_str": "2024-05-01",
                "start_time": "08:00",
                "end_time": "09:00",
                "total_hours": "01:00",
                "pay_hours": 1.0
            })))
            .with_status(201)
            .with_body(
                serde_json::json!([
                    {
                        "id": "e1",
                        "sheet_id": "s1",
                        "class_name": "Math",
                        "date_str": "2024-05-01",
                        "start_time": "08:00",
                        "end_time": "09:00",
                        "total_hours": "01:00",
                        "pay_hours": 1.0,
                        "created_at": "2024-05-01T10:00:00+00:00"
                    }
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let client = SupabaseClient::with_base_url(server.url(), "test-key".to_string());
        let new_entry = NewEntry {
            sheet_id: "s1".to_string(),
            class_name: "Math".to_string(),
            date_str: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            start_time: "08:00".to_string(),
            end_time: "09:00".to_string(),
            total_hours: "01:00".to_string(),
            pay_hours: 1.0,
        };
        let entry = client.create_entry(&new_entry).await.unwrap();

        mock.assert_async().await;
        assert_eq!(entry.id, "e1");
        assert_eq!(entry.total_hours, "01:00");
    }

    /// APIがエラーを返した場合にエラーになることを確認する。
    #[tokio::test]
    async fn test_read_sheets_server_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/sheets")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = SupabaseClient::with_base_url(server.url(), "test-key".to_string());
        let result = client.read_sheets().await;

        mock.assert_async().await;
        assert!(result.is_err());
    }

    /// 週間予定表のマスが取得できることを確認する。
    #[tokio::test]
    async fn test_read_schedule() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/schedule_entries")
            .match_query(Matcher::UrlEncoded("select".into(), "*".into()))
            .with_status(200)
            .with_body(
                serde_json::json!([
                    {"day_index": 0, "time_slot": 2, "content": "Math"},
                    {"day_index": 3, "time_slot": 11, "content": "Choir"}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let client = SupabaseClient::with_base_url(server.url(), "test-key".to_string());
        let slots = client.read_schedule().await.unwrap();

        mock.assert_async().await;
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].content, "Math");
        assert_eq!(slots[1].day_index, 3);
    }
}
