/// Shared data structures for the gallery
///
/// A picture record is what the data source hands over: one entry of the
/// picture feed. Records are immutable once parsed.
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::FetchError;

/// One picture of the feed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PictureRecord {
    /// Full image (photos) or video URL
    #[serde(rename = "url")]
    pub image_url: String,
    /// Preview frame, present for videos
    #[serde(rename = "preview", default)]
    pub preview_url: Option<String>,
    pub likes: u64,
    pub comments: u64,
    /// Publication date
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
}

impl PictureRecord {
    /// URL the tile thumbnail is loaded from: the preview when there is one
    pub fn thumbnail_source(&self) -> &str {
        self.preview_url.as_deref().unwrap_or(&self.image_url)
    }
}

/// Parse a feed date: either a plain `YYYY-MM-DD` (midnight UTC) or RFC 3339
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    let naive = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&naive.and_hms_opt(0, 0, 0)?))
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}

/// Turn a raw feed response into records.
///
/// A non-2xx status or a body that is not a JSON array fails the whole batch.
/// Elements that do not form a valid record are skipped.
pub fn parse_payload(status: u16, body: &str) -> Result<Vec<PictureRecord>, FetchError> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Status(status));
    }

    let elements: Vec<serde_json::Value> = serde_json::from_str(body)?;
    let total = elements.len();

    let mut records = Vec::with_capacity(total);
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<PictureRecord>(element) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("⚠️  Skipping picture #{}: {}", index, e),
        }
    }

    if records.len() < total {
        tracing::info!("📊 Parsed {} of {} pictures", records.len(), total);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"[
        { "url": "photos/1.jpg", "likes": 40, "comments": 12, "date": "2016-01-10" },
        { "url": "photos/2.mp4", "preview": "photos/2.png", "likes": 3, "comments": 0,
          "date": "2016-01-12T08:30:00+03:00" }
    ]"#;

    #[test]
    fn test_parse_feed() {
        let records = parse_payload(200, FEED).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].likes, 40);
        assert_eq!(records[0].date, Utc.with_ymd_and_hms(2016, 1, 10, 0, 0, 0).unwrap());
        assert_eq!(records[1].date, Utc.with_ymd_and_hms(2016, 1, 12, 5, 30, 0).unwrap());
    }

    #[test]
    fn test_thumbnail_source_prefers_preview() {
        let records = parse_payload(200, FEED).unwrap();
        assert_eq!(records[0].thumbnail_source(), "photos/1.jpg");
        assert_eq!(records[1].thumbnail_source(), "photos/2.png");
    }

    #[test]
    fn test_non_2xx_status_fails() {
        assert!(matches!(parse_payload(500, FEED), Err(FetchError::Status(500))));
        assert!(matches!(parse_payload(404, "not found"), Err(FetchError::Status(404))));
        assert!(parse_payload(204, "[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_body_fails() {
        assert!(matches!(parse_payload(200, "{ oops"), Err(FetchError::Malformed(_))));
        assert!(matches!(parse_payload(200, r#"{ "url": "a" }"#), Err(FetchError::Malformed(_))));
    }

    #[test]
    fn test_invalid_records_are_skipped() {
        let body = r#"[
            { "url": "a.jpg", "likes": 1, "comments": 1, "date": "2016-01-01" },
            { "likes": 1, "comments": 1, "date": "2016-01-01" },
            { "url": "c.jpg", "likes": 1, "comments": 1 },
            { "url": "d.jpg", "likes": 1, "comments": 1, "date": "yesterday" },
            { "url": "e.jpg", "likes": -4, "comments": 1, "date": "2016-01-01" },
            { "url": "f.jpg", "likes": 2, "comments": 7, "date": "2016-01-02" }
        ]"#;

        let records = parse_payload(200, body).unwrap();
        let urls: Vec<&str> = records.iter().map(|r| r.image_url.as_str()).collect();
        assert_eq!(urls, vec!["a.jpg", "f.jpg"]);
    }
}
