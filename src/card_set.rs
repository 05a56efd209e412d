use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Label used for sets the catalog files under no series.
pub const OTHER_SERIES: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(
        rename = "releaseDate",
        default,
        deserialize_with = "deserialize_release_date"
    )]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub images: SetImages,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetImages {
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub symbol: String,
}

impl CardSet {
    pub fn series_label(&self) -> &str {
        match self.series.as_deref().map(str::trim) {
            Some(series) if !series.is_empty() => series,
            _ => OTHER_SERIES,
        }
    }

    pub fn release_label(&self) -> String {
        self.release_date
            .map(|d| d.format("%Y/%m/%d").to_string())
            .unwrap_or_else(|| "unknown date".to_string())
    }
}

/// The catalog writes dates as `1999/01/09`; ISO dashes are accepted too.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y/%m/%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

fn deserialize_release_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_release_date))
}
