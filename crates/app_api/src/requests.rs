use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct EmptyRequest {}

#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub decimal_places: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryRequest {
    pub code: String,
    pub limit: Option<u32>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    pub code: String,
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SnapshotsRequest {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CleanupRequest {
    pub retain_days: Option<u32>,
}
