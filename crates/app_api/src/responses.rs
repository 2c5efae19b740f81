use serde::Serialize;

#[derive(Serialize)]
pub struct ConvertResponse {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub converted: f64,
}

#[derive(Serialize)]
pub struct CleanupResponse {
    pub deleted: usize,
}
