use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShooterListItem {
    pub rank: usize,
    pub shooter_id: i64,
    pub name: String,
    pub classification: String,
    pub wyco_points: f64,
    pub wyco_number: Option<String>,
    pub active_member: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShooterDetail {
    pub shooter_id: i64,
    pub name: String,
    pub classification: String,
    pub wyco_points: f64,
    pub wyco_number: Option<String>,
    pub active_member: bool,
    pub matches_shot: usize,
    pub eligible_scores: usize,
    pub history: Vec<HistoryEntry>,
    pub achievements: Vec<AchievementEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementEntry {
    pub name: String,
    pub match_id: i64,
    pub match_name: String,
    pub match_date: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub match_id: i64,
    pub match_name: String,
    pub match_date: String,
    pub venue: Option<String>,
    pub place: Option<i64>,
    pub points: Option<f64>,
    pub wyco_points: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchListItem {
    pub match_id: i64,
    pub name: String,
    pub date: String,
    pub venue: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScoresResponse {
    pub match_id: i64,
    pub name: String,
    pub date: String,
    pub venue: Option<String>,
    pub results: Vec<MatchResultItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResultItem {
    pub place: Option<i64>,
    pub shooter_id: i64,
    pub name: String,
    pub classification: String,
    pub percentage: Option<f64>,
    pub points: Option<f64>,
    pub wyco_points: Option<f64>,
}
