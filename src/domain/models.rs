use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::numbers::{parse_numeric, RecordError};
use crate::config::venues;

/// One match as exported from the results site: the overall sheet plus
/// any per-stage sheets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchExport {
    pub name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub venue: Option<VenueRef>,
    #[serde(default)]
    pub stages: Vec<StageExport>,
}

/// Venue given either by slug or by numeric id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum VenueRef {
    Id(i64),
    Slug(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageExport {
    pub name: String,
    #[serde(default)]
    pub results: Vec<ResultRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub place: Option<RawNumber>,
    #[serde(default)]
    pub percentage: Option<RawNumber>,
    #[serde(default)]
    pub points: Option<RawNumber>,
}

/// Sheet cells arrive as JSON numbers or as the text shown on the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    pub fn parse(&self, field: &'static str) -> Result<f64, RecordError> {
        match self {
            RawNumber::Number(n) if n.is_finite() => Ok(*n),
            RawNumber::Number(n) => Err(RecordError::NotNumeric {
                field,
                raw: n.to_string(),
            }),
            RawNumber::Text(text) => parse_numeric(field, text),
        }
    }
}

/// A result row that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResult {
    pub name: String,
    pub place: Option<i64>,
    pub percentage: f64,
    pub points: f64,
}

impl ResultRow {
    pub fn parse(&self) -> Result<ParsedResult, RecordError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RecordError::BlankName);
        }

        let percentage = required(&self.percentage, "percentage")?;
        let points = required(&self.points, "points")?;
        let place = match &self.place {
            Some(raw) => Some(raw.parse("place")?.round() as i64),
            None => None,
        };

        Ok(ParsedResult {
            name: name.to_string(),
            place,
            percentage,
            points,
        })
    }
}

fn required(value: &Option<RawNumber>, field: &'static str) -> Result<f64, RecordError> {
    value
        .as_ref()
        .ok_or(RecordError::Missing { field })?
        .parse(field)
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid date regex"))
}

impl MatchExport {
    /// Explicit date, else the first `YYYY-MM-DD` in the name, else `fallback`.
    pub fn match_date(&self, fallback: NaiveDate) -> NaiveDate {
        self.date
            .as_deref()
            .and_then(parse_date)
            .or_else(|| {
                date_pattern()
                    .find(&self.name)
                    .and_then(|m| parse_date(m.as_str()))
            })
            .unwrap_or(fallback)
    }

    /// Explicit venue, else the first known venue named in the match title.
    pub fn venue_id(&self) -> Option<i64> {
        match &self.venue {
            Some(VenueRef::Id(id)) => Some(*id),
            Some(VenueRef::Slug(slug)) => venues::find_by_slug(slug).map(|v| v.id),
            None => venues::venue_for_match_name(&self.name).map(|v| v.id),
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
