use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Fixed, ordered pipeline stages. Column order on the board follows
/// declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum Stage {
    Applied,
    Screening,
    Interview,
    Offer,
    Hired,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Applied,
        Stage::Screening,
        Stage::Interview,
        Stage::Offer,
        Stage::Hired,
    ];

    /// Name used on the wire and as the column identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Applied => "Applied",
            Stage::Screening => "Screening",
            Stage::Interview => "Interview",
            Stage::Offer => "Offer",
            Stage::Hired => "Hired",
        }
    }

    /// Exact, case-sensitive match against the wire name.
    pub fn from_wire(name: &str) -> Option<Stage> {
        Stage::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stage '{0}' (expected one of Applied, Screening, Interview, Offer, Hired)")]
pub struct ParseStageError(pub String);

/// Case-insensitive parse for user input.
impl FromStr for Stage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseStageError(wanted.to_string()))
    }
}

/// Stage value as received from the backend. Unrecognized names are kept
/// verbatim so the record round-trips, but they never match a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StageTag {
    Known(Stage),
    Unrecognized(String),
}

impl StageTag {
    pub fn known(&self) -> Option<Stage> {
        match self {
            StageTag::Known(stage) => Some(*stage),
            StageTag::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StageTag::Known(stage) => stage.as_str(),
            StageTag::Unrecognized(raw) => raw,
        }
    }

    pub fn is(&self, stage: Stage) -> bool {
        self.known() == Some(stage)
    }
}

impl From<Stage> for StageTag {
    fn from(stage: Stage) -> Self {
        StageTag::Known(stage)
    }
}

impl From<String> for StageTag {
    fn from(raw: String) -> Self {
        match Stage::from_wire(&raw) {
            Some(stage) => StageTag::Known(stage),
            None => StageTag::Unrecognized(raw),
        }
    }
}

impl From<StageTag> for String {
    fn from(tag: StageTag) -> Self {
        match tag {
            StageTag::Known(stage) => stage.as_str().to_string(),
            StageTag::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for StageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One card on the board, as returned by `GET /applications/board`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidate_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_title: String,
    pub stage: StageTag,
    #[serde(default)]
    pub score: Option<u32>, // 0 – 100
    #[serde(default, with = "crate::models::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Application {
    /// Route of the per-application detail view.
    pub fn detail_path(&self) -> String {
        detail_path(self.id)
    }
}

pub fn detail_path(id: i64) -> String {
    format!("/applications/{id}")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateContact {
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
}

impl CandidateContact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Returned by `GET /applications/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDetail {
    pub id: i64,
    pub candidate: CandidateContact,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_title: String,
    pub stage: StageTag,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, with = "crate::models::timestamp")]
    pub applied_at: Option<DateTime<Utc>>,
}

/// Body of `PUT /applications/{id}/stage`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StageUpdate {
    pub stage: Stage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stage_order_matches_pipeline() {
        let names: Vec<&str> = Stage::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            vec!["Applied", "Screening", "Interview", "Offer", "Hired"]
        );
        assert!(Stage::Applied < Stage::Hired);
    }

    #[test]
    fn test_stage_from_str_is_case_insensitive() {
        assert_eq!("interview".parse::<Stage>().unwrap(), Stage::Interview);
        assert_eq!(" OFFER ".parse::<Stage>().unwrap(), Stage::Offer);
        assert!("Rejected".parse::<Stage>().is_err());
    }

    #[test]
    fn test_wire_match_is_exact() {
        assert_eq!(Stage::from_wire("Hired"), Some(Stage::Hired));
        assert_eq!(Stage::from_wire("hired"), None);
    }

    #[test]
    fn test_application_deserializes_backend_row() {
        let app: Application = serde_json::from_value(json!({
            "id": 7,
            "candidate_name": "Ada Lovelace",
            "job_title": "Backend Engineer",
            "stage": "Interview",
            "score": 88,
            "updated_at": "Tue, 14 Oct 2025 10:30:00 GMT"
        }))
        .unwrap();

        assert_eq!(app.id, 7);
        assert_eq!(app.stage, StageTag::Known(Stage::Interview));
        assert_eq!(app.score, Some(88));
        assert!(app.updated_at.is_some());
        assert_eq!(app.detail_path(), "/applications/7");
    }

    #[test]
    fn test_unrecognized_stage_is_preserved() {
        let app: Application = serde_json::from_value(json!({
            "id": 3,
            "candidate_name": "Grace Hopper",
            "job_title": "SRE",
            "stage": "Rejected",
            "score": null,
            "updated_at": null
        }))
        .unwrap();

        assert_eq!(app.stage, StageTag::Unrecognized("Rejected".to_string()));
        assert_eq!(app.stage.known(), None);
        assert_eq!(app.score, None);

        let back = serde_json::to_value(&app).unwrap();
        assert_eq!(back["stage"], "Rejected");
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let app: Application =
            serde_json::from_value(json!({ "id": 1, "stage": "Applied" })).unwrap();
        assert_eq!(app.candidate_name, "");
        assert_eq!(app.score, None);
        assert_eq!(app.updated_at, None);
    }

    #[test]
    fn test_null_text_fields_default_to_empty() {
        let app: Application = serde_json::from_value(json!({
            "id": 2,
            "candidate_name": null,
            "job_title": null,
            "stage": "Screening"
        }))
        .unwrap();
        assert_eq!(app.candidate_name, "");
        assert_eq!(app.job_title, "");
        assert_eq!(app.stage.known(), Some(Stage::Screening));

        let detail: ApplicationDetail = serde_json::from_value(json!({
            "id": 2,
            "candidate": { "first_name": null, "last_name": "Hopper" },
            "job_title": null,
            "stage": "Screening"
        }))
        .unwrap();
        assert_eq!(detail.candidate.full_name(), "Hopper");
        assert_eq!(detail.job_title, "");
    }

    #[test]
    fn test_stage_update_body_uses_wire_name() {
        let body = serde_json::to_value(StageUpdate {
            stage: Stage::Screening,
        })
        .unwrap();
        assert_eq!(body, json!({ "stage": "Screening" }));
    }

    #[test]
    fn test_detail_full_name_trims_missing_parts() {
        let detail: ApplicationDetail = serde_json::from_value(json!({
            "id": 4,
            "candidate": { "first_name": "Linus", "last_name": "", "email": "l@example.com", "phone": null, "linkedin_url": null },
            "job_title": "Kernel Dev",
            "stage": "Offer",
            "score": 91,
            "status": "active",
            "applied_at": "2025-09-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(detail.candidate.full_name(), "Linus");
        assert_eq!(detail.stage.known(), Some(Stage::Offer));
    }
}
