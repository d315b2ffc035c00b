//! Reporting and aggregation service.
//!
//! Read-only. Some figures are computed from stored rows (totals, average
//! satisfaction, NPS, the satisfaction histogram); others are fixed
//! illustrative values carried over from the original dashboards
//! (completion rate, department and category breakdowns, the response
//! trend). The split is deliberate and kept explicit: the placeholder
//! providers sit together at the bottom of this file and read nothing.

use std::collections::HashMap;

use sea_orm::ActiveEnum;
use serde::Serialize;
use serde_json::Value;
use survey_common::AppResult;
use survey_db::{
    entities::free_text_response::QuestionType,
    repositories::{CompanyRepository, FreeTextRepository, SurveyResponseRepository},
};

/// Number of characters a recent free-text entry is truncated to.
const RECENT_TEXT_CHARS: usize = 200;

/// How many recent free-text entries are returned.
const RECENT_TEXT_LIMIT: u64 = 10;

/// Fixed completion rate reported by the dashboards.
const COMPLETION_RATE: f64 = 87.5;

/// Aggregate statistics for the admin dashboard.
#[derive(Debug, Serialize)]
pub struct Statistics {
    pub total_responses: i64,
    pub completion_rate: f64,
    pub avg_satisfaction: f64,
    pub nps_score: f64,
    pub department_data: Vec<DepartmentStat>,
    pub category_satisfaction: Vec<CategoryStat>,
    pub satisfaction_distribution: [i64; 5],
    pub response_trend: [i64; 7],
}

/// Per-department satisfaction figures.
#[derive(Debug, Serialize)]
pub struct DepartmentStat {
    pub department: &'static str,
    pub satisfaction: f64,
    pub responses: i64,
}

/// Per-category satisfaction and expectation figures.
#[derive(Debug, Serialize)]
pub struct CategoryStat {
    pub category: &'static str,
    pub satisfaction: f64,
    pub expectation: f64,
}

/// A stored response with its payload decoded.
#[derive(Debug, Serialize)]
pub struct StoredResponse {
    pub id: String,
    pub submission_time: String,
    pub data: Value,
    pub created_at: String,
}

/// Free-text statistics plus the most recent entries.
#[derive(Debug, Serialize)]
pub struct FreeTextAnalysis {
    pub statistics: Vec<FreeTextQuestionStat>,
    pub recent_responses: Vec<RecentFreeText>,
}

/// Aggregated figures for one free-text question.
#[derive(Debug, Serialize)]
pub struct FreeTextQuestionStat {
    pub question_type: String,
    pub question_label: Option<String>,
    pub response_count: i64,
    pub avg_length: f64,
    pub min_length: i32,
    pub max_length: i32,
}

/// One recent free-text entry, truncated for display.
#[derive(Debug, Serialize)]
pub struct RecentFreeText {
    pub text: String,
    pub length: i32,
    pub time: String,
    pub question: Option<String>,
}

/// CSV export of all responses.
#[derive(Debug, Serialize)]
pub struct ResponseExport {
    pub data: String,
    pub count: usize,
}

/// Tenant dashboard roll-up.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub total_urls: i64,
    pub total_responses: i64,
    pub avg_satisfaction: f64,
    pub completion_rate: f64,
}

/// Map an ordinal satisfaction label to its 1-5 score.
fn satisfaction_score(value: &str) -> Option<i64> {
    match value {
        "very_satisfied" => Some(5),
        "satisfied" => Some(4),
        "neutral" => Some(3),
        "dissatisfied" => Some(2),
        "very_dissatisfied" => Some(1),
        _ => None,
    }
}

/// Extract a 0-10 recommendation score from a payload value.
fn nps_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Classical NPS: percentage of promoters (>= 9) minus percentage of
/// detractors (<= 6), in [-100, 100].
fn calculate_nps(scores: &[i64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let promoters = scores.iter().filter(|&&s| s >= 9).count() as f64;
    let detractors = scores.iter().filter(|&&s| s <= 6).count() as f64;
    (promoters - detractors) / scores.len() as f64 * 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Reporting service.
#[derive(Clone)]
pub struct ReportService {
    response_repo: SurveyResponseRepository,
    free_text_repo: FreeTextRepository,
    company_repo: CompanyRepository,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(
        response_repo: SurveyResponseRepository,
        free_text_repo: FreeTextRepository,
        company_repo: CompanyRepository,
    ) -> Self {
        Self {
            response_repo,
            free_text_repo,
            company_repo,
        }
    }

    /// Aggregate statistics for the admin dashboard.
    pub async fn statistics(&self) -> AppResult<Statistics> {
        let rows = self.response_repo.list().await?;
        let total_responses = rows.len() as i64;

        let mut satisfaction_scores = Vec::new();
        let mut nps_scores = Vec::new();

        for row in &rows {
            // Undecodable payloads are skipped, not fatal
            let Ok(data) = serde_json::from_str::<Value>(&row.response_data) else {
                continue;
            };

            if let Some(score) = data
                .get("overall_satisfaction")
                .and_then(Value::as_str)
                .and_then(satisfaction_score)
            {
                satisfaction_scores.push(score);
            }

            if let Some(score) = data.get("recommendation").and_then(nps_score) {
                nps_scores.push(score);
            }
        }

        let avg_satisfaction = if satisfaction_scores.is_empty() {
            0.0
        } else {
            satisfaction_scores.iter().sum::<i64>() as f64 / satisfaction_scores.len() as f64
        };

        Ok(Statistics {
            total_responses,
            completion_rate: COMPLETION_RATE,
            avg_satisfaction: round2(avg_satisfaction),
            nps_score: round1(calculate_nps(&nps_scores)),
            department_data: department_data(),
            category_satisfaction: category_satisfaction(),
            satisfaction_distribution: satisfaction_distribution(&satisfaction_scores),
            response_trend: response_trend(),
        })
    }

    /// All stored responses with decoded payloads, newest first.
    pub async fn responses(&self) -> AppResult<Vec<StoredResponse>> {
        let rows = self.response_repo.list().await?;

        let responses = rows
            .into_iter()
            .filter_map(|row| {
                let data = serde_json::from_str(&row.response_data).ok()?;
                Some(StoredResponse {
                    id: row.id,
                    submission_time: row.submission_time,
                    data,
                    created_at: row.created_at.to_rfc3339(),
                })
            })
            .collect();

        Ok(responses)
    }

    /// Free-text statistics and the most recent entries.
    pub async fn free_text_analysis(&self) -> AppResult<FreeTextAnalysis> {
        let rows = self.free_text_repo.list().await?;

        let mut groups: HashMap<(QuestionType, Option<String>), Vec<i32>> = HashMap::new();
        for row in &rows {
            groups
                .entry((row.question_type.clone(), row.question_label.clone()))
                .or_default()
                .push(row.character_count);
        }

        let mut statistics: Vec<FreeTextQuestionStat> = groups
            .into_iter()
            .map(|((question_type, question_label), lengths)| {
                let count = lengths.len() as i64;
                let avg = lengths.iter().map(|&l| i64::from(l)).sum::<i64>() as f64
                    / lengths.len() as f64;
                FreeTextQuestionStat {
                    question_type: question_type.to_value(),
                    question_label,
                    response_count: count,
                    avg_length: round1(avg),
                    min_length: lengths.iter().copied().min().unwrap_or(0),
                    max_length: lengths.iter().copied().max().unwrap_or(0),
                }
            })
            .collect();
        statistics.sort_by(|a, b| {
            b.response_count
                .cmp(&a.response_count)
                .then_with(|| a.question_type.cmp(&b.question_type))
        });

        let recent_responses = self
            .free_text_repo
            .recent(RECENT_TEXT_LIMIT)
            .await?
            .into_iter()
            .map(|row| {
                let truncated = if row.response_text.chars().count() > RECENT_TEXT_CHARS {
                    let short: String = row.response_text.chars().take(RECENT_TEXT_CHARS).collect();
                    format!("{short}...")
                } else {
                    row.response_text
                };
                RecentFreeText {
                    text: truncated,
                    length: row.character_count,
                    time: row.response_time.to_rfc3339(),
                    question: row.question_label,
                }
            })
            .collect();

        Ok(FreeTextAnalysis {
            statistics,
            recent_responses,
        })
    }

    /// CSV export of all responses, newest first.
    pub async fn export(&self) -> AppResult<ResponseExport> {
        let rows = self.response_repo.list().await?;
        let count = rows.len();

        let mut lines = vec!["ID,送信時刻,回答データ,作成日時".to_string()];
        for row in rows {
            let escape = |s: &str| s.replace('"', "\"\"");
            lines.push(format!(
                "\"{}\",\"{}\",\"{}\",\"{}\"",
                escape(&row.id),
                escape(&row.submission_time),
                escape(&row.response_data),
                row.created_at.to_rfc3339(),
            ));
        }

        Ok(ResponseExport {
            data: lines.join("\n"),
            count,
        })
    }

    /// Roll-up for one tenant's dashboard.
    pub async fn company_summary(&self, company_id: &str) -> AppResult<CompanySummary> {
        let tokens = self.company_repo.tokens_of(company_id).await?;
        let rows = self.response_repo.list_by_tokens(&tokens).await?;

        let mut satisfaction_scores = Vec::new();
        for row in &rows {
            let Ok(data) = serde_json::from_str::<Value>(&row.response_data) else {
                continue;
            };
            if let Some(score) = data
                .get("overall_satisfaction")
                .and_then(Value::as_str)
                .and_then(satisfaction_score)
            {
                satisfaction_scores.push(score);
            }
        }

        let avg_satisfaction = if satisfaction_scores.is_empty() {
            0.0
        } else {
            satisfaction_scores.iter().sum::<i64>() as f64 / satisfaction_scores.len() as f64
        };

        Ok(CompanySummary {
            total_urls: tokens.len() as i64,
            total_responses: rows.len() as i64,
            avg_satisfaction: round2(avg_satisfaction),
            completion_rate: COMPLETION_RATE,
        })
    }
}

/// Five-bucket histogram over mapped satisfaction scores.
fn satisfaction_distribution(scores: &[i64]) -> [i64; 5] {
    let mut distribution = [0i64; 5];
    for &score in scores {
        if (1..=5).contains(&score) {
            distribution[(score - 1) as usize] += 1;
        }
    }
    distribution
}

// === Placeholder figures ===
//
// Fixed illustrative values, not derived from stored rows. A production
// deployment would replace these with aggregation queries grouped by the
// matching payload fields.

fn department_data() -> Vec<DepartmentStat> {
    vec![
        DepartmentStat {
            department: "営業部",
            satisfaction: 3.8,
            responses: 25,
        },
        DepartmentStat {
            department: "エンジニアリング部",
            satisfaction: 4.1,
            responses: 18,
        },
        DepartmentStat {
            department: "マーケティング部",
            satisfaction: 3.5,
            responses: 12,
        },
        DepartmentStat {
            department: "人事部",
            satisfaction: 4.0,
            responses: 8,
        },
        DepartmentStat {
            department: "経理部",
            satisfaction: 3.7,
            responses: 6,
        },
    ]
}

fn category_satisfaction() -> Vec<CategoryStat> {
    vec![
        CategoryStat {
            category: "働く環境",
            satisfaction: 4.2,
            expectation: 4.5,
        },
        CategoryStat {
            category: "人間関係",
            satisfaction: 4.0,
            expectation: 4.3,
        },
        CategoryStat {
            category: "成長実感",
            satisfaction: 3.8,
            expectation: 4.6,
        },
        CategoryStat {
            category: "仕事内容",
            satisfaction: 3.7,
            expectation: 4.1,
        },
        CategoryStat {
            category: "福利厚生",
            satisfaction: 3.5,
            expectation: 4.4,
        },
    ]
}

const fn response_trend() -> [i64; 7] {
    [2, 5, 3, 8, 6, 4, 7]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_nps_from_spec_example() {
        // promoters 3/5 = 60%, detractors 2/5 = 40%
        assert_eq!(calculate_nps(&[9, 9, 10, 5, 3]), 20.0);
    }

    #[test]
    fn test_nps_empty_is_zero() {
        assert_eq!(calculate_nps(&[]), 0.0);
    }

    #[test]
    fn test_nps_bounds() {
        assert_eq!(calculate_nps(&[10, 10]), 100.0);
        assert_eq!(calculate_nps(&[0, 1, 2]), -100.0);
        // Passives (7-8) count toward neither side
        assert_eq!(calculate_nps(&[7, 8]), 0.0);
    }

    #[test]
    fn test_satisfaction_score_mapping() {
        assert_eq!(satisfaction_score("very_satisfied"), Some(5));
        assert_eq!(satisfaction_score("very_dissatisfied"), Some(1));
        assert_eq!(satisfaction_score("満足している"), None);
    }

    #[test]
    fn test_nps_score_accepts_number_or_string() {
        assert_eq!(nps_score(&serde_json::json!(9)), Some(9));
        assert_eq!(nps_score(&serde_json::json!("7")), Some(7));
        assert_eq!(nps_score(&serde_json::json!("high")), None);
        assert_eq!(nps_score(&serde_json::json!(null)), None);
    }

    #[test]
    fn test_satisfaction_distribution() {
        let scores = [5, 5, 3, 1, 4];
        assert_eq!(satisfaction_distribution(&scores), [1, 0, 1, 1, 2]);
    }

    #[test]
    fn test_distribution_ignores_out_of_range() {
        assert_eq!(satisfaction_distribution(&[0, 6, 3]), [0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round2(3.666_666), 3.67);
        assert_eq!(round1(16.666_666), 16.7);
    }
}
