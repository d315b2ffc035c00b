//! Service integration tests against real throwaway SQLite databases.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serde_json::json;
use survey_common::{AppError, HmacAuthenticator};
use survey_core::{
    CompanyService, CreateCompanyInput, IssueTokenInput, ReportService, SubmissionService,
    TokenScope, TokenService,
};
use survey_db::repositories::{
    CompanyRepository, FreeTextRepository, SurveyResponseRepository, SurveyTokenRepository,
};
use survey_db::test_utils::TestDatabase;

struct Services {
    token: TokenService,
    submission: SubmissionService,
    report: ReportService,
    company: CompanyService,
    responses: SurveyResponseRepository,
    free_texts: FreeTextRepository,
    tokens: SurveyTokenRepository,
}

fn build_services(conn: DatabaseConnection) -> Services {
    let db = Arc::new(conn);
    let token_repo = SurveyTokenRepository::new(Arc::clone(&db));
    let response_repo = SurveyResponseRepository::new(Arc::clone(&db));
    let free_text_repo = FreeTextRepository::new(Arc::clone(&db));
    let company_repo = CompanyRepository::new(Arc::clone(&db));

    let token = TokenService::new(
        Arc::clone(&db),
        token_repo.clone(),
        company_repo.clone(),
    );
    let submission = SubmissionService::new(Arc::clone(&db), token.clone());
    let report = ReportService::new(
        response_repo.clone(),
        free_text_repo.clone(),
        company_repo.clone(),
    );
    let company = CompanyService::new(
        Arc::clone(&db),
        company_repo,
        Arc::new(HmacAuthenticator::new("integration-secret")),
    );

    Services {
        token,
        submission,
        report,
        company,
        responses: response_repo,
        free_texts: free_text_repo,
        tokens: token_repo,
    }
}

fn sample_payload(token: Option<&str>) -> serde_json::Value {
    let mut payload = json!({
        "submission_time": "2025-06-01T12:00:00Z",
        "user_agent": "Mozilla/5.0 (integration)",
        "page_load_time": 850,
        "overall_satisfaction": "satisfied",
        "recommendation": 9,
        "most_satisfied": "チームの雰囲気が良い",
        "other_comments": "",
    });
    if let Some(token) = token {
        payload["survey_token"] = json!(token);
    }
    payload
}

#[tokio::test]
async fn test_record_submission_end_to_end() {
    let db = TestDatabase::new().await.unwrap();
    let services = build_services(db.conn);

    let issued = services
        .token
        .issue(
            TokenScope::Admin,
            IssueTokenInput {
                max_responses: 3,
                expires_hours: 24,
                description: "engineering team".to_string(),
            },
        )
        .await
        .unwrap();

    let response_id = services
        .submission
        .record(&sample_payload(Some(&issued.token.token)))
        .await
        .unwrap();
    assert_eq!(response_id.len(), 36);

    // Response row, one free-text row (other_comments was empty), and the
    // counter increment all landed
    let stored = services.responses.list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].user_agent.as_deref(), Some("Mozilla/5.0 (integration)"));

    let free_texts = services.free_texts.list().await.unwrap();
    assert_eq!(free_texts.len(), 1);
    assert_eq!(free_texts[0].character_count, 10);

    let token = services.tokens.find(&issued.token.token).await.unwrap().unwrap();
    assert_eq!(token.current_responses, 1);
}

#[tokio::test]
async fn test_exhausted_token_rejects_and_persists_nothing() {
    let db = TestDatabase::new().await.unwrap();
    let services = build_services(db.conn);

    let issued = services
        .token
        .issue(
            TokenScope::Admin,
            IssueTokenInput {
                max_responses: 1,
                expires_hours: 24,
                description: String::new(),
            },
        )
        .await
        .unwrap();
    let token = issued.token.token;

    services
        .submission
        .record(&sample_payload(Some(&token)))
        .await
        .unwrap();

    let result = services
        .submission
        .record(&sample_payload(Some(&token)))
        .await;
    assert!(matches!(result, Err(AppError::TokenQuotaExhausted)));

    // Only the accepted submission is visible
    assert_eq!(services.responses.list().await.unwrap().len(), 1);
    let row = services.tokens.find(&token).await.unwrap().unwrap();
    assert_eq!(row.current_responses, 1);
}

#[tokio::test]
async fn test_concurrent_submissions_last_slot() {
    // Two respondents race for a token with a single remaining slot:
    // exactly one submission is accepted and the loser leaves no rows.
    let db = TestDatabase::create_unique().await.unwrap();
    let services = Arc::new(build_services(db.conn));

    let issued = services
        .token
        .issue(
            TokenScope::Admin,
            IssueTokenInput {
                max_responses: 1,
                expires_hours: 24,
                description: String::new(),
            },
        )
        .await
        .unwrap();
    let token = issued.token.token;

    let a = {
        let services = Arc::clone(&services);
        let token = token.clone();
        tokio::spawn(async move {
            services
                .submission
                .record(&sample_payload(Some(&token)))
                .await
        })
    };
    let b = {
        let services = Arc::clone(&services);
        let token = token.clone();
        tokio::spawn(async move {
            services
                .submission
                .record(&sample_payload(Some(&token)))
                .await
        })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1, "exactly one concurrent submission must win");

    // The loser's partial writes rolled back with its transaction
    assert_eq!(services.responses.list().await.unwrap().len(), 1);
    let row = services.tokens.find(&token).await.unwrap().unwrap();
    assert_eq!(row.current_responses, 1);
}

#[tokio::test]
async fn test_tenant_cascade_delete() {
    let db = TestDatabase::new().await.unwrap();
    let services = build_services(db.conn);

    services
        .company
        .create(CreateCompanyInput {
            company_id: "acme".to_string(),
            company_name: "Acme Corp".to_string(),
            access_key: "acme-key".to_string(),
            max_urls: 5,
            max_responses_per_url: 10,
        })
        .await
        .unwrap();

    let mut owned_tokens = Vec::new();
    for n in 0..2 {
        let issued = services
            .token
            .issue(
                TokenScope::Tenant("acme".to_string()),
                IssueTokenInput {
                    max_responses: 10,
                    expires_hours: 24,
                    description: format!("wave {n}"),
                },
            )
            .await
            .unwrap();
        owned_tokens.push(issued.token.token);
    }

    // Five responses spread across the two tokens
    for n in 0..5 {
        let token = &owned_tokens[n % 2];
        services
            .submission
            .record(&sample_payload(Some(token)))
            .await
            .unwrap();
    }
    assert_eq!(services.responses.list().await.unwrap().len(), 5);

    services.company.delete("acme").await.unwrap();

    // No row referencing the tenant, its tokens, or their responses remains
    assert!(services.responses.list().await.unwrap().is_empty());
    assert!(services.free_texts.list().await.unwrap().is_empty());
    for token in &owned_tokens {
        assert!(services.tokens.find(token).await.unwrap().is_none());
    }
    assert!(services.company.list().await.unwrap().is_empty());

    let result = services.company.delete("acme").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_tenant_issue_enforces_cap_and_clamp() {
    let db = TestDatabase::new().await.unwrap();
    let services = build_services(db.conn);

    services
        .company
        .create(CreateCompanyInput {
            company_id: "smallco".to_string(),
            company_name: "Small Co".to_string(),
            access_key: "key".to_string(),
            max_urls: 1,
            max_responses_per_url: 20,
        })
        .await
        .unwrap();

    // Requested quota above the tenant ceiling is clamped down
    let issued = services
        .token
        .issue(
            TokenScope::Tenant("smallco".to_string()),
            IssueTokenInput {
                max_responses: 500,
                expires_hours: 24,
                description: "big ask".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(issued.token.max_responses, 20);
    assert_eq!(issued.survey_url, format!("/survey/{}", issued.token.token));

    // The cap counts live tokens strictly
    let result = services
        .token
        .issue(
            TokenScope::Tenant("smallco".to_string()),
            IssueTokenInput {
                max_responses: 5,
                expires_hours: 24,
                description: "one too many".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    // Disabling the live token frees the slot
    services
        .token
        .disable_for_company("smallco", &issued.token.token)
        .await
        .unwrap();
    assert!(
        services
            .token
            .issue(
                TokenScope::Tenant("smallco".to_string()),
                IssueTokenInput {
                    max_responses: 5,
                    expires_hours: 24,
                    description: "after disable".to_string(),
                },
            )
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_statistics_over_recorded_submissions() {
    let db = TestDatabase::new().await.unwrap();
    let services = build_services(db.conn);

    // Tokenless submissions mixing promoters and detractors
    for (satisfaction, recommendation) in [
        ("very_satisfied", 9),
        ("satisfied", 9),
        ("very_satisfied", 10),
        ("neutral", 5),
        ("dissatisfied", 3),
    ] {
        let payload = json!({
            "submission_time": "2025-06-01T12:00:00Z",
            "overall_satisfaction": satisfaction,
            "recommendation": recommendation,
        });
        services.submission.record(&payload).await.unwrap();
    }

    let stats = services.report.statistics().await.unwrap();

    assert_eq!(stats.total_responses, 5);
    assert_eq!(stats.nps_score, 20.0);
    // (5 + 4 + 5 + 3 + 2) / 5
    assert_eq!(stats.avg_satisfaction, 3.8);
    assert_eq!(stats.satisfaction_distribution, [0, 1, 1, 1, 2]);
    // Placeholder figures are fixed regardless of stored data
    assert_eq!(stats.completion_rate, 87.5);
    assert_eq!(stats.response_trend, [2, 5, 3, 8, 6, 4, 7]);
    assert_eq!(stats.department_data.len(), 5);
}

#[tokio::test]
async fn test_company_summary_scoped_to_tenant() {
    let db = TestDatabase::new().await.unwrap();
    let services = build_services(db.conn);

    services
        .company
        .create(CreateCompanyInput {
            company_id: "acme".to_string(),
            company_name: "Acme Corp".to_string(),
            access_key: "key".to_string(),
            max_urls: 5,
            max_responses_per_url: 50,
        })
        .await
        .unwrap();

    let issued = services
        .token
        .issue(
            TokenScope::Tenant("acme".to_string()),
            IssueTokenInput {
                max_responses: 50,
                expires_hours: 24,
                description: "q2".to_string(),
            },
        )
        .await
        .unwrap();

    // One tenant submission, one unrelated tokenless submission
    services
        .submission
        .record(&sample_payload(Some(&issued.token.token)))
        .await
        .unwrap();
    services.submission.record(&sample_payload(None)).await.unwrap();

    let summary = services.report.company_summary("acme").await.unwrap();
    assert_eq!(summary.total_urls, 1);
    assert_eq!(summary.total_responses, 1);
    assert_eq!(summary.avg_satisfaction, 4.0);
}

#[tokio::test]
async fn test_free_text_analysis_truncates_recent() {
    let db = TestDatabase::new().await.unwrap();
    let services = build_services(db.conn);

    let long_comment = "と".repeat(450);
    let payload = json!({
        "submission_time": "2025-06-01T12:00:00Z",
        "most_satisfied": long_comment,
        "least_satisfied": "評価制度",
    });
    services.submission.record(&payload).await.unwrap();

    let analysis = services.report.free_text_analysis().await.unwrap();

    assert_eq!(analysis.statistics.len(), 2);
    let most = analysis
        .statistics
        .iter()
        .find(|s| s.question_type == "most_satisfied")
        .unwrap();
    assert_eq!(most.response_count, 1);
    assert_eq!(most.avg_length, 450.0);

    let recent_long = analysis
        .recent_responses
        .iter()
        .find(|r| r.length == 450)
        .unwrap();
    assert_eq!(recent_long.text.chars().count(), 203); // 200 chars + "..."
    assert!(recent_long.text.ends_with("..."));
}
