//! Shaping of the raw audit report

use crate::audit::error::AuditError;
use crate::audit::{
    AUDIT_CATEGORIES, AuditCategoryResult, AuditCheck, AuditOutcome, AuditRef,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RawReport {
    categories: serde_json::Map<String, Value>,
    audits: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    title: String,
    #[serde(default)]
    description: String,
    score: Option<f64>,
    #[serde(default, rename = "auditRefs")]
    audit_refs: Vec<RawAuditRef>,
}

#[derive(Debug, Deserialize)]
struct RawAuditRef {
    id: String,
    #[serde(default)]
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct RawAudit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    score: Option<f64>,
    #[serde(rename = "displayValue")]
    display_value: Option<String>,
    #[serde(rename = "numericValue")]
    numeric_value: Option<f64>,
}

/// Convert a raw 0..1 category score to an integer percentage, rounding
/// half up. A missing category score maps to zero.
fn score_percent(raw: Option<f64>) -> u8 {
    raw.map(|score| (score * 100.0).round() as u8).unwrap_or(0)
}

/// Shape a raw JSON audit report into category results and checks
///
/// Categories come back in [`AUDIT_CATEGORIES`] order regardless of report
/// layout; a missing category is an error. Checks keep the order the report
/// listed them in.
pub fn shape_report(report: &str) -> Result<AuditOutcome, AuditError> {
    let raw: RawReport = serde_json::from_str(report)?;

    let mut categories = Vec::with_capacity(AUDIT_CATEGORIES.len());
    for name in AUDIT_CATEGORIES {
        let value = raw
            .categories
            .get(name)
            .ok_or_else(|| AuditError::MissingCategory(name.to_string()))?;
        let category: RawCategory = serde_json::from_value(value.clone())?;

        categories.push(AuditCategoryResult {
            category: name.to_string(),
            score: score_percent(category.score),
            title: category.title,
            description: category.description,
            audit_refs: category
                .audit_refs
                .into_iter()
                .map(|r| AuditRef {
                    id: r.id,
                    weight: r.weight,
                })
                .collect(),
        });
    }

    let mut checks = Vec::with_capacity(raw.audits.len());
    for (id, value) in raw.audits {
        let audit: RawAudit = serde_json::from_value(value)?;
        checks.push(AuditCheck {
            id,
            title: audit.title,
            description: audit.description,
            score: audit.score,
            display_value: audit.display_value,
            numeric_value: audit.numeric_value,
        });
    }

    Ok(AuditOutcome { categories, checks })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> String {
        r#"{
            "categories": {
                "seo": {
                    "title": "SEO",
                    "description": "Search engine checks",
                    "score": 0.91,
                    "auditRefs": [{"id": "document-title", "weight": 1}]
                },
                "performance": {
                    "title": "Performance",
                    "description": "Speed checks",
                    "score": 0.873,
                    "auditRefs": [
                        {"id": "first-contentful-paint", "weight": 10},
                        {"id": "speed-index", "weight": 10}
                    ]
                },
                "accessibility": {
                    "title": "Accessibility",
                    "description": "A11y checks",
                    "score": 0.875,
                    "auditRefs": []
                },
                "best-practices": {
                    "title": "Best Practices",
                    "description": "General checks",
                    "score": null,
                    "auditRefs": []
                }
            },
            "audits": {
                "first-contentful-paint": {
                    "title": "First Contentful Paint",
                    "description": "FCP marks the time at which content is painted",
                    "score": 0.82,
                    "displayValue": "1.2 s",
                    "numericValue": 1234.5
                },
                "document-title": {
                    "title": "Document has a title element",
                    "description": "The title describes the page",
                    "score": 1
                },
                "speed-index": {
                    "title": "Speed Index",
                    "description": "How quickly content is visibly populated",
                    "score": 0,
                    "displayValue": "9.9 s"
                },
                "video-caption": {
                    "title": "Video captions",
                    "description": "Not applicable here",
                    "score": null
                }
            }
        }"#
        .to_string()
    }

    #[test]
    fn test_categories_come_back_in_fixed_order() {
        let outcome = shape_report(&sample_report()).unwrap();

        let names: Vec<&str> = outcome
            .categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["performance", "accessibility", "best-practices", "seo"]
        );
    }

    #[test]
    fn test_scores_round_half_up() {
        let outcome = shape_report(&sample_report()).unwrap();

        let score_of = |name: &str| {
            outcome
                .categories
                .iter()
                .find(|c| c.category == name)
                .unwrap()
                .score
        };

        assert_eq!(score_of("performance"), 87); // 0.873 -> 87
        assert_eq!(score_of("accessibility"), 88); // 0.875 is a half boundary
        assert_eq!(score_of("seo"), 91);
        assert_eq!(score_of("best-practices"), 0); // null score
    }

    #[test]
    fn test_checks_preserve_report_order_and_null_scores() {
        let outcome = shape_report(&sample_report()).unwrap();

        let ids: Vec<&str> = outcome.checks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "first-contentful-paint",
                "document-title",
                "speed-index",
                "video-caption"
            ]
        );

        assert_eq!(outcome.checks[0].score, Some(0.82));
        assert_eq!(outcome.checks[0].display_value.as_deref(), Some("1.2 s"));
        assert_eq!(outcome.checks[0].numeric_value, Some(1234.5));
        assert_eq!(outcome.checks[2].score, Some(0.0));
        assert_eq!(outcome.checks[3].score, None);
    }

    #[test]
    fn test_audit_refs_are_carried_through() {
        let outcome = shape_report(&sample_report()).unwrap();

        let performance = &outcome.categories[0];
        assert_eq!(performance.audit_refs.len(), 2);
        assert_eq!(performance.audit_refs[0].id, "first-contentful-paint");
        assert_eq!(performance.audit_refs[0].weight, 10.0);
    }

    #[test]
    fn test_missing_category_is_an_error() {
        let report = r#"{"categories": {"seo": {"title": "SEO", "score": 1}}, "audits": {}}"#;
        let result = shape_report(report);
        assert!(matches!(result, Err(AuditError::MissingCategory(ref c)) if c == "performance"));
    }

    #[test]
    fn test_score_percent_boundaries() {
        assert_eq!(score_percent(Some(0.0)), 0);
        assert_eq!(score_percent(Some(1.0)), 100);
        assert_eq!(score_percent(Some(0.005)), 1);
        assert_eq!(score_percent(Some(0.004)), 0);
        assert_eq!(score_percent(None), 0);
    }
}
