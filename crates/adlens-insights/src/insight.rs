//! Insight values, the prompt contract and validation of raw responses.

use std::fmt;

use adlens_core::InsightVariant;
use serde::Serialize;
use serde_json::Value;

use crate::dataset::Dataset;
use crate::error::InsightError;

const POSITIVE_PREFIX: &str = "Positive: ";
const NEGATIVE_PREFIX: &str = "Negative: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    fn prefix(self) -> &'static str {
        match self {
            Polarity::Positive => POSITIVE_PREFIX,
            Polarity::Negative => NEGATIVE_PREFIX,
        }
    }

    /// Splits a leading `positive:` / `negative:` label (any case) off
    /// `text`. Unlabeled text comes back whole with no polarity.
    fn split_label(text: &str) -> (Option<Self>, &str) {
        for polarity in [Polarity::Positive, Polarity::Negative] {
            let label = polarity.prefix().trim_end();
            let matches = text
                .get(..label.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(label));
            if matches {
                return (Some(polarity), text[label.len()..].trim_start());
            }
        }
        (None, text)
    }
}

/// One comparative finding. Plain insights carry no polarity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub polarity: Option<Polarity>,
    pub text: String,
}

impl Insight {
    #[must_use]
    pub fn positive(text: impl Into<String>) -> Self {
        Self {
            polarity: Some(Polarity::Positive),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn negative(text: impl Into<String>) -> Self {
        Self {
            polarity: Some(Polarity::Negative),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            polarity: None,
            text: text.into(),
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.polarity {
            Some(polarity) => write!(f, "{}{}", polarity.prefix(), self.text),
            None => f.write_str(&self.text),
        }
    }
}

/// Builds the comparison prompt: instructions for `variant`, then the
/// statistical summary of both datasets.
#[must_use]
pub fn build_prompt(variant: InsightVariant, own: &Dataset, competitor: &Dataset) -> String {
    let count = variant.expected_count();
    let instructions = match variant {
        InsightVariant::Labeled => format!(
            "Positive insights: areas where my campaigns perform better than competitors.\n\
             Negative insights: areas where my campaigns perform worse, or opportunities to improve.\n\n\
             Return ONLY valid JSON in exactly this format (no markdown, no code fences, no other text):\n\
             {{\"insights\": [\"Positive: ...\", \"Negative: ...\", \"Positive: ...\", \"Negative: ...\", \"Positive: ...\", \"Negative: ...\"]}}\n\n\
             Generate exactly {count} insights, {half} positive and {half} negative, alternating and starting with positive.\n\
             Prefix each insight with \"Positive: \" or \"Negative: \".",
            half = count / 2
        ),
        InsightVariant::Plain => format!(
            "Return ONLY valid JSON in exactly this format (no markdown, no code fences, no other text):\n\
             {{\"insights\": [\"insight 1\", \"insight 2\", \"insight 3\", \"insight 4\", \"insight 5\"]}}\n\n\
             Generate exactly {count} insights."
        ),
    };

    format!(
        "You are an expert marketing strategist and data analyst. Compare my campaign data with \
         competitor data and produce specific, actionable marketing insights.\n\n\
         {instructions}\n\n\
         Each insight should be specific and actionable, grounded in a comparison of the two \
         datasets, quote metrics or percentages where possible, and cover different aspects \
         (targeting, content, timing, budget, channels).\n\n\
         MY CAMPAIGN DATA:\n{}\n\
         COMPETITORS DATA:\n{}",
        own.summary("Campaign Data Summary"),
        competitor.summary("Competitors Data Summary"),
    )
}

/// Removes Markdown code fences (```` ```json ```` and ```` ``` ````).
#[must_use]
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses and validates a raw service response against `variant`'s contract:
/// a JSON object with a single `insights` list of exactly
/// [`InsightVariant::expected_count`] strings. Labeled insights take their
/// polarity from a `Positive:` / `Negative:` prefix when one is present; the
/// prompt asks for alternation but order is not checked.
///
/// # Errors
///
/// Returns [`InsightError::InvalidResponse`] on any deviation.
pub fn parse_insights(raw: &str, variant: InsightVariant) -> Result<Vec<Insight>, InsightError> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| InsightError::invalid_response(format!("response is not JSON: {e}")))?;

    let object = value
        .as_object()
        .ok_or_else(|| InsightError::invalid_response("response is not a JSON object"))?;
    let items = object
        .get("insights")
        .ok_or_else(|| InsightError::invalid_response("response missing 'insights' key"))?
        .as_array()
        .ok_or_else(|| InsightError::invalid_response("'insights' must be a list"))?;

    let expected = variant.expected_count();
    if items.len() != expected {
        return Err(InsightError::invalid_response(format!(
            "expected {expected} insights, got {}",
            items.len()
        )));
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let text = item.as_str().ok_or_else(|| {
                InsightError::invalid_response(format!("insight {} is not a string", index + 1))
            })?;
            match variant {
                InsightVariant::Plain => Ok(Insight::plain(text.trim())),
                InsightVariant::Labeled => {
                    let (polarity, body) = Polarity::split_label(text.trim());
                    Ok(Insight {
                        polarity,
                        text: body.to_string(),
                    })
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled_json() -> String {
        serde_json::json!({
            "insights": [
                "Positive: a", "Negative: b", "Positive: c",
                "Negative: d", "Positive: e", "Negative: f"
            ]
        })
        .to_string()
    }

    #[test]
    fn parses_fenced_labeled_response() {
        let raw = format!("```json\n{}\n```", labeled_json());
        let insights = parse_insights(&raw, InsightVariant::Labeled).expect("valid");
        assert_eq!(insights.len(), 6);
        assert_eq!(insights[0], Insight::positive("a"));
        assert_eq!(insights[5], Insight::negative("f"));
        assert_eq!(insights[1].to_string(), "Negative: b");
    }

    #[test]
    fn wrong_count_is_rejected() {
        let raw = r#"{"insights": ["one", "two"]}"#;
        let err = parse_insights(raw, InsightVariant::Plain).unwrap_err();
        assert!(matches!(err, InsightError::InvalidResponse { ref reason } if reason == "expected 5 insights, got 2"));
    }

    #[test]
    fn non_json_is_rejected() {
        let err = parse_insights("Here are your insights!", InsightVariant::Plain).unwrap_err();
        assert!(matches!(err, InsightError::InvalidResponse { .. }));
    }

    #[test]
    fn shape_violations_are_rejected() {
        for raw in [
            r#"["a","b","c","d","e"]"#,
            r#"{"items": ["a","b","c","d","e"]}"#,
            r#"{"insights": "a,b,c,d,e"}"#,
            r#"{"insights": ["a","b","c","d",5]}"#,
        ] {
            assert!(
                parse_insights(raw, InsightVariant::Plain).is_err(),
                "should reject {raw}"
            );
        }
    }

    #[test]
    fn labeled_polarity_follows_each_prefix() {
        let raw = serde_json::json!({
            "insights": ["Positive:a", "Negative: b", "Positive: c", "Negative: d", "Negative: e", "Positive: f"]
        })
        .to_string();
        let insights = parse_insights(&raw, InsightVariant::Labeled).expect("valid");
        assert_eq!(insights[0], Insight::positive("a"));
        assert_eq!(insights[4], Insight::negative("e"));
        assert_eq!(insights[5], Insight::positive("f"));
    }

    #[test]
    fn labeled_prefix_is_optional_and_case_insensitive() {
        let raw = serde_json::json!({
            "insights": ["positive: cheaper clicks", "NEGATIVE:  fewer views", "no label here", "d", "e", "f"]
        })
        .to_string();
        let insights = parse_insights(&raw, InsightVariant::Labeled).expect("valid");
        assert_eq!(insights[0], Insight::positive("cheaper clicks"));
        assert_eq!(insights[1], Insight::negative("fewer views"));
        assert_eq!(insights[2], Insight::plain("no label here"));
    }

    #[test]
    fn plain_response_keeps_text_verbatim() {
        let raw = r#"{"insights": ["a","b","c","d","Positive: e"]}"#;
        let insights = parse_insights(raw, InsightVariant::Plain).expect("valid");
        assert_eq!(insights[4], Insight::plain("Positive: e"));
    }

    #[test]
    fn prompt_carries_both_summaries_and_count() {
        let own = Dataset::parse("mine.csv", "clicks\n10\n20\n").expect("csv");
        let comp = Dataset::parse("theirs.csv", "clicks\n30\n").expect("csv");
        let prompt = build_prompt(InsightVariant::Labeled, &own, &comp);
        assert!(prompt.contains("Generate exactly 6 insights, 3 positive and 3 negative"));
        assert!(prompt.contains("MY CAMPAIGN DATA:\nCampaign Data Summary:"));
        assert!(prompt.contains("COMPETITORS DATA:\nCompetitors Data Summary:"));
        assert!(prompt.contains("- Total records: 2"));

        let plain = build_prompt(InsightVariant::Plain, &own, &comp);
        assert!(plain.contains("Generate exactly 5 insights."));
        assert!(!plain.contains("Positive: ..."));
    }
}
