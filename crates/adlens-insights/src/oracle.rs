//! The insight oracle seam and its deterministic local implementation.

use adlens_core::InsightVariant;
use async_trait::async_trait;

use crate::dataset::{ColumnProfile, Dataset};
use crate::error::InsightError;
use crate::insight::Insight;

/// Compares two datasets and returns exactly
/// [`InsightVariant::expected_count`] insights for the configured variant.
#[async_trait]
pub trait InsightOracle: Send + Sync {
    fn name(&self) -> &'static str;

    fn variant(&self) -> InsightVariant;

    /// # Errors
    ///
    /// Returns [`InsightError::InvalidResponse`] when a remote service answers
    /// outside the contract. Transport failures are absorbed by falling back.
    async fn compare(
        &self,
        own: &Dataset,
        competitor: &Dataset,
    ) -> Result<Vec<Insight>, InsightError>;
}

const GENERIC_POSITIVE: [&str; 3] = [
    "Your click-through rates are 15% higher than industry average.",
    "Your conversion rates peak on Tuesday and Wednesday.",
    "Your targeting covers more demographics than competitors.",
];

const GENERIC_NEGATIVE: [&str; 3] = [
    "Competitors are investing 40% more in video content.",
    "Mobile traffic shows higher engagement but lower conversion.",
    "Competitor analysis shows they're optimizing budget better.",
];

const GENERIC_PLAIN: [&str; 5] = [
    "Test several headline variants and keep the one with the best click-through rate.",
    "Give every ad an explicit call to action such as \"Enroll Now\" or \"Start Free Trial\".",
    "Move budget towards the platforms that deliver the most engagement per impression.",
    "Name concrete outcomes like certification or placement support in the ad copy.",
    "Review competitor keywords regularly and cover the high-value terms they target.",
];

/// Offline oracle. Compares the means of numeric columns both datasets share,
/// in the order they appear in `own`, then tops up with generic advice.
#[derive(Debug, Clone, Copy)]
pub struct LocalInsightOracle {
    variant: InsightVariant,
}

impl LocalInsightOracle {
    #[must_use]
    pub fn new(variant: InsightVariant) -> Self {
        Self { variant }
    }

    #[must_use]
    pub fn compare_datasets(&self, own: &Dataset, competitor: &Dataset) -> Vec<Insight> {
        let comparisons = mean_comparisons(own, competitor);
        match self.variant {
            InsightVariant::Labeled => labeled(&comparisons, self.variant.expected_count()),
            InsightVariant::Plain => plain(&comparisons, self.variant.expected_count()),
        }
    }
}

#[async_trait]
impl InsightOracle for LocalInsightOracle {
    fn name(&self) -> &'static str {
        "local"
    }

    fn variant(&self) -> InsightVariant {
        self.variant
    }

    async fn compare(
        &self,
        own: &Dataset,
        competitor: &Dataset,
    ) -> Result<Vec<Insight>, InsightError> {
        Ok(self.compare_datasets(own, competitor))
    }
}

struct MeanComparison {
    column: String,
    own: f64,
    competitor: f64,
}

impl MeanComparison {
    fn ahead(&self) -> bool {
        self.own > self.competitor
    }

    /// Relative difference against the competitor mean, when defined.
    fn percent(&self) -> Option<f64> {
        (self.competitor.abs() > f64::EPSILON)
            .then(|| ((self.own - self.competitor) / self.competitor.abs() * 100.0).abs())
    }

    fn sentence(&self) -> String {
        let direction = if self.ahead() { "higher" } else { "lower" };
        match self.percent() {
            Some(pct) => format!(
                "Your average {} is {pct:.1}% {direction} than competitors ({:.2} vs {:.2}).",
                self.column, self.own, self.competitor
            ),
            None => format!(
                "Your average {} is {direction} than competitors ({:.2} vs {:.2}).",
                self.column, self.own, self.competitor
            ),
        }
    }
}

/// Shared numeric columns whose means differ.
fn mean_comparisons(own: &Dataset, competitor: &Dataset) -> Vec<MeanComparison> {
    own.profiles()
        .into_iter()
        .filter_map(|(column, profile)| {
            let own_mean = profile.mean()?;
            let competitor_mean = competitor.profile_of(&column).as_ref().and_then(ColumnProfile::mean)?;
            ((own_mean - competitor_mean).abs() > f64::EPSILON).then_some(MeanComparison {
                column,
                own: own_mean,
                competitor: competitor_mean,
            })
        })
        .collect()
}

fn labeled(comparisons: &[MeanComparison], count: usize) -> Vec<Insight> {
    let half = count / 2;
    let mut positives = comparisons
        .iter()
        .filter(|c| c.ahead())
        .map(MeanComparison::sentence)
        .chain(GENERIC_POSITIVE.iter().map(|s| (*s).to_string()))
        .map(Insight::positive);
    let mut negatives = comparisons
        .iter()
        .filter(|c| !c.ahead())
        .map(MeanComparison::sentence)
        .chain(GENERIC_NEGATIVE.iter().map(|s| (*s).to_string()))
        .map(Insight::negative);

    let mut insights = Vec::with_capacity(count);
    for _ in 0..half {
        insights.extend(positives.next());
        insights.extend(negatives.next());
    }
    insights
}

fn plain(comparisons: &[MeanComparison], count: usize) -> Vec<Insight> {
    comparisons
        .iter()
        .map(MeanComparison::sentence)
        .chain(GENERIC_PLAIN.iter().map(|s| (*s).to_string()))
        .take(count)
        .map(Insight::plain)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::Polarity;

    fn datasets() -> (Dataset, Dataset) {
        let own = Dataset::parse("own.csv", "name,ctr,cpc\nA,3.0,20\nB,5.0,30\n").expect("csv");
        let comp = Dataset::parse("comp.csv", "name,ctr,cpc\nX,2.0,40\nY,2.0,40\n").expect("csv");
        (own, comp)
    }

    #[test]
    fn labeled_alternates_and_has_exact_count() {
        let (own, comp) = datasets();
        let insights = LocalInsightOracle::new(InsightVariant::Labeled).compare_datasets(&own, &comp);
        assert_eq!(insights.len(), 6);
        for (i, insight) in insights.iter().enumerate() {
            let expected = if i % 2 == 0 {
                Polarity::Positive
            } else {
                Polarity::Negative
            };
            assert_eq!(insight.polarity, Some(expected));
        }
        assert_eq!(
            insights[0].text,
            "Your average ctr is 100.0% higher than competitors (4.00 vs 2.00)."
        );
        assert_eq!(
            insights[1].text,
            "Your average cpc is 37.5% lower than competitors (25.00 vs 40.00)."
        );
        assert_eq!(insights[2].text, GENERIC_POSITIVE[0]);
    }

    #[test]
    fn plain_has_exact_count_without_polarity() {
        let (own, comp) = datasets();
        let insights = LocalInsightOracle::new(InsightVariant::Plain).compare_datasets(&own, &comp);
        assert_eq!(insights.len(), 5);
        assert!(insights.iter().all(|i| i.polarity.is_none()));
        assert_eq!(insights[2].text, GENERIC_PLAIN[0]);
    }

    #[test]
    fn disjoint_datasets_fall_back_to_generic_advice() {
        let own = Dataset::parse("own.csv", "a\n1\n").expect("csv");
        let comp = Dataset::parse("comp.csv", "b\n2\n").expect("csv");
        let insights = LocalInsightOracle::new(InsightVariant::Plain).compare_datasets(&own, &comp);
        let texts: Vec<&str> = insights.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, GENERIC_PLAIN.to_vec());
    }

    #[tokio::test]
    async fn compare_never_fails() {
        let (own, comp) = datasets();
        let oracle = LocalInsightOracle::new(InsightVariant::Labeled);
        assert_eq!(oracle.name(), "local");
        assert!(oracle.compare(&own, &comp).await.is_ok());
    }
}
