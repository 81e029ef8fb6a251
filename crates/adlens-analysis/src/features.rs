//! Stateless text feature extractors.
//!
//! Every function takes the lower-cased analysis text (`title + " " +
//! description`) and the injected [`ScoringTables`]. None of them fail: empty
//! text yields the documented defaults.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::LazyLock;

use adlens_core::{
    Audience, CtaStrength, EmotionalTrigger, Positioning, ReadingLevel, Tone, UrgencyLevel,
};
use regex::Regex;

use crate::lexicon::{CategoryRule, ScoringTables};

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]+\b").expect("valid word regex"));

pub const ENGAGEMENT_CEILING: f64 = 10.0;
pub const MAX_PRIMARY_KEYWORDS: usize = 5;
pub const MAX_MISSING_KEYWORDS: usize = 5;
pub const MAX_SELLING_POINTS: usize = 5;
const EXTRACTED_KEYWORDS: usize = 10;

/// Additive bag-of-words engagement score in `[1.0, 10.0]`, unrounded.
#[must_use]
pub fn engagement_score(text: &str, tables: &ScoringTables) -> f64 {
    let mut score = 1.0;
    for token in text.split_whitespace() {
        if let Some(weight) = tables.weight_of(token) {
            score += weight;
        }
    }
    if text.chars().any(|c| c.is_ascii_digit()) {
        score += 1.0;
    }
    if text.contains('?') {
        score += 0.5;
    }
    score.min(ENGAGEMENT_CEILING)
}

/// Trigger categories whose phrase list matches, in table order.
#[must_use]
pub fn emotional_triggers(text: &str, tables: &ScoringTables) -> Vec<EmotionalTrigger> {
    let mut found = Vec::new();
    for rule in &tables.emotional_triggers {
        if rule.matches(text) && !found.contains(&rule.category) {
            found.push(rule.category);
        }
    }
    found
}

/// First matching CTA tier wins.
#[must_use]
pub fn cta_strength(text: &str, tables: &ScoringTables) -> CtaStrength {
    first_tier(text, &tables.cta_tiers).unwrap_or(CtaStrength::Absent)
}

#[must_use]
pub fn urgency_level(text: &str, tables: &ScoringTables) -> UrgencyLevel {
    first_tier(text, &tables.urgency_tiers).unwrap_or(UrgencyLevel::Low)
}

fn first_tier<C: Copy>(text: &str, tiers: &[CategoryRule<C>]) -> Option<C> {
    tiers
        .iter()
        .find(|tier| tier.matches(text))
        .map(|tier| tier.category)
}

/// Alphabetic words minus stop words and words of two letters or fewer, the
/// ten most frequent first.
#[must_use]
pub fn extract_keywords(text: &str, tables: &ScoringTables) -> Vec<String> {
    let words = WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.len() > 2 && !tables.is_stop_word(w));
    most_common(words, EXTRACTED_KEYWORDS)
        .into_iter()
        .map(|(word, _)| word)
        .collect()
}

/// High-value phrases absent from the text, compared with spaces removed.
#[must_use]
pub fn missing_keywords(text: &str, tables: &ScoringTables) -> Vec<String> {
    let compact: String = text.chars().filter(|c| *c != ' ').collect();
    tables
        .high_value_keywords
        .iter()
        .filter(|kw| {
            let needle: String = kw.chars().filter(|c| *c != ' ').collect();
            !compact.contains(&needle)
        })
        .take(MAX_MISSING_KEYWORDS)
        .cloned()
        .collect()
}

#[must_use]
pub fn positioning(text: &str, tables: &ScoringTables) -> Positioning {
    let hits = |phrases: &[String]| phrases.iter().filter(|p| text.contains(p.as_str())).count();
    let premium = hits(&tables.positioning.premium);
    let budget = hits(&tables.positioning.budget);
    match premium.cmp(&budget) {
        std::cmp::Ordering::Greater => Positioning::Premium,
        std::cmp::Ordering::Less => Positioning::Budget,
        std::cmp::Ordering::Equal => Positioning::Mainstream,
    }
}

#[must_use]
pub fn target_audience(text: &str, tables: &ScoringTables) -> Audience {
    best_category(text, &tables.audiences).unwrap_or(Audience::General)
}

#[must_use]
pub fn tone(text: &str, tables: &ScoringTables) -> Tone {
    best_category(text, &tables.tones).unwrap_or(Tone::Neutral)
}

/// Category with the most phrase hits; the earlier rule wins a tie. `None`
/// when nothing matches.
fn best_category<C: Copy>(text: &str, rules: &[CategoryRule<C>]) -> Option<C> {
    let mut best: Option<(C, usize)> = None;
    for rule in rules {
        let hits = rule.hits(text);
        if hits > best.map_or(0, |(_, n)| n) {
            best = Some((rule.category, hits));
        }
    }
    best.map(|(category, _)| category)
}

/// Names of every advantage with at least one matching phrase.
#[must_use]
pub fn competitive_advantages(text: &str, tables: &ScoringTables) -> Vec<String> {
    tables
        .advantages
        .iter()
        .filter(|rule| rule.matches(text))
        .map(|rule| rule.category.clone())
        .collect()
}

/// Regex matches in pattern order. Capture groups of one match are joined
/// with a space.
#[must_use]
pub fn selling_points(text: &str, patterns: &[Regex]) -> Vec<String> {
    let mut points = Vec::new();
    for re in patterns {
        for caps in re.captures_iter(text) {
            let point = if caps.len() > 1 {
                caps.iter()
                    .skip(1)
                    .map(|g| g.map_or("", |m| m.as_str()))
                    .collect::<Vec<_>>()
                    .join(" ")
            } else {
                caps[0].to_string()
            };
            points.push(point);
            if points.len() == MAX_SELLING_POINTS {
                return points;
            }
        }
    }
    points
}

/// Share of whitespace tokens that are education keywords, as a percentage
/// rounded to one place.
#[must_use]
pub fn keyword_density(text: &str, tables: &ScoringTables) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let hits = words
        .iter()
        .filter(|w| tables.education_keywords.iter().any(|k| k == *w))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let density = hits as f64 / words.len() as f64 * 100.0;
    round_to(density, 1)
}

#[must_use]
pub fn reading_level(text: &str) -> ReadingLevel {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return ReadingLevel::Easy;
    }
    let letters: usize = words.iter().map(|w| w.chars().count()).sum();
    #[allow(clippy::cast_precision_loss)]
    let avg = letters as f64 / words.len() as f64;
    if avg < 4.5 {
        ReadingLevel::Easy
    } else if avg < 6.0 {
        ReadingLevel::Medium
    } else {
        ReadingLevel::Difficult
    }
}

/// The `n` most frequent items, highest count first. Equal counts keep the
/// order in which items were first seen.
pub fn most_common<T, I>(items: I, n: usize) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        if let Some(&slot) = index.get(&item) {
            counts[slot].1 += 1;
        } else {
            index.insert(item.clone(), counts.len());
            counts.push((item, 1));
        }
    }
    // stable sort keeps first-seen order within equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// Round half away from zero to `places` decimal places.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}
