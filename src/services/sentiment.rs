//! Lexicon-based sentiment scoring for review text.
//!
//! Stands in for the hosted text-analysis service with the same one-shot
//! contract: polarity in [-1.0, 1.0], computed once when the review is
//! created. The verdict threshold is `score > 0.0`; exactly zero (including
//! empty or neutral text) reads as "Negative".

#[derive(Debug, Clone, PartialEq)]
pub struct Sentiment {
    pub score: f64,
    pub verdict: &'static str,
}

// Word weights roughly follow TextBlob's polarity scale.
const LEXICON: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("bad", -0.7),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("boring", -0.5),
    ("brilliant", 0.9),
    ("disappointing", -0.6),
    ("dull", -0.4),
    ("enjoyed", 0.5),
    ("excellent", 1.0),
    ("fantastic", 0.9),
    ("favorite", 0.6),
    ("fun", 0.3),
    ("good", 0.7),
    ("great", 0.8),
    ("hate", -0.8),
    ("hated", -0.8),
    ("horrible", -1.0),
    ("like", 0.3),
    ("liked", 0.4),
    ("love", 0.5),
    ("loved", 0.7),
    ("masterpiece", 0.9),
    ("mediocre", -0.3),
    ("mess", -0.4),
    ("perfect", 1.0),
    ("poor", -0.4),
    ("terrible", -1.0),
    ("waste", -0.6),
    ("wonderful", 1.0),
    ("worst", -1.0),
];

const NEGATIONS: &[&str] = &["not", "never", "no", "hardly"];

fn word_weight(word: &str) -> Option<f64> {
    LEXICON
        .binary_search_by(|(w, _)| w.cmp(&word))
        .ok()
        .map(|idx| LEXICON[idx].1)
}

/// Polarity of `text` in [-1.0, 1.0]. Text with no sentiment-bearing words
/// (including the empty string) scores exactly 0.0.
pub fn polarity(text: &str) -> f64 {
    let mut total = 0.0;
    let mut matched = 0u32;
    let mut negated = false;

    for raw in text.split_whitespace() {
        let word: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        if word.is_empty() {
            continue;
        }

        if NEGATIONS.contains(&word.as_str()) {
            negated = true;
            continue;
        }

        if let Some(weight) = word_weight(&word) {
            total += if negated { -weight } else { weight };
            matched += 1;
        }
        negated = false;
    }

    if matched == 0 {
        return 0.0;
    }
    (total / f64::from(matched)).clamp(-1.0, 1.0)
}

pub fn verdict(score: f64) -> &'static str {
    if score > 0.0 {
        "Positive"
    } else {
        "Negative"
    }
}

pub fn analyze(text: &str) -> Sentiment {
    let score = polarity(text);
    Sentiment {
        score,
        verdict: verdict(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_is_sorted_for_binary_search() {
        let mut sorted: Vec<&str> = LEXICON.iter().map(|(w, _)| *w).collect();
        sorted.sort_unstable();
        let original: Vec<&str> = LEXICON.iter().map(|(w, _)| *w).collect();
        assert_eq!(original, sorted);
    }

    #[test]
    fn loved_movie_is_positive() {
        let result = analyze("I loved this movie");
        assert!(result.score > 0.0);
        assert_eq!(result.verdict, "Positive");
    }

    #[test]
    fn empty_text_scores_zero_and_reads_negative() {
        let result = analyze("");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.verdict, "Negative");
    }

    #[test]
    fn neutral_text_scores_zero() {
        assert_eq!(polarity("the plot takes place in winter"), 0.0);
    }

    #[test]
    fn terrible_movie_is_negative() {
        let result = analyze("An absolutely terrible, boring waste of time");
        assert!(result.score < 0.0);
        assert_eq!(result.verdict, "Negative");
    }

    #[test]
    fn negation_flips_the_weight() {
        assert!(polarity("not good") < 0.0);
        assert!(polarity("never boring") > 0.0);
    }

    #[test]
    fn punctuation_and_case_are_ignored() {
        assert_eq!(polarity("LOVED it!!!"), polarity("loved it"));
    }

    #[test]
    fn score_stays_in_range() {
        let gushing = "best perfect excellent wonderful awesome";
        let scathing = "worst terrible horrible awful";
        assert!(polarity(gushing) <= 1.0);
        assert!(polarity(scathing) >= -1.0);
    }
}
