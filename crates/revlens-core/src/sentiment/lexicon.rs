//! Lexicon/rule-based sentiment analyzer.
//!
//! Scores free text against an embedded word-valence table with a small set
//! of contextual rules: negation scoping, intensity boosters, contrastive
//! `but` re-weighting, ALL-CAPS emphasis and exclamation emphasis. The raw
//! valence sum is squashed into a compound polarity in [-1.0, 1.0].
//!
//! Scoring is a pure function of the input text and the embedded tables:
//! identical text always yields an identical polarity.

use std::collections::HashMap;

/// Compound normalization constant: `s / sqrt(s^2 + ALPHA)`.
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Valence added for an ALL-CAPS word in mixed-case text.
const CAPS_INCR: f64 = 0.733;

/// Multiplier applied to a valence inside a negation window.
const NEGATION_SCALAR: f64 = -0.74;

/// How many preceding tokens a negation or booster can reach over.
const CONTEXT_WINDOW: usize = 3;

/// Booster influence dampening by distance from the scored word.
const BOOST_DAMPING: [f64; CONTEXT_WINDOW] = [1.0, 0.95, 0.9];

/// Valence added per trailing exclamation mark (capped).
const EXCLAIM_INCR: f64 = 0.292;
const MAX_EXCLAIM: usize = 4;

/// Contrastive re-weighting around "but": the clause before is dampened,
/// the clause after amplified.
const BUT_DAMPEN: f64 = 0.5;
const BUT_AMPLIFY: f64 = 1.5;

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "neither", "nor", "cannot", "cant", "can't", "dont", "don't",
    "didnt", "didn't", "doesnt", "doesn't", "isnt", "isn't", "wasnt", "wasn't", "wont", "won't",
    "wouldnt", "wouldn't", "couldnt", "couldn't", "shouldnt", "shouldn't", "aint", "ain't",
    "hardly", "without", "lacks", "lacking",
];

/// Intensity boosters: positive entries amplify, negative entries dampen.
const BOOSTERS: &[(&str, f64)] = &[
    ("very", 0.293),
    ("really", 0.293),
    ("extremely", 0.293),
    ("incredibly", 0.293),
    ("totally", 0.293),
    ("completely", 0.293),
    ("absolutely", 0.293),
    ("so", 0.293),
    ("super", 0.293),
    ("highly", 0.293),
    ("remarkably", 0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
    ("barely", -0.293),
    ("marginally", -0.293),
    ("mildly", -0.293),
];

/// Word-valence table on a roughly -4..+4 scale, tuned for product review
/// vocabulary.
const LEXICON: &[(&str, f64)] = &[
    // Positive
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("great", 3.1),
    ("good", 1.9),
    ("love", 3.2),
    ("loved", 2.9),
    ("loves", 2.7),
    ("like", 1.5),
    ("liked", 1.6),
    ("perfect", 2.7),
    ("perfectly", 2.6),
    ("best", 3.2),
    ("better", 1.9),
    ("nice", 1.8),
    ("happy", 2.7),
    ("pleased", 1.9),
    ("satisfied", 1.7),
    ("recommend", 1.6),
    ("recommended", 1.6),
    ("works", 1.1),
    ("working", 0.9),
    ("well", 1.1),
    ("solid", 1.5),
    ("sturdy", 1.4),
    ("durable", 1.5),
    ("reliable", 1.9),
    ("quality", 1.6),
    ("value", 1.3),
    ("worth", 1.7),
    ("bargain", 1.9),
    ("easy", 1.9),
    ("quick", 1.1),
    ("fast", 1.3),
    ("helpful", 1.7),
    ("friendly", 1.9),
    ("smooth", 1.3),
    ("comfortable", 1.5),
    ("beautiful", 2.6),
    ("gorgeous", 2.6),
    ("impressed", 2.0),
    ("impressive", 2.1),
    ("exceeded", 1.6),
    ("superb", 2.9),
    ("wonderful", 2.7),
    ("delighted", 2.8),
    ("glad", 2.0),
    ("fine", 0.8),
    ("okay", 0.9),
    ("ok", 0.9),
    ("decent", 1.2),
    ("thanks", 1.9),
    ("thank", 1.5),
    ("win", 2.2),
    ("winner", 2.4),
    ("favorite", 2.0),
    ("enjoy", 1.9),
    ("enjoyed", 2.0),
    ("crisp", 1.2),
    ("bright", 1.3),
    ("accurate", 1.4),
    ("genuine", 1.3),
    ("authentic", 1.3),
    ("responsive", 1.3),
    ("seamless", 1.5),
    ("flawless", 2.5),
    ("premium", 1.4),
    ("powerful", 1.7),
    ("efficient", 1.5),
    ("generous", 1.8),
    ("secure", 1.3),
    ("safe", 1.4),
    ("useful", 1.6),
    ("handy", 1.4),
    ("pleasant", 1.9),
    ("superior", 1.9),
    ("outstanding", 2.8),
    ("incredible", 2.6),
    ("stellar", 2.4),
    // Negative
    ("bad", -2.5),
    ("terrible", -2.9),
    ("horrible", -2.9),
    ("awful", -2.7),
    ("worst", -3.1),
    ("worse", -2.1),
    ("poor", -2.1),
    ("poorly", -2.0),
    ("hate", -2.7),
    ("hated", -2.6),
    ("broke", -1.9),
    ("broken", -2.2),
    ("defective", -2.4),
    ("faulty", -2.2),
    ("flimsy", -1.8),
    ("fragile", -1.2),
    ("useless", -2.3),
    ("waste", -2.1),
    ("wasted", -2.2),
    ("disappointing", -2.1),
    ("disappointed", -2.2),
    ("disappointment", -2.3),
    ("refund", -1.2),
    ("returned", -1.1),
    ("returning", -1.1),
    ("scam", -2.9),
    ("fraud", -2.9),
    ("fake", -2.0),
    ("misleading", -1.9),
    ("overpriced", -1.9),
    ("expensive", -0.9),
    ("damaged", -2.2),
    ("dented", -1.4),
    ("scratched", -1.2),
    ("leaked", -1.6),
    ("leaking", -1.6),
    ("stopped", -1.1),
    ("died", -1.9),
    ("dead", -1.8),
    ("slow", -1.2),
    ("laggy", -1.5),
    ("noisy", -1.3),
    ("uncomfortable", -1.6),
    ("difficult", -1.5),
    ("confusing", -1.4),
    ("complicated", -1.1),
    ("frustrating", -2.0),
    ("frustrated", -1.9),
    ("annoying", -1.8),
    ("annoyed", -1.7),
    ("angry", -2.3),
    ("upset", -1.8),
    ("sad", -2.1),
    ("regret", -1.9),
    ("avoid", -1.3),
    ("beware", -1.7),
    ("problem", -1.4),
    ("problems", -1.5),
    ("issue", -1.1),
    ("issues", -1.2),
    ("error", -1.5),
    ("errors", -1.6),
    ("fail", -2.1),
    ("failed", -2.0),
    ("fails", -2.0),
    ("failure", -2.2),
    ("flaw", -1.6),
    ("flawed", -1.8),
    ("hype", -0.6),
    ("gimmick", -1.6),
    ("junk", -2.3),
    ("garbage", -2.5),
    ("trash", -2.3),
    ("mediocre", -1.2),
    ("meh", -1.0),
    ("bland", -0.9),
    ("boring", -1.3),
    ("smelly", -1.6),
    ("sticky", -0.8),
    ("stuck", -1.2),
    ("crashed", -1.9),
    ("crashes", -1.9),
    ("crash", -1.7),
    ("bug", -1.3),
    ("buggy", -1.8),
    ("glitch", -1.4),
    ("glitchy", -1.7),
    ("missing", -1.4),
    ("incomplete", -1.4),
    ("late", -1.1),
    ("delayed", -1.2),
    ("lost", -1.6),
    ("wrong", -1.6),
    ("incorrect", -1.5),
    ("unusable", -2.4),
    ("unreliable", -2.0),
    ("unacceptable", -2.4),
    ("rip-off", -2.6),
];

/// Result of scoring one text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextScore {
    /// Compound polarity in [-1.0, 1.0].
    pub compound: f64,
    /// Lexicon terms that matched, in text order.
    pub hits: Vec<String>,
}

/// Lexicon analyzer with the embedded tables loaded into lookup maps.
#[derive(Debug)]
pub struct LexiconAnalyzer {
    lexicon: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
}

struct Token {
    lower: String,
    is_caps: bool,
}

impl LexiconAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            boosters: BOOSTERS.iter().copied().collect(),
        }
    }

    /// Score a text, producing a compound polarity and the matched terms.
    ///
    /// Empty or whitespace-only input scores 0.0 with no hits.
    #[must_use]
    pub fn score(&self, text: &str) -> TextScore {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return TextScore {
                compound: 0.0,
                hits: Vec::new(),
            };
        }

        // Caps emphasis only applies when the text mixes cases; a fully
        // shouted review carries no per-word signal.
        let mixed_case = tokens.iter().any(|t| !t.is_caps);
        let but_index = tokens.iter().position(|t| t.lower == "but");

        let mut sum = 0.0;
        let mut hits = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = self.lexicon.get(token.lower.as_str()) else {
                continue;
            };
            let mut v = valence;

            if token.is_caps && mixed_case {
                v += CAPS_INCR * v.signum();
            }

            let window_start = i.saturating_sub(CONTEXT_WINDOW);
            for (distance, prev) in tokens[window_start..i].iter().rev().enumerate() {
                if let Some(&boost) = self.boosters.get(prev.lower.as_str()) {
                    let aligned = if v < 0.0 { -boost } else { boost };
                    v += aligned * BOOST_DAMPING[distance];
                }
            }

            if tokens[window_start..i]
                .iter()
                .any(|prev| NEGATIONS.contains(&prev.lower.as_str()))
            {
                v *= NEGATION_SCALAR;
            }

            if let Some(bi) = but_index {
                if i < bi {
                    v *= BUT_DAMPEN;
                } else if i > bi {
                    v *= BUT_AMPLIFY;
                }
            }

            sum += v;
            hits.push(token.lower.clone());
        }

        if sum != 0.0 {
            let exclaims = text.matches('!').count().min(MAX_EXCLAIM);
            #[allow(clippy::cast_precision_loss)]
            let emphasis = exclaims as f64 * EXCLAIM_INCR;
            sum += emphasis * sum.signum();
        }

        TextScore {
            compound: normalize(sum),
            hits,
        }
    }
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace()
        .filter_map(|raw| {
            let trimmed =
                raw.trim_matches(|c: char| !(c.is_ascii_alphanumeric() || c == '\'' || c == '-'));
            if trimmed.is_empty() {
                return None;
            }
            let alpha_count = trimmed.chars().filter(char::is_ascii_alphabetic).count();
            let is_caps = alpha_count >= 2 && !trimmed.chars().any(|c| c.is_ascii_lowercase());
            Some(Token {
                lower: trimmed.to_ascii_lowercase(),
                is_caps,
            })
        })
        .collect()
}

fn normalize(score: f64) -> f64 {
    if score == 0.0 {
        return 0.0;
    }
    (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound(text: &str) -> f64 {
        LexiconAnalyzer::new().score(text).compound
    }

    #[test]
    fn test_empty_text_scores_zero() {
        assert_eq!(compound(""), 0.0);
        assert_eq!(compound("   "), 0.0);
        assert_eq!(compound("the of and"), 0.0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let analyzer = LexiconAnalyzer::new();
        let text = "Really great product, works perfectly!";
        let a = analyzer.score(text);
        let b = analyzer.score(text);
        assert_eq!(a.compound.to_bits(), b.compound.to_bits());
        assert_eq!(a.hits, b.hits);
    }

    #[test]
    fn test_positive_and_negative_texts() {
        assert!(compound("Exceeded my expectations.") > 0.05);
        assert!(compound("Absolutely love it, excellent quality.") > 0.5);
        assert!(compound("Not worth the hype.") < -0.05);
        assert!(compound("Terrible, broke after a week.") < -0.5);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let plain = compound("This works well.");
        let negated = compound("This does not work well.");
        assert!(plain > 0.0);
        assert!(negated < 0.0);
    }

    #[test]
    fn test_negation_window_is_bounded() {
        // The negation is too far from the scored word to apply.
        let distant = compound("Not that it matters much, still great.");
        assert!(distant > 0.0);
    }

    #[test]
    fn test_booster_amplifies() {
        let base = compound("This is good.");
        let boosted = compound("This is really good.");
        let dampened = compound("This is slightly good.");
        assert!(boosted > base);
        assert!(dampened < base);
        assert!(dampened > 0.0);
    }

    #[test]
    fn test_exclamation_emphasis() {
        let calm = compound("This is great");
        let excited = compound("This is great!!!");
        assert!(excited > calm);
    }

    #[test]
    fn test_caps_emphasis_in_mixed_case() {
        let plain = compound("This product is great.");
        let shouted = compound("This product is GREAT.");
        assert!(shouted > plain);
    }

    #[test]
    fn test_but_clause_outweighs_lead_in() {
        // The post-"but" clause dominates even though the lead-in is
        // strongly negative.
        let contrast = compound("Packaging was damaged but product is excellent.");
        let no_contrast = compound("Packaging was damaged and product is excellent.");
        assert!(contrast > no_contrast);
    }

    #[test]
    fn test_compound_stays_in_range() {
        let very_positive =
            compound("Amazing awesome excellent fantastic great love perfect best!!!!");
        let very_negative =
            compound("Terrible horrible awful worst hate broken defective useless garbage");
        assert!(very_positive <= 1.0);
        assert!(very_negative >= -1.0);
        assert!(very_positive > 0.9);
        assert!(very_negative < -0.9);
    }

    #[test]
    fn test_hits_are_in_text_order() {
        let score = LexiconAnalyzer::new().score("Great value, bad support.");
        assert_eq!(score.hits, vec!["great", "value", "bad"]);
    }
}
