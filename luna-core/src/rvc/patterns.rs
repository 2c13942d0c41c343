//! Compiled regex tables for the classifier (design §4.1).

use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("classifier pattern is a fixed, tested literal")
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| compile(p)).collect()
}

/// One scored complexity category: a weight and the patterns that feed it.
pub struct ComplexityCategory {
    /// Weight applied per regex match in this category.
    pub weight: f64,
    /// Compiled patterns for the category.
    pub patterns: Vec<Regex>,
}

/// Patterns whose presence anywhere in the text forces the `Trivial` tier
/// (greetings, short acknowledgments).
pub static TRIVIAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"^(hi|hello|hey|sup|what's up)\b",
        r"^(how are you|how's it going|how do you do)\b",
        r"^(thanks|thank you|thx)\b",
        r"^(ok|okay|alright|sure|yes|no)\b",
        r"^(good|bad|fine|ok|cool)\b",
        r"^(lol|lmao|haha|hehe)\b",
        r"^(bye|goodbye|see you|later)\b",
    ])
});

/// Four complexity categories, each weighted per [`crate::constants::rvc`].
pub static COMPLEXITY_CATEGORIES: LazyLock<Vec<ComplexityCategory>> = LazyLock::new(|| {
    use crate::constants::rvc as c;
    vec![
        ComplexityCategory {
            weight: c::WEIGHT_PHILOSOPHICAL,
            patterns: compile_all(&[
                r"\b(what is the meaning of life|existential|purpose of existence|nature of reality)\b",
                r"\b(intelligence|existence|reality|truth|wisdom)\b",
                r"\b(paradox|contradiction|irony|sophistication)\b",
                r"\b(comprehensive analysis|philosophical implications|deep understanding)\b",
            ]),
        },
        ComplexityCategory {
            weight: c::WEIGHT_ANALYTICAL,
            patterns: compile_all(&[
                r"\b(explain|how does|how do|what is|what are|can you explain|can you describe)\b",
                r"\b(analyze|examine|evaluate|assess|compare|contrast)\b",
                r"\b(cause|effect|consequence|result|outcome)\b",
                r"\b(pattern|trend|correlation|relationship)\b",
                r"\b(hypothesis|theory|concept|framework)\b",
            ]),
        },
        ComplexityCategory {
            weight: c::WEIGHT_EMOTIONAL,
            patterns: compile_all(&[
                r"\b(feel|emotion|mood|state|experience)\b",
                r"\b(love|hate|fear|joy|sadness|anger|anxiety)\b",
                r"\b(relationship|connection|bond|attachment)\b",
                r"\b(support|help|comfort|understanding)\b",
            ]),
        },
        ComplexityCategory {
            weight: c::WEIGHT_TECHNICAL,
            patterns: compile_all(&[
                r"\b(how to|tutorial|guide|instruction|process)\b",
                r"\b(technical|scientific|mathematical|logical)\b",
                r"\b(algorithm|method|technique|approach)\b",
                r"\b(implementation|execution|performance)\b",
            ]),
        },
    ]
});

/// Domain keyword groups that can force the complexity floor past
/// [`crate::constants::rvc::DOMAIN_BLEND_THRESHOLD`].
pub static HIGH_COMPLEXITY_DOMAINS: LazyLock<Vec<(&'static str, Vec<&'static str>)>> =
    LazyLock::new(|| {
        vec![
            (
                "physics",
                vec![
                    "quantum mechanics",
                    "relativity theory",
                    "thermodynamics",
                    "electromagnetism",
                    "particle physics",
                ],
            ),
            (
                "philosophy",
                vec![
                    "meaning of life",
                    "nature of intelligence",
                    "existential reality",
                    "fundamental truth",
                    "free will",
                ],
            ),
            (
                "mathematics",
                vec![
                    "calculus",
                    "advanced algebra",
                    "complex equation",
                    "mathematical proof",
                    "theoretical formula",
                ],
            ),
            (
                "computer_science",
                vec![
                    "machine learning",
                    "neural network",
                    "artificial intelligence",
                    "programming",
                    "algorithm",
                    "data",
                ],
            ),
            (
                "biology",
                vec![
                    "evolutionary biology",
                    "molecular genetics",
                    "cellular biology",
                    "organism development",
                ],
            ),
            (
                "chemistry",
                vec![
                    "molecular compound",
                    "chemical reaction",
                    "organic synthesis",
                    "catalyst",
                ],
            ),
        ]
    });

/// High/medium/low emotional-stakes pattern groups and their per-match weight.
pub static EMOTIONAL_STAKES_PATTERNS: LazyLock<[(f64, Vec<Regex>); 3]> = LazyLock::new(|| {
    [
        (
            0.4,
            compile_all(&[
                r"\b(crisis|emergency|urgent|critical|serious)\b",
                r"\b(problem|issue|challenge|difficulty|struggle)\b",
                r"\b(help|support|advice|guidance|assistance)\b",
                r"\b(personal|private|confidential|sensitive)\b",
                r"\b(important|significant|meaningful|valuable)\b",
                r"\b(anxiety|overwhelmed|drowning|hard time|disappear)\b",
                r"\b(crawl under|blanket|feel like|can't|don't know)\b",
                r"\b(relationship|family|work|health|mental|emotional)\b",
                r"\b(trauma|ptsd|depression|panic|fear|worry)\b",
            ]),
        ),
        (
            0.15,
            compile_all(&[
                r"\b(question|ask|wonder|curious|think|opinion)\b",
                r"\b(like|dislike|prefer|enjoy|hate|love)\b",
                r"\b(experience|feeling|emotion|mood|state)\b",
            ]),
        ),
        (
            -0.1,
            compile_all(&[
                r"\b(casual|informal|just|simply|basic)\b",
                r"\b(quick|brief|short|simple|easy)\b",
                r"\b(chat|talk|conversation|discussion)\b",
                r"\b(hello|hi|hey|thanks|okay|sure)\b",
            ]),
        ),
    ]
});

/// Personal pronouns; each match adds a small amount of emotional stakes.
pub static PERSONAL_PRONOUNS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(i|me|my|myself|you|your|yourself)\b"));

/// Stopwords excluded when computing semantic density.
pub const COMMON_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "can", "this", "that", "these", "those",
];
