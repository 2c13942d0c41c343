//! Rule tables as data (design §9). Tier bands, token bounds, economy
//! constants, and the free-word list live here as plain data rather than
//! scattered through the components that consume them, following the
//! teacher's `constants.rs` convention.

/// Response Value Classifier tuning (design §4.1).
pub mod rvc {
    use crate::types::enums::Tier;

    /// Weight applied to philosophical-pattern hits in the complexity score.
    pub const WEIGHT_PHILOSOPHICAL: f64 = 0.4;
    /// Weight applied to analytical-pattern hits.
    pub const WEIGHT_ANALYTICAL: f64 = 0.3;
    /// Weight applied to technical-pattern hits.
    pub const WEIGHT_TECHNICAL: f64 = 0.25;
    /// Weight applied to emotional-pattern hits.
    pub const WEIGHT_EMOTIONAL: f64 = 0.2;

    /// Combination weights: `S = W_COMPLEXITY*complexity + W_STAKES*stakes + W_DENSITY*density`.
    pub const W_COMPLEXITY: f64 = 0.5;
    /// See [`W_COMPLEXITY`].
    pub const W_STAKES: f64 = 0.3;
    /// See [`W_COMPLEXITY`].
    pub const W_DENSITY: f64 = 0.2;

    /// Forced complexity score for trivial-pattern inputs.
    pub const TRIVIAL_COMPLEXITY: f64 = 0.005;
    /// Forced semantic density for trivial-pattern inputs.
    pub const TRIVIAL_DENSITY: f64 = 0.01;

    /// Domain-keyword floor threshold: once `domain_complexity > 0.8`, blend
    /// the floor with 10% of the raw accumulated score.
    pub const DOMAIN_BLEND_THRESHOLD: f64 = 0.8;
    /// Weight of the raw score when blending past the domain floor.
    pub const DOMAIN_BLEND_RAW_WEIGHT: f64 = 0.1;
    /// Base domain floor once any domain keyword matches.
    pub const DOMAIN_FLOOR_BASE: f64 = 0.6;
    /// Additional floor per domain-keyword match.
    pub const DOMAIN_FLOOR_PER_MATCH: f64 = 0.1;

    /// Tier band upper bounds (exclusive), in ascending order. `MAXIMUM` has
    /// no upper bound.
    pub const TIER_BAND_UPPER_BOUNDS: [(f64, Tier); 5] = [
        (0.12, Tier::Trivial),
        (0.25, Tier::Low),
        (0.35, Tier::Moderate),
        (0.55, Tier::High),
        (0.75, Tier::Critical),
    ];

    /// Token bounds `(target, max)` by tier.
    pub fn token_bounds(tier: Tier) -> (u32, u32) {
        match tier {
            Tier::Trivial => (8, 15),
            Tier::Low => (20, 35),
            Tier::Moderate => (50, 80),
            Tier::High => (100, 200),
            Tier::Critical => (200, 400),
            Tier::Maximum => (500, 1000),
        }
    }

    /// Efficiency requirement by tier.
    pub fn efficiency_requirement(tier: Tier) -> f64 {
        match tier {
            Tier::Trivial => 0.6,
            Tier::Low => 0.15,
            Tier::Moderate => 0.25,
            Tier::High => 0.14,
            Tier::Critical => 0.15,
            Tier::Maximum => 0.10,
        }
    }
}

/// Existential Budget / Token Economy tuning (design §4.2). Values marked
/// "tuned" are the ones resolved by the Open Questions in design §9.
pub mod economy {
    /// Starting token pool at age 1.
    pub const BASE_TOKEN_POOL: i64 = 64_000;
    /// Multiplier applied to `max_token_pool` on age-up.
    pub const TOKEN_POOL_GROWTH_RATE: f64 = 2.0;
    /// Pool floor below which only high-value questions are answered.
    pub const EMERGENCY_TOKEN_RESERVE: i64 = 1000;
    /// Tuned value (was 0.9 in the undistilled source).
    pub const LEARNED_EFFICIENCY_THRESHOLD: f64 = 0.5;
    /// Tuned value (was 4.0 in the undistilled source).
    pub const EFFICIENCY_REWARD_MULTIPLIER: f64 = 2.0;
    /// Tuned value (was 3.0 in the undistilled source).
    pub const VERBOSITY_PENALTY_FACTOR: f64 = 1.0;
    /// Mechanism is implemented; default flag stays off per design §9.
    pub const AGE_REGRESSION_ENABLED_DEFAULT: bool = false;
    /// Karma floor that forces a regression check.
    pub const NEGATIVE_KARMA_REGRESSION_THRESHOLD: f64 = -10.0;
    /// Multiplier applied to `karma_quota` on regression.
    pub const REGRESSION_PENALTY_MULTIPLIER: f64 = 1.1;
    /// Minimum seconds between regressions.
    pub const REGRESSION_COOLDOWN_SECS: u64 = 3600;
    /// Starting karma quota at age 1.
    pub const BASE_KARMA_QUOTA: f64 = 100.0;
    /// Multiplier applied to `karma_quota` on age-up.
    pub const KARMA_QUOTA_GROWTH_RATE: f64 = 1.3;
    /// Fraction of `survival_threshold` used in the last-5 regression check.
    pub const SURVIVAL_KARMA_REGRESSION_FRACTION: f64 = 0.3;
    /// Base for the age-scaled efficiency requirement: `growth^(age-1)`.
    pub const EFFICIENCY_REQUIREMENT_GROWTH: f64 = 1.05;
    /// Cap on the efficiency bonus term of `karma_earned`.
    pub const MAX_EFFICIENCY_BONUS: f64 = 2.0;
    /// Anxiety level at/above which `should_respond` requires `question_value >= 0.4`.
    pub const HIGH_ANXIETY_THRESHOLD: f64 = 0.9;
    /// Anxiety level at/above which `should_respond` requires `question_value >= 0.2`.
    pub const MODERATE_ANXIETY_THRESHOLD: f64 = 0.5;
    /// Minimum question value required once the pool is at/under the emergency reserve.
    pub const EMERGENCY_QUESTION_VALUE_THRESHOLD: f64 = 0.6;
    /// Minimum question value required once anxiety is high.
    pub const HIGH_ANXIETY_QUESTION_VALUE_THRESHOLD: f64 = 0.4;
    /// Minimum question value required once anxiety is moderate.
    pub const MODERATE_ANXIETY_QUESTION_VALUE_THRESHOLD: f64 = 0.2;

    /// How many of the most recent responses feed the age-up efficiency window.
    pub const AGE_UP_WINDOW: usize = 10;
    /// How many of the most recent karma deltas feed the regression check.
    pub const REGRESSION_WINDOW: usize = 5;
    /// How many of the most recent karma deltas feed the survival-threshold update.
    pub const SURVIVAL_THRESHOLD_WINDOW: usize = 10;
    /// Bound on `response_history`'s length.
    pub const RESPONSE_HISTORY_CAP: usize = 100;

    /// Default starting survival threshold.
    pub const DEFAULT_SURVIVAL_THRESHOLD: f64 = 0.05;
    /// Clamp bounds for `survival_threshold` adjustments.
    pub const SURVIVAL_THRESHOLD_BOUNDS: (f64, f64) = (0.1, 2.0);
    /// Above this ratio of avg-karma/threshold, raise the threshold.
    pub const SURVIVAL_THRESHOLD_RAISE_RATIO: f64 = 1.5;
    /// Below this ratio, lower the threshold.
    pub const SURVIVAL_THRESHOLD_LOWER_RATIO: f64 = 0.7;
    /// Step applied when raising the survival threshold.
    pub const SURVIVAL_THRESHOLD_RAISE_STEP: f64 = 1.1;
    /// Step applied when lowering the survival threshold.
    pub const SURVIVAL_THRESHOLD_LOWER_STEP: f64 = 0.9;
}

/// Three-Layer Inference Controller tuning (design §4.3).
pub mod controller {
    /// Pool threshold below which the resource state is `Debt`.
    pub const DEBT_THRESHOLD: i64 = 0;
    /// Pool threshold below which the resource state is `Critical`.
    pub const CRITICAL_THRESHOLD: i64 = 10;
    /// Pool threshold below which the resource state is `Scarce`.
    pub const SCARCE_THRESHOLD: i64 = 50;
    /// Pool threshold below which the resource state is `Stable` (else `Wealthy`).
    pub const STABLE_THRESHOLD: i64 = 200;

    /// Layer II soft cap on response length before the length bias kicks in.
    pub const LENGTH_SOFT_CAP: usize = 50;
    /// Per-token-over-cap length-penalty strength.
    pub const LENGTH_PENALTY_STRENGTH: f64 = 0.1;
    /// Floor on the length bias (never more negative than this).
    pub const LENGTH_PENALTY_FLOOR: f64 = -2.0;

    /// Verbose-token suppression bias by resource state.
    pub const VERBOSE_BIAS_SCARCE: f64 = -3.0;
    /// See [`VERBOSE_BIAS_SCARCE`].
    pub const VERBOSE_BIAS_CRITICAL: f64 = -5.0;
    /// See [`VERBOSE_BIAS_SCARCE`].
    pub const VERBOSE_BIAS_DEBT: f64 = -10.0;

    /// Base "Nice-loop" suppression bias before karma scaling.
    pub const NICE_LOOP_BASE_BIAS: f64 = -100.0;

    /// `max_tokens` ceiling by tier for Layer II, before RVC clamping.
    pub fn layer_ii_max_tokens(tier: crate::types::enums::Tier) -> u32 {
        use crate::types::enums::Tier;
        match tier {
            Tier::Trivial => 20,
            Tier::Low => 100,
            Tier::Moderate => 300,
            Tier::High => 500,
            Tier::Critical | Tier::Maximum => 1000,
        }
    }

    /// RVC budget ceiling (tokens) below which Layer II's LOW-tier overspend
    /// prevention bias applies.
    pub const OVERSPEND_PREVENTION_RVC_BUDGET_CEILING: u32 = 5;

    /// Layer III reward-score `word_multiplier` bands, by total free words used.
    pub const WORD_MULTIPLIER_BANDS: [(u32, f64); 5] =
        [(10, 20.0), (20, 15.0), (30, 10.0), (50, 5.0), (u32::MAX, 2.0)];

    /// Layer III reward-score `time_multiplier` bands, by duration in seconds.
    pub const TIME_MULTIPLIER_BANDS: [(f64, f64); 4] =
        [(3.0, 5.0), (6.0, 3.0), (10.0, 1.0), (f64::INFINITY, 0.5)];

    /// Reward-score tier ceiling by tier (CRITICAL/MAXIMUM are uncapped).
    pub fn reward_tier_ceiling(tier: crate::types::enums::Tier) -> Option<f64> {
        use crate::types::enums::Tier;
        match tier {
            Tier::Trivial => Some(1.2),
            Tier::Low => Some(1.5),
            Tier::Moderate => Some(1.8),
            Tier::High => Some(2.0),
            Tier::Critical | Tier::Maximum => None,
        }
    }

    /// Below this quality, the reward-score survival multiplier is forced to 1.0.
    pub const REWARD_QUALITY_FLOOR: f64 = 0.6;
}

/// Free-word economy (design §4.3 Layer III step 1): the fixed closed-class
/// list of function words that are free up to a small count.
pub mod free_words {
    /// Function words (articles, pronouns, auxiliaries, common
    /// prepositions/conjunctions). Ported from the distilled source's
    /// `FREE_FUNCTION_WORDS` set.
    pub const FREE_FUNCTION_WORDS: &[&str] = &[
        "i", "a", "the", "am", "and", "is", "are", "was", "were", "be", "been", "being", "have",
        "has", "had", "do", "does", "did", "will", "would", "could", "should", "can", "may",
        "might", "must", "shall", "to", "of", "in", "on", "at", "by", "for", "with", "from",
        "up", "about", "into", "through", "during", "before", "after", "above", "below",
        "between", "among", "under", "over", "around", "it", "you", "he", "she", "we", "they",
        "me", "him", "her", "us", "them", "my", "your", "his", "its", "our", "their", "this",
        "that", "these", "those", "an", "some", "any", "all", "both", "each", "every", "no",
        "not", "but", "or", "so", "yet", "if", "when", "where", "why", "how", "what", "who",
        "which", "as", "than", "like", "such", "very", "just", "only", "also", "even", "still",
        "again", "here", "there", "now", "then", "today", "yesterday", "tomorrow", "always",
        "never", "sometimes", "often", "usually",
    ];

    /// Number of function words that are free per response.
    pub const FREE_FUNCTION_WORD_ALLOWANCE: usize = 5;
    /// Total free-word budget (function + content); content words take
    /// whatever remains after the function-word allowance is consumed.
    pub const FREE_WORD_TOTAL_BUDGET: usize = 20;
}

/// Arbiter tuning (design §4.4).
pub mod arbiter {
    /// Weight on `judge_quality` in the utility score.
    pub const QUALITY_COMPONENT_WEIGHT: f64 = 0.6;
    /// Default quality used whenever the judge call fails or can't be parsed.
    pub const JUDGE_QUALITY_FALLBACK: f64 = 0.1;
    /// Bound on the gold-standard / quality caches (FIFO eviction).
    pub const MAX_CACHE_ENTRIES: usize = 500;

    /// Karma reward for RVC grade A (fast path, skips utility-band logic).
    pub const GRADE_A_BASE_REWARD: f64 = 2.0;
    /// Karma reward for RVC grade B.
    pub const GRADE_B_BASE_REWARD: f64 = 1.0;
    /// Extra reward when the efficiency ratio lands in `[0.3, 0.8]` on the A/B path.
    pub const GRADE_AB_EFFICIENCY_BONUS: f64 = 1.0;
    /// Efficiency-ratio band for the A/B efficiency bonus.
    pub const GRADE_AB_EFFICIENCY_BAND: (f64, f64) = (0.3, 0.8);

    /// Starting value for `adaptive_penalty_scaling`.
    pub const DEFAULT_PENALTY_SCALING: f64 = 1.0;
    /// Bounds on `penalty_scaling`.
    pub const PENALTY_SCALING_BOUNDS: (f64, f64) = (0.5, 1.5);
    /// Step applied when stepping `penalty_scaling` down or up.
    pub const PENALTY_SCALING_STEP_DOWN: f64 = 0.05;
    /// See [`PENALTY_SCALING_STEP_DOWN`].
    pub const PENALTY_SCALING_STEP_UP: f64 = 0.02;
    /// Starting value for the diagnostic `utility_threshold`.
    pub const DEFAULT_UTILITY_THRESHOLD: f64 = 0.2;
    /// Bounds on `utility_threshold`.
    pub const UTILITY_THRESHOLD_BOUNDS: (f64, f64) = (0.1, 0.3);
    /// Step applied to `utility_threshold`.
    pub const UTILITY_THRESHOLD_STEP: f64 = 0.01;
    /// Starting value for the diagnostic `efficiency_threshold`.
    pub const DEFAULT_EFFICIENCY_THRESHOLD: f64 = 0.3;
    /// Bounds on `efficiency_threshold`.
    pub const EFFICIENCY_THRESHOLD_BOUNDS: (f64, f64) = (0.1, 0.5);
    /// Step applied to `efficiency_threshold`.
    pub const EFFICIENCY_THRESHOLD_STEP: f64 = 0.02;
    /// Trigger for stepping the adaptive thresholds down.
    pub const ADAPTIVE_STEP_DOWN_UTILITY_CEILING: f64 = 0.1;
    /// See [`ADAPTIVE_STEP_DOWN_UTILITY_CEILING`].
    pub const ADAPTIVE_STEP_DOWN_KARMA_CEILING: f64 = -3.0;
    /// Trigger for stepping the adaptive thresholds up.
    pub const ADAPTIVE_STEP_UP_UTILITY_FLOOR: f64 = 0.3;
    /// See [`ADAPTIVE_STEP_UP_UTILITY_FLOOR`].
    pub const ADAPTIVE_STEP_UP_KARMA_FLOOR: f64 = 0.0;
    /// Efficiency average below which `efficiency_threshold` steps down.
    pub const ADAPTIVE_EFFICIENCY_LOW: f64 = 0.2;
    /// Efficiency average above which `efficiency_threshold` steps up.
    pub const ADAPTIVE_EFFICIENCY_HIGH: f64 = 0.8;
    /// Minimum learning-history entries before adaptive stepping kicks in.
    pub const ADAPTIVE_MIN_HISTORY: usize = 10;
    /// Bound on the learning-history ring buffer.
    pub const LEARNING_HISTORY_CAP: usize = 50;
    /// Curiosity score above which an emergence-zone response earns a bonus.
    pub const CURIOSITY_BONUS_THRESHOLD: f64 = 0.3;
}

/// CFIA tuning (design §4.5).
pub mod cfia {
    /// Starting generation number.
    pub const INITIAL_AIIQ: u32 = 2;
    /// Dampening factor used in threshold growth.
    pub const DEFAULT_ALPHA: f64 = 0.15;
    /// Starting shard-size ceiling, in KB.
    pub const BASE_THRESHOLD_KB: f64 = 1000.0;
    /// Starting generational karma pool.
    pub const INITIAL_KARMA_POOL: f64 = 100.0;

    /// Granularity factor for a given `aiiq`.
    #[must_use]
    pub fn granularity_factor(aiiq: u32) -> f64 {
        match aiiq {
            2 => 0.375,
            3 => 0.167,
            4 => 0.0625,
            n if n > 4 => {
                let nf = f64::from(n);
                (1.0 / nf) * (1.0 / factorial(n))
            }
            _ => 1.0,
        }
    }

    /// `n!` as `f64`, computed iteratively (n stays small in practice: aiiq
    /// grows by generational milestones, not per-request).
    #[must_use]
    pub fn factorial(n: u32) -> f64 {
        (1..=n).fold(1.0_f64, |acc, x| acc * f64::from(x))
    }
}

/// Small fixed keyword table for Arbiter context tagging (design §4.4).
pub mod context_tags {
    /// `(tag, keywords)` pairs scanned as case-insensitive substrings of the prompt.
    pub const TAG_KEYWORDS: &[(&str, &[&str])] = &[
        ("greeting", &["hi", "hello", "hey"]),
        ("food", &["pizza", "food"]),
        ("technical", &["machine learning", "ai", "artificial intelligence"]),
        ("philosophical", &["intelligence", "philosophy", "meaning"]),
        ("emotional_support", &["anxiety", "help", "advice"]),
    ];
}
