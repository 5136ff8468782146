use serde::{Deserialize, Serialize};

/// Probability above which a client is a high-priority follow-up.
pub const HIGH_PRIORITY_THRESHOLD: f64 = 0.7;

/// Probability above which a client gets the standard protocol; at or below
/// it the contact frequency is reduced.
pub const MEDIUM_PRIORITY_THRESHOLD: f64 = 0.4;

/// Priority band assigned to a scored client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    /// Maps a subscription probability to its priority band.
    ///
    /// Both cutoffs are strict: exactly 0.7 is Medium, exactly 0.4 is Low.
    /// Every probability in [0, 1] lands in exactly one band.
    pub fn for_probability(probability: f64) -> Tier {
        if probability > HIGH_PRIORITY_THRESHOLD {
            Tier::High
        } else if probability > MEDIUM_PRIORITY_THRESHOLD {
            Tier::Medium
        } else {
            Tier::Low
        }
    }

    /// Headline for the recommendation panel.
    pub fn headline(&self) -> &'static str {
        match self {
            Tier::High => "HIGH PRIORITY CLIENT",
            Tier::Medium => "MEDIUM PRIORITY CLIENT",
            Tier::Low => "LOW PRIORITY CLIENT",
        }
    }

    /// Action lines shown with the tier.
    pub fn action_lines(&self) -> Vec<String> {
        let lines: &[&str] = match self {
            Tier::High => &[
                "Immediate follow-up recommended",
                "Offer premium term deposit rates",
                "Assign to senior sales representative",
            ],
            Tier::Medium => &[
                "Standard marketing protocol",
                "Consider personalized offers",
                "Monitor engagement",
            ],
            Tier::Low => &[
                "Reduce contact frequency",
                "Focus on relationship building",
                "Consider alternative products",
            ],
        };
        lines.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_tier_above_cutoff() {
        assert_eq!(Tier::for_probability(0.71), Tier::High);
        assert_eq!(Tier::for_probability(0.99), Tier::High);
        assert_eq!(Tier::for_probability(1.0), Tier::High);
    }

    #[test]
    fn exact_high_cutoff_is_medium() {
        assert_eq!(Tier::for_probability(0.7), Tier::Medium);
    }

    #[test]
    fn exact_medium_cutoff_is_low() {
        assert_eq!(Tier::for_probability(0.4), Tier::Low);
    }

    #[test]
    fn low_tier_at_bottom() {
        assert_eq!(Tier::for_probability(0.0), Tier::Low);
        assert_eq!(Tier::for_probability(0.39), Tier::Low);
    }

    #[test]
    fn medium_band_is_half_open() {
        assert_eq!(Tier::for_probability(0.41), Tier::Medium);
        assert_eq!(Tier::for_probability(0.69), Tier::Medium);
    }
}
