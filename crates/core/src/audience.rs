//! Audience classification for content planning.
//!
//! The audience string is free text supplied by the user ("individual
//! investor", "飲食チェーン本部", ...). Classification is a transient bias
//! applied to planning prompts, recomputed on every call and never stored.

/// The closed set of audience profiles. Keyword groups are tested in this
/// order; the first hit wins, and no hit selects [`AudienceProfile::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudienceProfile {
    Investor,
    Developer,
    Corporate,
    Retail,
    General,
}

/// Ordered keyword groups. Matching is lowercase substring search, so cue
/// words must be lowercase here. Japanese and English cues are both
/// accepted, matching the brochures this system was built for.
const INVESTOR_KEYWORDS: &[&str] = &["投資", "個人", "investor", "investment"];
const DEVELOPER_KEYWORDS: &[&str] = &["デベロッパー", "開発", "developer", "development"];
const CORPORATE_KEYWORDS: &[&str] = &["事業", "法人", "corporate", "business", "tenant"];
const RETAIL_KEYWORDS: &[&str] = &["飲食", "小売", "retail", "restaurant", "food"];

impl AudienceProfile {
    /// Classify an audience description.
    pub fn classify(audience: &str) -> Self {
        let lower = audience.to_lowercase();
        let matches = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if matches(INVESTOR_KEYWORDS) {
            Self::Investor
        } else if matches(DEVELOPER_KEYWORDS) {
            Self::Developer
        } else if matches(CORPORATE_KEYWORDS) {
            Self::Corporate
        } else if matches(RETAIL_KEYWORDS) {
            Self::Retail
        } else {
            Self::General
        }
    }

    /// The emphasis guidance injected into the planning prompt for this
    /// profile.
    pub fn emphasis(&self) -> &'static str {
        match self {
            Self::Investor => {
                "\
- Prioritize investment returns (yield, cash flow)
- Address preservation and growth of asset value
- Highlight tax advantages and deduction opportunities
- Weigh risk against return explicitly"
            }
            Self::Developer => {
                "\
- Prioritize development potential (floor-area ratio, building coverage)
- Analyze the surrounding area and demand
- Confirm legal restrictions and infrastructure readiness
- Assess project profitability and feasibility"
            }
            Self::Corporate => {
                "\
- Prioritize suitability for business use
- Evaluate access and convenience
- Consider cost efficiency and room to expand
- Check alignment with brand image"
            }
            Self::Retail => {
                "\
- Prioritize location and foot traffic above all
- Confirm visibility and parking availability
- Analyze nearby competition
- Evaluate the customer base and target market"
            }
            Self::General => {
                "\
- Prioritize the property's fundamentals and distinguishing features
- Evaluate cost performance
- Confirm location and convenience
- Consider future value and potential"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_investor_substring_match() {
        assert_eq!(
            AudienceProfile::classify("individual investor"),
            AudienceProfile::Investor
        );
        assert_eq!(
            AudienceProfile::classify("a seasoned real-estate INVESTOR from Naha"),
            AudienceProfile::Investor
        );
        assert_eq!(AudienceProfile::classify("個人投資家"), AudienceProfile::Investor);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            AudienceProfile::classify("DEVELOPER consortium"),
            AudienceProfile::Developer
        );
        assert_eq!(
            AudienceProfile::classify("Retail chain"),
            AudienceProfile::Retail
        );
    }

    #[test]
    fn test_first_group_wins() {
        // "investment development fund" hits the investor group first.
        assert_eq!(
            AudienceProfile::classify("investment development fund"),
            AudienceProfile::Investor
        );
    }

    #[test]
    fn test_corporate_and_japanese_cues() {
        assert_eq!(AudienceProfile::classify("法人のお客様"), AudienceProfile::Corporate);
        assert_eq!(
            AudienceProfile::classify("corporate tenant"),
            AudienceProfile::Corporate
        );
        assert_eq!(AudienceProfile::classify("飲食店オーナー"), AudienceProfile::Retail);
    }

    #[test]
    fn test_no_match_is_general() {
        assert_eq!(AudienceProfile::classify(""), AudienceProfile::General);
        assert_eq!(
            AudienceProfile::classify("a neighbor who asked"),
            AudienceProfile::General
        );
    }
}
