//! Scam categories

use serde::{Deserialize, Serialize};

/// Closed set of call categories. Exactly one (`Legitimate`) is non-fraud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TechSupport,
    Financial,
    Romance,
    LotteryPrize,
    Phishing,
    Robocall,
    Legitimate,
}

impl Category {
    /// All categories in label order. The index of a category in this slice
    /// is its class index in the trained model.
    pub const ALL: [Category; 7] = [
        Category::TechSupport,
        Category::Financial,
        Category::Romance,
        Category::LotteryPrize,
        Category::Phishing,
        Category::Robocall,
        Category::Legitimate,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(6)
    }

    pub fn from_index(idx: usize) -> Category {
        Self::ALL.get(idx).copied().unwrap_or(Category::Legitimate)
    }

    pub fn is_fraud(self) -> bool {
        self != Category::Legitimate
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::TechSupport => "tech_support",
            Category::Financial => "financial",
            Category::Romance => "romance",
            Category::LotteryPrize => "lottery_prize",
            Category::Phishing => "phishing",
            Category::Robocall => "robocall",
            Category::Legitimate => "legitimate",
        }
    }

    /// Lenient parse: unrecognized labels coerce to `Legitimate`. This is a
    /// documented leniency of the training contract, not a validation gap.
    pub fn parse_lenient(label: &str) -> Category {
        match label.trim() {
            "tech_support" => Category::TechSupport,
            "financial" => Category::Financial,
            "romance" => Category::Romance,
            "lottery_prize" => Category::LotteryPrize,
            "phishing" => Category::Phishing,
            "robocall" => Category::Robocall,
            _ => Category::Legitimate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_non_fraud_category() {
        let non_fraud: Vec<_> = Category::ALL.iter().filter(|c| !c.is_fraud()).collect();
        assert_eq!(non_fraud, vec![&Category::Legitimate]);
    }

    #[test]
    fn test_index_round_trip() {
        for cat in Category::ALL {
            assert_eq!(Category::from_index(cat.index()), cat);
        }
        assert_eq!(Category::from_index(99), Category::Legitimate);
    }

    #[test]
    fn test_lenient_parse_coerces_unknown_labels() {
        assert_eq!(Category::parse_lenient("robocall"), Category::Robocall);
        assert_eq!(Category::parse_lenient("spam_call"), Category::Legitimate);
        assert_eq!(Category::parse_lenient(""), Category::Legitimate);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Category::LotteryPrize).unwrap();
        assert_eq!(json, "\"lottery_prize\"");
    }
}
