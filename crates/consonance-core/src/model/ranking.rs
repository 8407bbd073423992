use serde::{Deserialize, Serialize};

/// A ranked candidate with its similarity score as a percentage (0-100,
/// two decimals).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub name: String,
    pub score: f64,
}

impl RankedMatch {
    #[must_use]
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// A ranked match prepared for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1-based position in the result list.
    pub position: usize,
    pub name: String,
    pub score: f64,

    /// Artist image, looked up after ranking. Never affects the score.
    pub image_url: Option<String>,
}

impl Recommendation {
    #[must_use]
    pub fn from_match(position: usize, ranked: RankedMatch) -> Self {
        Self {
            position,
            name: ranked.name,
            score: ranked.score,
            image_url: None,
        }
    }

    #[must_use]
    pub fn with_image_url(mut self, url: Option<String>) -> Self {
        self.image_url = url;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_from_match() {
        let rec = Recommendation::from_match(1, RankedMatch::new("Mogwai", 87.5));
        assert_eq!(rec.position, 1);
        assert_eq!(rec.name, "Mogwai");
        assert!((rec.score - 87.5).abs() < f64::EPSILON);
        assert!(rec.image_url.is_none());
    }

    #[test]
    fn test_recommendation_serializes_image_url() {
        let rec = Recommendation::from_match(2, RankedMatch::new("Low", 40.0))
            .with_image_url(Some("https://i.scdn.co/image/abc".to_string()));
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["name"], "Low");
        assert_eq!(json["image_url"], "https://i.scdn.co/image/abc");
    }
}
