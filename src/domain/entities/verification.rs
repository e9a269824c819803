use serde::{Deserialize, Serialize};

/// Fraud-risk report returned by `POST /api/verify`.
///
/// Immutable once produced. A new scan replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Free-text label as sent by the backend ("High", "LOW RISK", ...).
    pub risk_level: String,
    pub risk_score: f64,
    pub explanation: Vec<String>,
    pub extracted_data: ExtractedData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedData {
    pub name: String,
    pub id_number: String,
    pub dob: String,
}

impl VerificationResult {
    pub fn risk_tier(&self) -> Option<RiskTier> {
        RiskTier::from_label(&self.risk_level)
    }

    pub fn report(&self) -> VerificationReport<'_> {
        VerificationReport {
            result: self,
            risk_tier: self.risk_tier(),
        }
    }
}

/// Result as rendered to the user: the backend's fields unchanged, plus the
/// classified tier (`null` for labels that do not classify).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport<'a> {
    #[serde(flatten)]
    pub result: &'a VerificationResult,
    pub risk_tier: Option<RiskTier>,
}

/// Risk bucket derived from the backend's free-text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }

    /// Classify labels such as "High", "MEDIUM RISK" or "low-risk".
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        let word = label
            .split(|c: char| !c.is_ascii_alphabetic())
            .find(|w| !w.is_empty())?;
        match word {
            "low" => Some(RiskTier::Low),
            "medium" | "med" | "moderate" => Some(RiskTier::Medium),
            "high" => Some(RiskTier::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}
