//! Static per-domain vocabulary used by the dataset classifier.
//!
//! Adding a domain means adding a row here; the scoring loop never changes.

use serde::{Deserialize, Serialize};

/// Domain category of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetCategory {
    Financial,
    Sales,
    Survey,
    LogData,
    Hr,
    Inventory,
    Healthcare,
    Marketing,
    General,
}

impl DatasetCategory {
    /// Serialized label.
    pub fn label(&self) -> &'static str {
        match self {
            DatasetCategory::Financial => "financial",
            DatasetCategory::Sales => "sales",
            DatasetCategory::Survey => "survey",
            DatasetCategory::LogData => "log_data",
            DatasetCategory::Hr => "hr",
            DatasetCategory::Inventory => "inventory",
            DatasetCategory::Healthcare => "healthcare",
            DatasetCategory::Marketing => "marketing",
            DatasetCategory::General => "general",
        }
    }
}

impl std::fmt::Display for DatasetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Vocabulary of a single domain.
#[derive(Debug, Clone, Copy)]
pub struct DomainVocabulary {
    pub category: DatasetCategory,
    /// Lowercase fragments matched against headers.
    pub keywords: &'static [&'static str],
    /// Lowercase cell values typical of the domain.
    pub value_hints: &'static [&'static str],
    /// Currency-formatted values count as evidence.
    pub currency_signal: bool,
    /// Timestamps with a time of day count as evidence.
    pub timestamp_signal: bool,
}

pub static DOMAINS: &[DomainVocabulary] = &[
    DomainVocabulary {
        category: DatasetCategory::Financial,
        keywords: &[
            "revenue", "expense", "profit", "balance", "account", "transaction", "budget",
            "debit", "credit", "tax", "asset", "liabilit", "interest", "cash", "payment",
            "income", "ledger", "equity", "dividend", "invoice",
        ],
        value_hints: &["debit", "credit", "deposit", "withdrawal", "transfer", "usd", "eur", "gbp"],
        currency_signal: true,
        timestamp_signal: false,
    },
    DomainVocabulary {
        category: DatasetCategory::Sales,
        keywords: &[
            "sales", "revenue", "order", "customer", "product", "quantity", "region", "price",
            "discount", "units_sold", "deal", "store", "purchase",
        ],
        value_hints: &[
            "north", "south", "east", "west", "emea", "apac", "shipped", "delivered", "returned",
            "won", "lost",
        ],
        currency_signal: true,
        timestamp_signal: false,
    },
    DomainVocabulary {
        category: DatasetCategory::Survey,
        keywords: &[
            "respondent", "question", "answer", "rating", "satisfaction", "feedback", "survey",
            "likert", "nps", "agree", "recommend",
        ],
        value_hints: &[
            "strongly agree", "agree", "neutral", "disagree", "strongly disagree", "satisfied",
            "dissatisfied", "very satisfied",
        ],
        currency_signal: false,
        timestamp_signal: false,
    },
    DomainVocabulary {
        category: DatasetCategory::LogData,
        keywords: &[
            "timestamp", "level", "severity", "message", "log", "event", "request", "status_code",
            "latency", "endpoint", "ip_address", "host", "user_agent", "trace", "session",
        ],
        value_hints: &["info", "warn", "warning", "error", "debug", "trace", "fatal", "critical"],
        currency_signal: false,
        timestamp_signal: true,
    },
    DomainVocabulary {
        category: DatasetCategory::Hr,
        keywords: &[
            "employee", "salary", "department", "hire", "position", "job_title", "manager",
            "tenure", "performance", "payroll", "bonus", "termination", "headcount", "staff",
        ],
        value_hints: &["full-time", "part-time", "contractor", "intern", "terminated", "on leave"],
        currency_signal: false,
        timestamp_signal: false,
    },
    DomainVocabulary {
        category: DatasetCategory::Inventory,
        keywords: &[
            "stock", "inventory", "warehouse", "sku", "supplier", "reorder", "on_hand", "shelf",
            "lot_number", "backorder",
        ],
        value_hints: &["in stock", "out of stock", "backordered", "discontinued", "low stock"],
        currency_signal: false,
        timestamp_signal: false,
    },
    DomainVocabulary {
        category: DatasetCategory::Healthcare,
        keywords: &[
            "patient", "diagnosis", "treatment", "hospital", "doctor", "physician", "medication",
            "dosage", "blood", "heart_rate", "bmi", "admission", "discharge", "clinic", "symptom",
        ],
        value_hints: &["inpatient", "outpatient", "admitted", "discharged", "positive", "negative"],
        currency_signal: false,
        timestamp_signal: false,
    },
    DomainVocabulary {
        category: DatasetCategory::Marketing,
        keywords: &[
            "campaign", "click", "impression", "ctr", "conversion", "lead", "channel", "spend",
            "cpc", "cpm", "bounce", "engagement", "subscriber", "utm", "audience",
        ],
        value_hints: &["email", "social", "organic", "paid", "cpc", "newsletter", "display", "referral"],
        currency_signal: false,
        timestamp_signal: false,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_is_lowercase() {
        for domain in DOMAINS {
            for word in domain.keywords.iter().chain(domain.value_hints) {
                assert_eq!(*word, word.to_lowercase(), "{}", domain.category);
            }
        }
    }

    #[test]
    fn test_general_has_no_vocabulary() {
        assert!(DOMAINS.iter().all(|d| d.category != DatasetCategory::General));
    }

    #[test]
    fn test_category_labels_match_serde() {
        let json = serde_json::to_string(&DatasetCategory::LogData).unwrap();
        assert_eq!(json, format!("\"{}\"", DatasetCategory::LogData.label()));
    }
}
