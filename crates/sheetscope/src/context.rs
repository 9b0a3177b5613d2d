//! Compact profiling payload for the narrative/chat collaborator.
//!
//! Only fields that exist for a column are emitted, so consumers must treat
//! every type-specific key as optional.

use serde_json::{Map, Value, json};

use crate::anomaly::anomalies_from_health;
use crate::classify::Classification;
use crate::health::HealthScoreResult;
use crate::input::number_to_json;
use crate::profile::{ColumnDetail, EnhancedColumnStats};

/// Categories listed per column.
const CONTEXT_CATEGORIES: usize = 5;
/// Anomalies listed in the payload.
const CONTEXT_ANOMALIES: usize = 10;

/// Build the context payload from pipeline outputs.
pub fn narrative_context(
    stats: &[EnhancedColumnStats],
    row_count: usize,
    health: Option<&HealthScoreResult>,
    classification: Option<&Classification>,
) -> Value {
    let mut context = Map::new();
    context.insert("rowCount".to_string(), json!(row_count));
    context.insert("columnCount".to_string(), json!(stats.len()));
    context.insert(
        "columns".to_string(),
        Value::Array(stats.iter().map(column_context).collect()),
    );

    if let Some(health) = health {
        let mut anomalies = anomalies_from_health(health);
        anomalies.truncate(CONTEXT_ANOMALIES);
        context.insert(
            "health".to_string(),
            json!({
                "overall": health.breakdown.overall,
                "anomalies": anomalies,
            }),
        );
    }

    if let Some(classification) = classification {
        context.insert(
            "domain".to_string(),
            json!({
                "category": classification.category,
                "confidence": classification.confidence,
            }),
        );
    }

    Value::Object(context)
}

fn column_context(column: &EnhancedColumnStats) -> Value {
    let mut entry = Map::new();
    entry.insert("name".to_string(), json!(column.name));
    entry.insert("inferredType".to_string(), json!(column.inferred_type()));
    entry.insert("nullCount".to_string(), json!(column.null_count));
    entry.insert("uniqueValues".to_string(), json!(column.unique_values));

    match &column.detail {
        ColumnDetail::Numeric(numeric) => {
            entry.insert("min".to_string(), number_to_json(numeric.min));
            entry.insert("max".to_string(), number_to_json(numeric.max));
            entry.insert("mean".to_string(), number_to_json(numeric.mean));
            entry.insert("median".to_string(), number_to_json(numeric.median));
            if let Some(outliers) = &numeric.outliers {
                entry.insert("outlierCount".to_string(), json!(outliers.count));
            }
        }
        ColumnDetail::Category(category) => {
            let top: Vec<Value> = category
                .top_categories
                .iter()
                .take(CONTEXT_CATEGORIES)
                .map(|c| json!({ "value": c.value, "count": c.count }))
                .collect();
            entry.insert("topCategories".to_string(), Value::Array(top));
        }
        ColumnDetail::Date(date) => {
            entry.insert("dateRange".to_string(), json!(date.date_range));
        }
        ColumnDetail::Boolean(boolean) => {
            entry.insert("trueCount".to_string(), json!(boolean.true_count));
            entry.insert("falseCount".to_string(), json!(boolean.false_count));
        }
        ColumnDetail::Text(text) => {
            entry.insert("avgLength".to_string(), number_to_json(text.avg_length));
        }
        ColumnDetail::Mixed => {}
    }

    Value::Object(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Dataset, Value as Cell};
    use crate::health::HealthScoreCalculator;
    use crate::profile::ColumnProfiler;

    #[test]
    fn test_optional_fields_are_omitted() {
        let data = Dataset::from_positional(
            vec!["region".to_string(), "amount".to_string()],
            vec![
                vec![Cell::from("north"), Cell::from(1.0)],
                vec![Cell::from("north"), Cell::from(2.0)],
                vec![Cell::from("south"), Cell::from(3.0)],
                vec![Cell::from("south"), Cell::from(4.0)],
            ],
        );
        let stats = ColumnProfiler::new().profile_dataset(&data).unwrap();
        let context = narrative_context(&stats, data.row_count(), None, None);

        assert_eq!(context["rowCount"], 4);
        let region = &context["columns"][0];
        assert_eq!(region["inferredType"], "category");
        assert!(region.get("outlierCount").is_none());
        assert_eq!(region["topCategories"][0]["value"], "north");

        let amount = &context["columns"][1];
        assert_eq!(amount["inferredType"], "numeric");
        assert!(amount.get("topCategories").is_none());
        assert_eq!(amount["outlierCount"], 0);
        assert!(context.get("health").is_none());
    }

    #[test]
    fn test_health_anomalies_carry_issue_structure() {
        let mut rows: Vec<Vec<Cell>> = (0..8).map(|i| vec![Cell::from(i as f64)]).collect();
        rows.push(vec![Cell::Null]);
        rows.push(vec![Cell::Null]);
        let data = Dataset::from_positional(vec!["amount".to_string()], rows);
        let stats = ColumnProfiler::new().profile_dataset(&data).unwrap();
        let health = HealthScoreCalculator::new()
            .calculate(&stats, data.row_count(), &data.headers)
            .unwrap();
        let context = narrative_context(&stats, data.row_count(), Some(&health), None);

        let anomalies = context["health"]["anomalies"].as_array().unwrap();
        let missing = anomalies.iter().find(|a| a["type"] == "missing").unwrap();
        assert_eq!(missing["column"], "amount");
        assert_eq!(missing["affectedRows"], 2);
        assert_eq!(context["health"]["overall"], health.breakdown.overall);
    }
}
