//! Renderer-agnostic chart specifications.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One record of chart data, keyed by axis or series name.
pub type ChartRecord = IndexMap<String, serde_json::Value>;

/// Kind of chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Pie,
    Scatter,
    Area,
    Radar,
    Heatmap,
    Histogram,
}

/// Axis binding: a single data key or several series keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisKey {
    Single(String),
    Multiple(Vec<String>),
}

impl From<&str> for AxisKey {
    fn from(key: &str) -> Self {
        AxisKey::Single(key.to_string())
    }
}

impl From<Vec<String>> for AxisKey {
    fn from(keys: Vec<String>) -> Self {
        AxisKey::Multiple(keys)
    }
}

/// A self-contained chart: type, title and already-aggregated data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub title: String,
    pub data: Vec<ChartRecord>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x_axis: Option<AxisKey>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub y_axis: Option<AxisKey>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub explanation: Option<String>,
}

impl ChartConfig {
    /// Create a chart with no axes, colors or explanation.
    pub fn new(chart_type: ChartType, title: impl Into<String>, data: Vec<ChartRecord>) -> Self {
        Self {
            chart_type,
            title: title.into(),
            data,
            x_axis: None,
            y_axis: None,
            colors: None,
            explanation: None,
        }
    }

    pub fn with_x_axis(mut self, axis: impl Into<AxisKey>) -> Self {
        self.x_axis = Some(axis.into());
        self
    }

    pub fn with_y_axis(mut self, axis: impl Into<AxisKey>) -> Self {
        self.y_axis = Some(axis.into());
        self
    }

    /// Set colors; an empty list leaves colors unset.
    pub fn with_colors(mut self, colors: Vec<String>) -> Self {
        self.colors = if colors.is_empty() { None } else { Some(colors) };
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_shape() {
        let mut record = ChartRecord::new();
        record.insert("region".to_string(), json!("north"));
        record.insert("count".to_string(), json!(4));

        let chart = ChartConfig::new(ChartType::Bar, "region breakdown", vec![record])
            .with_x_axis("region")
            .with_y_axis(vec!["count".to_string()]);
        let value = serde_json::to_value(&chart).unwrap();

        assert_eq!(value["type"], "bar");
        assert_eq!(value["xAxis"], "region");
        assert_eq!(value["yAxis"], json!(["count"]));
        assert_eq!(value["data"][0]["region"], "north");
        assert!(value.get("colors").is_none());
    }

    #[test]
    fn test_empty_colors_stay_unset() {
        let chart = ChartConfig::new(ChartType::Pie, "t", vec![]).with_colors(vec![]);
        assert!(chart.colors.is_none());
    }
}
