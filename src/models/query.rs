use std::cmp::Ordering;

use serde::Deserialize;
use serde_json::Value;

/// json-server style list parameters: `?_page=2&_limit=5&_sort=title&_order=asc`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ListParams {
    #[serde(rename = "_page")]
    pub page: Option<usize>,
    #[serde(rename = "_limit")]
    pub limit: Option<usize>,
    #[serde(rename = "_sort")]
    pub sort: Option<String>,
    #[serde(rename = "_order")]
    pub order: Option<SortOrder>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl ListParams {
    /// Sort and slice serialized rows. Sorting only happens when `_sort` is
    /// given; slicing only when `_page` or `_limit` is (page defaults to 1,
    /// limit to 10, matching json-server).
    pub fn apply(&self, mut rows: Vec<Value>) -> Vec<Value> {
        if let Some(field) = &self.sort {
            rows.sort_by(|a, b| compare_fields(a.get(field), b.get(field)));
            if self.order == Some(SortOrder::Desc) {
                rows.reverse();
            }
        }

        if self.page.is_some() || self.limit.is_some() {
            let page = self.page.unwrap_or(1).max(1);
            let limit = self.limit.unwrap_or(10);
            rows = rows.into_iter().skip((page - 1) * limit).take(limit).collect();
        }

        rows
    }
}

fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}
