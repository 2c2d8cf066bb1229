//! Model browsing: filtering, sorting, and pagination over model lists.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;

use super::models::{Model, ModelCapability};

/// Filter criteria. Empty/`None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelFilter {
    /// Case-insensitive substring of the model id or name.
    pub name: Option<String>,
    /// Allowed provider ids.
    pub providers: Vec<String>,
    /// The model must have at least one of these.
    pub capabilities: Vec<ModelCapability>,
    pub min_context_length: Option<u64>,
    /// Models without a known input price pass.
    pub max_input_cost: Option<f64>,
    /// Models without a known output price pass.
    pub max_output_cost: Option<f64>,
    pub show_deprecated: bool,
}

impl ModelFilter {
    /// Whether `model` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, model: &Model) -> bool {
        if let Some(needle) = self.name.as_deref().map(str::to_lowercase) {
            if !model.name.to_lowercase().contains(&needle)
                && !model.id.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if !self.providers.is_empty() && !self.providers.contains(&model.provider) {
            return false;
        }

        if !self.capabilities.is_empty()
            && !self.capabilities.iter().any(|&c| model.has_capability(c))
        {
            return false;
        }

        if let Some(min) = self.min_context_length {
            if model.context_length.unwrap_or(0) < min {
                return false;
            }
        }

        if let (Some(max), Some(cost)) = (self.max_input_cost, model.input_cost_per_million) {
            if cost > max {
                return false;
            }
        }

        if let (Some(max), Some(cost)) = (self.max_output_cost, model.output_cost_per_million) {
            if cost > max {
                return false;
            }
        }

        self.show_deprecated || !model.is_deprecated()
    }

    /// Models that match, in input order.
    #[must_use]
    pub fn apply(&self, models: Vec<Model>) -> Vec<Model> {
        models.into_iter().filter(|m| self.matches(m)).collect()
    }
}

/// Sort key for model lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Name,
    Provider,
    ContextLength,
    InputCost,
    OutputCost,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "name" => Ok(Self::Name),
            "provider" => Ok(Self::Provider),
            "context" | "context-length" => Ok(Self::ContextLength),
            "input-cost" => Ok(Self::InputCost),
            "output-cost" => Ok(Self::OutputCost),
            _ => Err(format!(
                "unknown sort field '{s}'. Valid fields: name, provider, context-length, input-cost, output-cost"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Missing values sort after present ones in both directions.
fn cmp_optional<T: PartialOrd>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of `models` by `field`. Ties break on model id.
pub fn sort_models(models: &mut [Model], field: SortField, direction: SortDirection) {
    models.sort_by(|a, b| {
        let ord = match field {
            SortField::Name => cmp_optional(
                Some(a.name.to_lowercase()),
                Some(b.name.to_lowercase()),
                direction,
            ),
            SortField::Provider => cmp_optional(Some(&a.provider), Some(&b.provider), direction),
            SortField::ContextLength => cmp_optional(a.context_length, b.context_length, direction),
            SortField::InputCost => {
                cmp_optional(a.input_cost_per_million, b.input_cost_per_million, direction)
            }
            SortField::OutputCost => {
                cmp_optional(a.output_cost_per_million, b.output_cost_per_million, direction)
            }
        };
        ord.then_with(|| a.id.cmp(&b.id))
    });
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub items: Vec<Model>,
    /// 1-based page number actually returned.
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Slice `models` into 1-based pages. Page 0 reads as page 1; a page past
/// the end is empty.
#[must_use]
pub fn paginate(models: Vec<Model>, page: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total = models.len();
    let total_pages = total.div_ceil(page_size);
    let items = models
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();
    Page {
        items,
        page,
        page_size,
        total,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::defaults::default_models;

    fn catalog() -> Vec<Model> {
        default_models().into_values().flatten().collect()
    }

    #[test]
    fn empty_filter_hides_only_deprecated() {
        let mut models = catalog();
        let total = models.len();
        models[0].deprecated = Some(true);

        assert_eq!(ModelFilter::default().apply(models.clone()).len(), total - 1);
        let all = ModelFilter {
            show_deprecated: true,
            ..ModelFilter::default()
        };
        assert_eq!(all.apply(models).len(), total);
    }

    #[test]
    fn name_matches_id_or_name_case_insensitively() {
        let filter = ModelFilter {
            name: Some("SONNET".to_string()),
            ..ModelFilter::default()
        };
        let ids: Vec<String> = filter.apply(catalog()).into_iter().map(|m| m.id).collect();
        assert!(ids.contains(&"claude-3-5-sonnet-20241022".to_string()));
        assert!(ids.contains(&"anthropic/claude-3.5-sonnet".to_string()));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn capability_filter_is_any_of() {
        let filter = ModelFilter {
            capabilities: vec![ModelCapability::WebSearch, ModelCapability::CodeInterpreter],
            ..ModelFilter::default()
        };
        let models = filter.apply(catalog());
        assert!(!models.is_empty());
        assert!(models.iter().all(|m| {
            m.has_capability(ModelCapability::WebSearch)
                || m.has_capability(ModelCapability::CodeInterpreter)
        }));
    }

    #[test]
    fn provider_context_and_cost_filters() {
        let filter = ModelFilter {
            providers: vec!["anthropic".to_string()],
            min_context_length: Some(200_000),
            max_input_cost: Some(3.0),
            ..ModelFilter::default()
        };
        let ids: Vec<String> = filter.apply(catalog()).into_iter().map(|m| m.id).collect();
        assert_eq!(
            ids,
            vec!["claude-3-5-sonnet-20241022", "claude-3-5-haiku-20241022"]
        );
    }

    #[test]
    fn unknown_cost_passes_cost_filters() {
        let model = Model::new("mystery", "Mystery", "local");
        let filter = ModelFilter {
            max_input_cost: Some(0.01),
            max_output_cost: Some(0.01),
            ..ModelFilter::default()
        };
        assert!(filter.matches(&model));
    }

    #[test]
    fn sort_by_cost_puts_missing_last() {
        let mut models = vec![
            Model::new("free", "Free", "x"),
            {
                let mut m = Model::new("cheap", "Cheap", "x");
                m.input_cost_per_million = Some(0.1);
                m
            },
            {
                let mut m = Model::new("pricey", "Pricey", "x");
                m.input_cost_per_million = Some(10.0);
                m
            },
        ];

        sort_models(&mut models, SortField::InputCost, SortDirection::Asc);
        let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["cheap", "pricey", "free"]);

        sort_models(&mut models, SortField::InputCost, SortDirection::Desc);
        let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["pricey", "cheap", "free"]);
    }

    #[test]
    fn sort_field_parses() {
        assert_eq!("context".parse::<SortField>().unwrap(), SortField::ContextLength);
        assert_eq!("input_cost".parse::<SortField>().unwrap(), SortField::InputCost);
        assert!("speed".parse::<SortField>().is_err());
    }

    #[test]
    fn pagination_bounds() {
        let models = catalog();
        let total = models.len();

        let first = paginate(models.clone(), 1, 5);
        assert_eq!(first.items.len(), 5);
        assert_eq!(first.total, total);
        assert_eq!(first.total_pages, total.div_ceil(5));

        let zero = paginate(models.clone(), 0, 5);
        assert_eq!(zero.page, 1);
        assert_eq!(zero.items, first.items);

        let past_end = paginate(models, 999, 5);
        assert!(past_end.items.is_empty());
    }

    #[test]
    fn huge_page_number_is_empty_not_overflow() {
        let page = paginate(catalog(), usize::MAX, 20);
        assert!(page.items.is_empty());
        assert_eq!(page.page, usize::MAX);

        let empty = paginate(Vec::new(), usize::MAX, usize::MAX);
        assert!(empty.items.is_empty());
        assert_eq!(empty.total_pages, 0);
    }
}
