//! `models` command: browse the catalog with filters, sorting and paging.

use crate::cli::args::{ModelsArgs, OutputFormat};
use crate::core::filter::{Page, paginate, sort_models};
use crate::core::models::Model;
use crate::core::sync::ModelSynchronizer;
use crate::error::Result;
use crate::render::{emit, human};

/// Collect, filter, sort and page models for `args`.
///
/// With `--provider` the synchronizer may fetch (stale cache or
/// `--refresh`); without it only cached data is read.
///
/// # Errors
///
/// Unknown provider, or a fetch that failed with no cached fallback.
pub async fn query(sync: &ModelSynchronizer, args: &ModelsArgs) -> Result<Page> {
    sync.initialize();

    let models: Vec<Model> = match &args.provider {
        Some(provider) => sync.get_models(provider, args.refresh).await?,
        None => sync.get_all_cached().into_values().flatten().collect(),
    };

    let mut models = args.filter().apply(models);
    sort_models(&mut models, args.sort, args.direction());
    Ok(paginate(models, args.page, args.page_size))
}

/// Execute the models command.
///
/// # Errors
///
/// See [`query`].
pub async fn execute(
    args: &ModelsArgs,
    sync: &ModelSynchronizer,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<()> {
    let page = query(sync, args).await?;
    tracing::debug!(total = page.total, page = page.page, "Listing models");
    emit("models", page, format, pretty, |page| {
        human::render_models(page, no_color)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::SortField;
    use crate::core::models::ModelCapability;
    use crate::test_utils::SyncFixture;

    fn args() -> ModelsArgs {
        ModelsArgs {
            page: 1,
            page_size: 20,
            ..ModelsArgs::default()
        }
    }

    #[tokio::test]
    async fn all_providers_from_seeded_cache() {
        let fixture = SyncFixture::unreachable();
        let page = query(&fixture.sync, &args()).await.unwrap();
        assert!(page.total > 0);
        let providers: std::collections::BTreeSet<&str> =
            page.items.iter().map(|m| m.provider.as_str()).collect();
        assert!(providers.len() > 1);
    }

    #[tokio::test]
    async fn provider_capability_and_sort() {
        let fixture = SyncFixture::unreachable();
        let args = ModelsArgs {
            provider: Some("anthropic".to_string()),
            capabilities: vec![ModelCapability::Vision],
            sort: SortField::InputCost,
            desc: true,
            ..args()
        };
        let page = query(&fixture.sync, &args).await.unwrap();
        assert!(page.total > 0);
        assert!(page.items.iter().all(|m| m.provider == "anthropic"));
        assert!(page.items.iter().all(|m| m.has_capability(ModelCapability::Vision)));
        let costs: Vec<f64> = page
            .items
            .iter()
            .filter_map(|m| m.input_cost_per_million)
            .collect();
        assert!(costs.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn paging_past_the_end_is_empty() {
        let fixture = SyncFixture::unreachable();
        let args = ModelsArgs {
            page: 500,
            ..args()
        };
        let page = query(&fixture.sync, &args).await.unwrap();
        assert!(page.items.is_empty());
        assert!(page.total > 0);
    }
}
