//! Filtering of clothing and shoe lists, and a live filtered view that
//! recomputes whenever the item list or the filter changes.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::models::{ClothingItem, ShoeItem};
use shared::{ClothesFilter, ShoesFilter};

/// Criteria that can be checked against a single catalog item
pub trait CatalogFilter<T> {
    fn matches(&self, item: &T) -> bool;
}

/// Items matching `filter`, in their original order
pub fn apply_filter<T: Clone, F: CatalogFilter<T>>(items: &[T], filter: &F) -> Vec<T> {
    items.iter().filter(|item| filter.matches(item)).cloned().collect()
}

fn normalized(text: &Option<String>) -> Option<String> {
    text.as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn contains(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(needle))
}

fn tag_matches(field: Option<&str>, wanted: &Option<String>) -> bool {
    match normalized(wanted) {
        Some(wanted) => field.is_some_and(|value| value.trim().to_lowercase() == wanted),
        None => true,
    }
}

fn id_matches(field: Option<i64>, wanted: Option<i64>) -> bool {
    wanted.map_or(true, |wanted| field == Some(wanted))
}

impl CatalogFilter<ClothingItem> for ClothesFilter {
    fn matches(&self, item: &ClothingItem) -> bool {
        let query_matches = match normalized(&self.query) {
            Some(query) => {
                contains(Some(&item.name), &query) || contains(item.color.as_deref(), &query)
            }
            None => true,
        };

        query_matches
            && tag_matches(Some(&item.category), &self.category)
            && tag_matches(Some(&item.season), &self.season)
            && id_matches(item.wardrobe_id, self.wardrobe_id)
            && id_matches(item.user_id, self.user_id)
    }
}

impl CatalogFilter<ShoeItem> for ShoesFilter {
    fn matches(&self, item: &ShoeItem) -> bool {
        let query_matches = match normalized(&self.query) {
            Some(query) => {
                contains(Some(&item.name), &query)
                    || contains(item.brand.as_deref(), &query)
                    || contains(item.color.as_deref(), &query)
            }
            None => true,
        };

        query_matches
            && tag_matches(item.shoe_type.as_deref(), &self.shoe_type)
            && tag_matches(item.season.as_deref(), &self.season)
            && id_matches(item.wardrobe_id, self.wardrobe_id)
            && id_matches(item.user_id, self.user_id)
    }
}

/// Latest item list combined with the latest filter.
///
/// The view owns a background task that waits on both inputs and publishes
/// the filtered list whenever either one changes. The task stops when both
/// inputs are closed or the view is dropped.
pub struct CatalogView<T> {
    output: watch::Receiver<Vec<T>>,
    task: JoinHandle<()>,
}

impl<T> CatalogView<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F>(mut items: watch::Receiver<Vec<T>>, mut filter: watch::Receiver<F>) -> Self
    where
        F: CatalogFilter<T> + Clone + Send + Sync + 'static,
    {
        let initial = apply_filter(&items.borrow_and_update(), &*filter.borrow_and_update());
        let (sender, output) = watch::channel(initial);

        let task = tokio::spawn(async move {
            let mut items_open = true;
            let mut filter_open = true;

            while items_open || filter_open {
                tokio::select! {
                    changed = items.changed(), if items_open => {
                        if changed.is_err() {
                            items_open = false;
                            continue;
                        }
                    }
                    changed = filter.changed(), if filter_open => {
                        if changed.is_err() {
                            filter_open = false;
                            continue;
                        }
                    }
                }

                let current_filter = filter.borrow_and_update().clone();
                let filtered = apply_filter(&items.borrow_and_update(), &current_filter);
                debug!("Catalog view now shows {} items", filtered.len());
                if sender.send(filtered).is_err() {
                    break;
                }
            }
        });

        Self { output, task }
    }

    /// Filtered list as of now
    pub fn current(&self) -> Vec<T> {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.output.clone()
    }
}

impl<T> Drop for CatalogView<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
