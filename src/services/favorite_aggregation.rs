//! Combined pagination over a user's favorites.
//!
//! Without a type filter the three groups are laid end to end, stores first,
//! then products, then offers, and one window of `size` items is cut out of
//! that sequence. With a filter only the selected group is paginated.

use crate::{
    error::{AppError, AppResult},
    models::FavoriteKind,
    routes::params::PageWindow,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouped<S, P, O> {
    pub stores: Vec<S>,
    pub products: Vec<P>,
    pub offers: Vec<O>,
}

impl<S, P, O> Default for Grouped<S, P, O> {
    fn default() -> Self {
        Self {
            stores: Vec::new(),
            products: Vec::new(),
            offers: Vec::new(),
        }
    }
}

impl<S, P, O> Grouped<S, P, O> {
    /// Number of items the given filter covers.
    pub fn total(&self, filter: Option<FavoriteKind>) -> usize {
        match filter {
            Some(FavoriteKind::Store) => self.stores.len(),
            Some(FavoriteKind::Product) => self.products.len(),
            Some(FavoriteKind::Offer) => self.offers.len(),
            None => self.stores.len() + self.products.len() + self.offers.len(),
        }
    }
}

/// `stores`, `products` or `offers`; absent or blank means all kinds.
pub fn parse_filter(raw: Option<&str>) -> AppResult<Option<FavoriteKind>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(tag) => match tag.to_ascii_lowercase().as_str() {
            "stores" => Ok(Some(FavoriteKind::Store)),
            "products" => Ok(Some(FavoriteKind::Product)),
            "offers" => Ok(Some(FavoriteKind::Offer)),
            _ => Err(AppError::bad_request(format!(
                "unknown favorite type '{tag}', expected stores, products or offers"
            ))),
        },
    }
}

pub fn paginate<S, P, O>(
    groups: Grouped<S, P, O>,
    filter: Option<FavoriteKind>,
    window: PageWindow,
) -> Grouped<S, P, O> {
    let start = window.offset();
    let end = start.saturating_add(window.size);

    match filter {
        Some(FavoriteKind::Store) => Grouped {
            stores: cut(groups.stores, 0, start, end),
            ..Grouped::default()
        },
        Some(FavoriteKind::Product) => Grouped {
            products: cut(groups.products, 0, start, end),
            ..Grouped::default()
        },
        Some(FavoriteKind::Offer) => Grouped {
            offers: cut(groups.offers, 0, start, end),
            ..Grouped::default()
        },
        None => {
            let products_at = groups.stores.len() as u64;
            let offers_at = products_at + groups.products.len() as u64;
            Grouped {
                stores: cut(groups.stores, 0, start, end),
                products: cut(groups.products, products_at, start, end),
                offers: cut(groups.offers, offers_at, start, end),
            }
        }
    }
}

/// Keep the part of a group, placed at `group_start` in the combined
/// sequence, that falls inside `[start, end)`.
fn cut<T>(items: Vec<T>, group_start: u64, start: u64, end: u64) -> Vec<T> {
    let group_end = group_start + items.len() as u64;
    let from = start.max(group_start);
    let to = end.min(group_end);
    if from >= to {
        return Vec::new();
    }
    items
        .into_iter()
        .skip((from - group_start) as usize)
        .take((to - from) as usize)
        .collect()
}
