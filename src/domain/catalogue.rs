//! Catalogue search, sorting, analytics and recommendations over an in-memory part list.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::similarity::ratio,
    models::{CartItem, CatalogueItem},
};

/// Minimum similarity for a fuzzy search hit.
pub const FUZZY_THRESHOLD: f64 = 0.6;
/// Parts at or below this stock (but not zero) count as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 5;
pub const MAX_RECOMMENDATIONS: usize = 4;
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Natural order on the number embedded in the part id.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    StockAsc,
    StockDesc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub items: Vec<CatalogueItem>,
    pub fuzzy: bool,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategorySummary {
    pub category: String,
    pub parts: usize,
    pub stock: u64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogueAnalytics {
    pub total_parts: usize,
    pub total_stock: u64,
    pub total_value: f64,
    pub average_price: f64,
    pub low_stock: Vec<CatalogueItem>,
    pub out_of_stock: Vec<CatalogueItem>,
    pub by_category: Vec<CategorySummary>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogueView {
    pub items: Vec<CatalogueItem>,
    /// True when no exact match existed and the similarity fallback produced `items`.
    pub fuzzy: bool,
    pub suggestions: Vec<String>,
    pub categories: Vec<String>,
    pub analytics: CatalogueAnalytics,
    pub recommendations: Vec<CatalogueItem>,
}

pub fn build_view(
    items: &[CatalogueItem],
    query: Option<&str>,
    category: Option<&str>,
    sort: SortMode,
    cart: &[CartItem],
) -> CatalogueView {
    let in_category = filter_category(items, category);
    let SearchResult {
        items: mut found,
        fuzzy,
        suggestions,
    } = search(&in_category, query.unwrap_or_default());
    sort_items(&mut found, sort);

    CatalogueView {
        items: found,
        fuzzy,
        suggestions,
        categories: categories(items),
        analytics: analytics(items),
        recommendations: recommend(items, cart),
    }
}

/// Case-insensitive category equality; empty or `all` keeps everything.
pub fn filter_category(items: &[CatalogueItem], category: Option<&str>) -> Vec<CatalogueItem> {
    let wanted = category.map(str::trim).unwrap_or_default().to_lowercase();
    if wanted.is_empty() || wanted == "all" {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.category.to_lowercase() == wanted)
        .cloned()
        .collect()
}

/// Substring search first; only when that finds nothing, fall back to similarity matching.
pub fn search(items: &[CatalogueItem], query: &str) -> SearchResult {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchResult {
            items: items.to_vec(),
            fuzzy: false,
            suggestions: Vec::new(),
        };
    }

    let exact: Vec<CatalogueItem> = items
        .iter()
        .filter(|item| contains_needle(item, &needle))
        .cloned()
        .collect();
    if !exact.is_empty() {
        return SearchResult {
            items: exact,
            fuzzy: false,
            suggestions: Vec::new(),
        };
    }

    let mut scored: Vec<(&CatalogueItem, f64)> = items
        .iter()
        .map(|item| (item, fuzzy_score(item, &needle)))
        .filter(|(_, score)| *score >= FUZZY_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut suggestions: Vec<String> = Vec::new();
    for (item, _) in &scored {
        if suggestions.len() == MAX_SUGGESTIONS {
            break;
        }
        if !suggestions.contains(&item.name) {
            suggestions.push(item.name.clone());
        }
    }

    SearchResult {
        items: scored.into_iter().map(|(item, _)| item.clone()).collect(),
        fuzzy: true,
        suggestions,
    }
}

fn contains_needle(item: &CatalogueItem, needle: &str) -> bool {
    [&item.part_id, &item.name, &item.category, &item.description]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn fuzzy_score(item: &CatalogueItem, needle: &str) -> f64 {
    let name = item.name.to_lowercase();
    let mut fields = vec![
        item.part_id.to_lowercase(),
        name.clone(),
        item.category.to_lowercase(),
    ];
    fields.extend(name.split_whitespace().map(str::to_string));
    fields
        .iter()
        .map(|field| ratio(needle, field))
        .fold(0.0, f64::max)
}

/// First run of ASCII digits in a part id, e.g. `P10-B` gives 10.
pub fn id_number(part_id: &str) -> Option<u64> {
    let digits: String = part_id
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

pub fn sort_items(items: &mut [CatalogueItem], mode: SortMode) {
    match mode {
        SortMode::Default => items.sort_by_cached_key(|item| {
            let number = id_number(&item.part_id);
            (number.is_none(), number.unwrap_or(0), item.part_id.to_lowercase())
        }),
        SortMode::PriceAsc => items.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortMode::PriceDesc => items.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortMode::NameAsc => items.sort_by_cached_key(|item| item.name.to_lowercase()),
        SortMode::NameDesc => {
            items.sort_by_cached_key(|item| std::cmp::Reverse(item.name.to_lowercase()))
        }
        SortMode::StockAsc => items.sort_by_key(|item| item.stock),
        SortMode::StockDesc => items.sort_by_key(|item| std::cmp::Reverse(item.stock)),
    }
}

pub fn categories(items: &[CatalogueItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.category.trim())
        .filter(|category| !category.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn analytics(items: &[CatalogueItem]) -> CatalogueAnalytics {
    let total_parts = items.len();
    let total_stock: u64 = items.iter().map(|item| u64::from(item.stock)).sum();
    let total_value: f64 = items.iter().map(stock_value).sum();
    let average_price = if total_parts == 0 {
        0.0
    } else {
        items.iter().map(|item| item.price).sum::<f64>() / total_parts as f64
    };

    let mut rollups: BTreeMap<String, CategorySummary> = BTreeMap::new();
    for item in items {
        let entry = rollups
            .entry(item.category.clone())
            .or_insert_with(|| CategorySummary {
                category: item.category.clone(),
                parts: 0,
                stock: 0,
                value: 0.0,
            });
        entry.parts += 1;
        entry.stock += u64::from(item.stock);
        entry.value += stock_value(item);
    }

    CatalogueAnalytics {
        total_parts,
        total_stock,
        total_value,
        average_price,
        low_stock: items
            .iter()
            .filter(|item| item.stock > 0 && item.stock <= LOW_STOCK_THRESHOLD)
            .cloned()
            .collect(),
        out_of_stock: items.iter().filter(|item| item.stock == 0).cloned().collect(),
        by_category: rollups.into_values().collect(),
    }
}

fn stock_value(item: &CatalogueItem) -> f64 {
    item.price * f64::from(item.stock)
}

/// Parts sharing a category with something in the cart, else the best-stocked parts.
pub fn recommend(items: &[CatalogueItem], cart: &[CartItem]) -> Vec<CatalogueItem> {
    let in_cart: HashSet<String> = cart
        .iter()
        .map(|line| line.item_name.to_lowercase())
        .collect();
    let cart_categories: HashSet<String> = items
        .iter()
        .filter(|item| in_cart.contains(&item.name.to_lowercase()))
        .map(|item| item.category.to_lowercase())
        .collect();

    let mut ordered = items.to_vec();
    sort_items(&mut ordered, SortMode::Default);

    let related: Vec<CatalogueItem> = ordered
        .iter()
        .filter(|item| {
            cart_categories.contains(&item.category.to_lowercase())
                && !in_cart.contains(&item.name.to_lowercase())
        })
        .take(MAX_RECOMMENDATIONS)
        .cloned()
        .collect();
    if !related.is_empty() {
        return related;
    }

    let mut in_stock: Vec<CatalogueItem> =
        ordered.into_iter().filter(|item| item.stock > 0).collect();
    in_stock.sort_by_key(|item| std::cmp::Reverse(item.stock));
    in_stock.truncate(MAX_RECOMMENDATIONS);
    in_stock
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(id: &str, name: &str, category: &str, price: f64, stock: u32) -> CatalogueItem {
        CatalogueItem {
            part_id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
            stock,
            description: format!("{name} for most models"),
            image: None,
        }
    }

    fn sample() -> Vec<CatalogueItem> {
        vec![
            part("P2", "Brake Pad", "Brakes", 40.0, 12),
            part("P10", "Oil Filter", "Engine", 8.5, 0),
            part("P1", "Brake Disc", "Brakes", 75.0, 3),
            part("P3", "Spark Plug", "Engine", 4.0, 50),
            part("P4", "Wiper Blade", "Body", 12.0, 7),
        ]
    }

    fn ids(items: &[CatalogueItem]) -> Vec<&str> {
        items.iter().map(|item| item.part_id.as_str()).collect()
    }

    #[test]
    fn default_sort_is_numeric() {
        let mut items = vec![
            part("P2", "a", "x", 1.0, 1),
            part("P10", "b", "x", 1.0, 1),
            part("P1", "c", "x", 1.0, 1),
        ];
        sort_items(&mut items, SortMode::Default);
        assert_eq!(ids(&items), ["P1", "P2", "P10"]);
    }

    #[test]
    fn ids_without_digits_sort_last() {
        let mut items = vec![part("MISC", "a", "x", 1.0, 1), part("P7", "b", "x", 1.0, 1)];
        sort_items(&mut items, SortMode::Default);
        assert_eq!(ids(&items), ["P7", "MISC"]);
    }

    #[test]
    fn named_sort_modes() {
        let mut items = sample();
        sort_items(&mut items, SortMode::PriceDesc);
        assert_eq!(items[0].part_id, "P1");
        sort_items(&mut items, SortMode::NameAsc);
        assert_eq!(items[0].name, "Brake Disc");
        sort_items(&mut items, SortMode::NameDesc);
        assert_eq!(items[0].name, "Wiper Blade");
        sort_items(&mut items, SortMode::StockAsc);
        assert_eq!(items[0].part_id, "P10");
        sort_items(&mut items, SortMode::StockDesc);
        assert_eq!(items[0].part_id, "P3");
        sort_items(&mut items, SortMode::PriceAsc);
        assert_eq!(items[0].part_id, "P3");
    }

    #[test]
    fn exact_search_is_case_insensitive_substring() {
        let result = search(&sample(), "BRAKE");
        assert!(!result.fuzzy);
        assert_eq!(result.items.len(), 2);
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn search_matches_description() {
        let result = search(&sample(), "most models");
        assert_eq!(result.items.len(), 5);
    }

    #[test]
    fn fuzzy_fallback_finds_misspelling_and_suggests_it() {
        let result = search(&sample(), "sprak plug");
        assert!(result.fuzzy);
        assert_eq!(result.items.first().map(|i| i.part_id.as_str()), Some("P3"));
        assert!(result.suggestions.contains(&"Spark Plug".to_string()));
    }

    #[test]
    fn unrelated_query_finds_nothing() {
        let result = search(&sample(), "zzzzqqq");
        assert!(result.fuzzy);
        assert!(result.items.is_empty());
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn category_filter() {
        assert_eq!(filter_category(&sample(), Some("brakes")).len(), 2);
        assert_eq!(filter_category(&sample(), Some("All")).len(), 5);
        assert_eq!(filter_category(&sample(), None).len(), 5);
    }

    #[test]
    fn analytics_rollups() {
        let stats = analytics(&sample());
        assert_eq!(stats.total_parts, 5);
        assert_eq!(stats.total_stock, 72);
        let expected_value = 40.0 * 12.0 + 75.0 * 3.0 + 4.0 * 50.0 + 12.0 * 7.0;
        assert!((stats.total_value - expected_value).abs() < 1e-9);
        assert!((stats.average_price - 139.5 / 5.0).abs() < 1e-9);
        assert_eq!(ids(&stats.low_stock), ["P1"]);
        assert_eq!(ids(&stats.out_of_stock), ["P10"]);
        let categories: Vec<&str> = stats
            .by_category
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(categories, ["Body", "Brakes", "Engine"]);
        assert_eq!(stats.by_category[1].parts, 2);
    }

    #[test]
    fn analytics_of_empty_catalogue() {
        let stats = analytics(&[]);
        assert_eq!(stats.total_parts, 0);
        assert_eq!(stats.average_price, 0.0);
    }

    #[test]
    fn recommends_same_category_excluding_cart() {
        let cart = vec![CartItem {
            item_name: "brake pad".into(),
            price: 40.0,
            quantity: 1,
        }];
        let picks = recommend(&sample(), &cart);
        assert_eq!(ids(&picks), ["P1"]);
    }

    #[test]
    fn recommendation_fallback_is_highest_stock() {
        let picks = recommend(&sample(), &[]);
        assert_eq!(ids(&picks), ["P3", "P2", "P4", "P1"]);
    }

    #[test]
    fn view_combines_everything() {
        let view = build_view(&sample(), Some("brake"), Some("brakes"), SortMode::Default, &[]);
        assert_eq!(ids(&view.items), ["P1", "P2"]);
        assert_eq!(view.categories, ["Body", "Brakes", "Engine"]);
        assert_eq!(view.analytics.total_parts, 5);
        assert_eq!(view.recommendations.len(), 4);
    }
}
