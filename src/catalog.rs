//! 商品列表的筛选、排序与分页
//!
//! 全部在内存中同步完成，每次筛选条件或页码变化时对完整列表重新计算。
//! 步骤顺序固定：名称匹配 → 最低价 → 最高价 → 排序 → 分页。

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::api::ApiClient;
use crate::error::StoreResult;
use crate::request::HttpClient;
use crate::shared::protocol::{GetProduct, ListProducts};
use crate::shared::serde_helper::parse_decimal;
use crate::shared::{Product, ProductId};

// =========================================================
// 排序键
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// 保持筛选后的原顺序
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    NameAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Relevance,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::NameAsc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::NameAsc => "name-asc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Relevance => "Sort by: Relevance",
            SortKey::PriceAsc => "Price: Low to High",
            SortKey::PriceDesc => "Price: High to Low",
            SortKey::NameAsc => "Name: A → Z",
        }
    }

    /// 未知的键按 Relevance 处理
    pub fn parse(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl FromStr for SortKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or(())
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// 筛选条件
// =========================================================

/// 商品筛选条件
///
/// `min` / `max` 保留输入框原文，使用时再做数值转换，空串或非数字视为未设置。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub q: String,
    pub min: String,
    pub max: String,
    pub sort: SortKey,
}

impl ProductFilter {
    pub fn with_query(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Self::default()
        }
    }

    pub fn min_price(&self) -> Option<Decimal> {
        parse_decimal(&self.min)
    }

    pub fn max_price(&self) -> Option<Decimal> {
        parse_decimal(&self.max)
    }

    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.q.to_lowercase();
        if !product.name.to_lowercase().contains(&needle) {
            return false;
        }
        if let Some(min) = self.min_price() {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price() {
            if product.price > max {
                return false;
            }
        }
        true
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// 排序（稳定排序）
pub fn sort_products(products: &mut [Product], key: SortKey) {
    match key {
        SortKey::Relevance => {}
        SortKey::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::NameAsc => products.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
}

/// 按条件筛选并排序
pub fn filter_products(products: &[Product], filter: &ProductFilter) -> Vec<Product> {
    let mut list: Vec<Product> = products
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect();
    sort_products(&mut list, filter.sort);
    list
}

// =========================================================
// 分页
// =========================================================

/// 一页数据
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 实际页码（已夹取到合法范围，从 1 开始）
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// 总页数 = ceil(total / page_size)，至少为 1
pub fn page_count(total: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    total.div_ceil(size).max(1)
}

pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let size = page_size.max(1);
    let total_pages = page_count(items.len(), size);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * size;
    let end = (start + size).min(items.len());

    Page {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        page,
        total_pages,
        total_items: items.len(),
    }
}

/// 商品列表页的视图结果
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView {
    /// 筛选后的总数，用于 "N products found"
    pub matched: usize,
    pub page: Page<Product>,
}

pub fn catalog_view(
    products: &[Product],
    filter: &ProductFilter,
    page: usize,
    page_size: usize,
) -> CatalogView {
    let filtered = filter_products(products, filter);
    CatalogView {
        matched: filtered.len(),
        page: paginate(&filtered, page, page_size),
    }
}

// =========================================================
// 数据加载
// =========================================================

pub async fn load_products<C: HttpClient>(api: &ApiClient<C>) -> StoreResult<Vec<Product>> {
    api.send(&ListProducts)
        .await
        .map_err(|e| e.in_op("catalog.load_products"))
}

pub async fn load_product<C: HttpClient>(api: &ApiClient<C>, id: ProductId) -> StoreResult<Product> {
    api.send(&GetProduct { id })
        .await
        .map_err(|e| e.in_op_with("catalog.load_product", id.to_string()))
}

/// 首页精选：前 8 个商品
pub fn featured(products: &[Product]) -> Vec<Product> {
    products.iter().take(FEATURED_COUNT).cloned().collect()
}

pub const FEATURED_COUNT: usize = 8;

/// 商品详情页的购买数量，夹取到 [1, 库存]
pub fn clamp_quantity(requested: i64, stock: i64) -> i64 {
    requested.clamp(1, stock.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, price: i64) -> Product {
        Product {
            id,
            name: name.into(),
            description: String::new(),
            price: Decimal::from(price),
            stock: 5,
            image_url: None,
            created_at: None,
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product(1, "Laptop", 100),
            product(2, "mouse", 50),
            product(3, "Monitor", 200),
        ]
    }

    fn prices(list: &[Product]) -> Vec<i64> {
        list.iter()
            .map(|p| p.price.trunc().try_into().unwrap())
            .collect()
    }

    #[test]
    fn price_sorts_are_inverse() {
        let mut f = ProductFilter {
            sort: SortKey::PriceAsc,
            ..Default::default()
        };
        let asc = filter_products(&sample(), &f);
        assert_eq!(prices(&asc), vec![50, 100, 200]);

        f.sort = SortKey::PriceDesc;
        let desc = filter_products(&sample(), &f);
        assert_eq!(prices(&desc), vec![200, 100, 50]);

        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(reversed, desc);
    }

    #[test]
    fn min_price_is_coerced() {
        let f = ProductFilter {
            min: "60".into(),
            ..Default::default()
        };
        assert_eq!(prices(&filter_products(&sample(), &f)), vec![100, 200]);

        let f = ProductFilter {
            max: " 100 ".into(),
            ..Default::default()
        };
        assert_eq!(prices(&filter_products(&sample(), &f)), vec![100, 50]);
    }

    #[test]
    fn non_numeric_bounds_are_ignored() {
        let f = ProductFilter {
            min: "cheap".into(),
            max: "".into(),
            ..Default::default()
        };
        assert_eq!(filter_products(&sample(), &f).len(), 3);
    }

    #[test]
    fn query_is_case_insensitive_substring() {
        let f = ProductFilter::with_query("MO");
        let names: Vec<_> = filter_products(&sample(), &f)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["mouse", "Monitor"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let f = ProductFilter {
            q: "o".into(),
            min: "40".into(),
            max: "150".into(),
            sort: SortKey::NameAsc,
        };
        let once = filter_products(&sample(), &f);
        let twice = filter_products(&once, &f);
        assert_eq!(once, twice);
    }

    #[test]
    fn name_sort_folds_case_then_breaks_ties() {
        let list = vec![
            product(1, "beta", 1),
            product(2, "Alpha", 1),
            product(3, "alpha", 1),
        ];
        let f = ProductFilter {
            sort: SortKey::NameAsc,
            ..Default::default()
        };
        let names: Vec<_> = filter_products(&list, &f)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "alpha", "beta"]);
    }

    #[test]
    fn relevance_keeps_input_order() {
        let f = ProductFilter {
            sort: SortKey::parse("best-match"),
            ..Default::default()
        };
        assert_eq!(f.sort, SortKey::Relevance);
        assert_eq!(prices(&filter_products(&sample(), &f)), vec![100, 50, 200]);
    }

    #[test]
    fn sort_key_round_trips_wire_tokens() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(key.as_str()), key);
        }
    }

    #[test]
    fn page_count_is_ceiling_with_minimum_one() {
        assert_eq!(page_count(0, 12), 1);
        assert_eq!(page_count(12, 12), 1);
        assert_eq!(page_count(13, 12), 2);
        assert_eq!(page_count(25, 12), 3);
        for n in 1..60 {
            for p in 1..15 {
                assert_eq!(page_count(n, p), n.div_ceil(p));
            }
        }
    }

    #[test]
    fn page_is_clamped_into_range() {
        let items: Vec<usize> = (0..25).collect();
        let first = paginate(&items, 0, 12);
        assert_eq!(first.page, 1);
        assert_eq!(first.items.len(), 12);
        assert!(!first.has_prev());

        let last = paginate(&items, 99, 12);
        assert_eq!(last.page, 3);
        assert_eq!(last.items, vec![24]);
        assert!(!last.has_next());

        let empty = paginate::<usize>(&[], 4, 12);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 1);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn catalog_view_reports_match_count() {
        let view = catalog_view(&sample(), &ProductFilter::with_query("mo"), 1, 2);
        assert_eq!(view.matched, 2);
        assert_eq!(view.page.total_pages, 1);
    }

    #[test]
    fn quantity_is_clamped_to_stock() {
        assert_eq!(clamp_quantity(0, 5), 1);
        assert_eq!(clamp_quantity(9, 5), 5);
        assert_eq!(clamp_quantity(3, 0), 1);
    }
}
