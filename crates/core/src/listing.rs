//! Catalog listing filters and their translation into backend queries.
//!
//! The products page accepts many filter selections at once but the backend
//! exposes one endpoint per selection kind. Exactly one endpoint is used per
//! fetch, chosen by [`PRECEDENCE`]:
//!
//! 1. free-text search
//! 2. category
//! 3. brand
//! 4. gender
//! 5. featured flag
//! 6. bestseller flag
//! 7. generic filter (fragrance family, price range)
//!
//! When nothing is selected the full catalog is listed. Lower-priority
//! selections are ignored, never combined.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::{BrandId, CategoryId, FragranceFamily, Gender};

/// Upper end of the price slider. A maximum at or above it means "unbounded".
pub const PRICE_CEILING: Decimal = Decimal::ONE_THOUSAND;

/// Raw query-string parameters of the products page.
///
/// Every field is optional and unvalidated; [`ListingFilters::from_params`]
/// drops anything blank or malformed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub category_id: Option<String>,
    pub brand: Option<String>,
    pub brand_id: Option<String>,
    pub gender: Option<String>,
    pub featured: Option<String>,
    pub bestseller: Option<String>,
    pub fragrance_family: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

/// Fragrance family and price bounds sent to the generic filter endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub fragrance_family: Option<FragranceFamily>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl FilterCriteria {
    /// Whether no criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fragrance_family.is_none() && self.min_price.is_none() && self.max_price.is_none()
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(family) = self.fragrance_family {
            params.push(("fragranceFamily", family.as_str().to_owned()));
        }
        if let Some(min) = self.min_price {
            params.push(("minPrice", min.normalize().to_string()));
        }
        if let Some(max) = self.max_price {
            params.push(("maxPrice", max.normalize().to_string()));
        }
        params
    }
}

/// Validated filter selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilters {
    pub search: Option<String>,
    pub category: Option<CategoryId>,
    pub brand: Option<BrandId>,
    pub gender: Option<Gender>,
    pub featured: bool,
    pub bestseller: bool,
    pub criteria: FilterCriteria,
}

impl ListingFilters {
    /// Build filters from raw query parameters.
    ///
    /// `category` wins over `categoryId` (and `brand` over `brandId`) when both
    /// parse. Flags are set only by the literal `true`. A minimum price of zero
    /// or less and a maximum at or above [`PRICE_CEILING`] are dropped, matching
    /// the untouched ends of the price slider.
    #[must_use]
    pub fn from_params(params: &ListingParams) -> Self {
        let criteria = FilterCriteria {
            fragrance_family: parse_opt(params.fragrance_family.as_deref()),
            min_price: parse_opt::<Decimal>(params.min_price.as_deref())
                .filter(|min| *min > Decimal::ZERO),
            max_price: parse_opt::<Decimal>(params.max_price.as_deref())
                .filter(|max| *max < PRICE_CEILING),
        };

        Self {
            search: non_blank(params.search.as_deref()).map(str::to_owned),
            category: parse_opt(params.category.as_deref())
                .or_else(|| parse_opt(params.category_id.as_deref())),
            brand: parse_opt(params.brand.as_deref())
                .or_else(|| parse_opt(params.brand_id.as_deref())),
            gender: parse_opt(params.gender.as_deref()),
            featured: is_true(params.featured.as_deref()),
            bestseller: is_true(params.bestseller.as_deref()),
            criteria,
        }
    }

    /// Whether any selection is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query() == ListingQuery::All
    }

    /// Resolve the single backend query for these selections.
    #[must_use]
    pub fn query(&self) -> ListingQuery {
        PRECEDENCE
            .iter()
            .find_map(|rule| rule(self))
            .unwrap_or(ListingQuery::All)
    }
}

/// One backend listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingQuery {
    Search(String),
    Category(CategoryId),
    Brand(BrandId),
    Gender(Gender),
    Featured,
    Bestsellers,
    Filter(FilterCriteria),
    All,
}

impl ListingQuery {
    /// Backend path for this query.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Search(_) => "/api/perfumes/search".to_owned(),
            Self::Category(id) => format!("/api/perfumes/category/{id}"),
            Self::Brand(id) => format!("/api/perfumes/brand/{id}"),
            Self::Gender(gender) => format!("/api/perfumes/gender/{gender}"),
            Self::Featured => "/api/perfumes/featured".to_owned(),
            Self::Bestsellers => "/api/perfumes/bestsellers".to_owned(),
            Self::Filter(_) => "/api/perfumes/filter".to_owned(),
            Self::All => "/api/perfumes".to_owned(),
        }
    }

    /// Query-string parameters for this query.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Search(name) => vec![("name", name.clone())],
            Self::Filter(criteria) => criteria.params(),
            _ => Vec::new(),
        }
    }

    /// Short name of the strategy, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Search(_) => "search",
            Self::Category(_) => "category",
            Self::Brand(_) => "brand",
            Self::Gender(_) => "gender",
            Self::Featured => "featured",
            Self::Bestsellers => "bestsellers",
            Self::Filter(_) => "filter",
            Self::All => "all",
        }
    }
}

type Rule = fn(&ListingFilters) -> Option<ListingQuery>;

/// Listing strategies, highest priority first. The first rule that matches
/// decides the query.
pub const PRECEDENCE: [Rule; 7] = [
    by_search,
    by_category,
    by_brand,
    by_gender,
    by_featured,
    by_bestseller,
    by_criteria,
];

fn by_search(filters: &ListingFilters) -> Option<ListingQuery> {
    filters.search.clone().map(ListingQuery::Search)
}

fn by_category(filters: &ListingFilters) -> Option<ListingQuery> {
    filters.category.map(ListingQuery::Category)
}

fn by_brand(filters: &ListingFilters) -> Option<ListingQuery> {
    filters.brand.map(ListingQuery::Brand)
}

fn by_gender(filters: &ListingFilters) -> Option<ListingQuery> {
    filters.gender.map(ListingQuery::Gender)
}

fn by_featured(filters: &ListingFilters) -> Option<ListingQuery> {
    filters.featured.then_some(ListingQuery::Featured)
}

fn by_bestseller(filters: &ListingFilters) -> Option<ListingQuery> {
    filters.bestseller.then_some(ListingQuery::Bestsellers)
}

fn by_criteria(filters: &ListingFilters) -> Option<ListingQuery> {
    (!filters.criteria.is_empty()).then_some(ListingQuery::Filter(filters.criteria))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_opt<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    non_blank(value).and_then(|v| v.parse().ok())
}

fn is_true(value: Option<&str>) -> bool {
    value == Some("true")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ListingParams {
        let mut params = ListingParams::default();
        for (key, value) in pairs {
            let value = Some((*value).to_owned());
            match *key {
                "search" => params.search = value,
                "category" => params.category = value,
                "categoryId" => params.category_id = value,
                "brand" => params.brand = value,
                "brandId" => params.brand_id = value,
                "gender" => params.gender = value,
                "featured" => params.featured = value,
                "bestseller" => params.bestseller = value,
                "fragranceFamily" => params.fragrance_family = value,
                "minPrice" => params.min_price = value,
                "maxPrice" => params.max_price = value,
                other => panic!("unknown param {other}"),
            }
        }
        params
    }

    fn query(pairs: &[(&str, &str)]) -> ListingQuery {
        ListingFilters::from_params(&params(pairs)).query()
    }

    #[test]
    fn test_category_beats_brand() {
        let q = query(&[("category", "5"), ("brand", "3")]);
        assert_eq!(q, ListingQuery::Category(CategoryId::new(5)));
        assert_eq!(q.path(), "/api/perfumes/category/5");
        assert!(q.params().is_empty());
    }

    #[test]
    fn test_search_beats_everything() {
        let q = query(&[
            ("search", " rose "),
            ("category", "5"),
            ("gender", "MALE"),
            ("featured", "true"),
        ]);
        assert_eq!(q, ListingQuery::Search("rose".to_owned()));
        assert_eq!(q.params(), vec![("name", "rose".to_owned())]);
    }

    #[test]
    fn test_full_precedence_order() {
        assert_eq!(
            query(&[("brandId", "3"), ("gender", "FEMALE")]),
            ListingQuery::Brand(BrandId::new(3))
        );
        assert_eq!(
            query(&[("gender", "female"), ("featured", "true")]).path(),
            "/api/perfumes/gender/FEMALE"
        );
        assert_eq!(
            query(&[("featured", "true"), ("bestseller", "true")]),
            ListingQuery::Featured
        );
        assert_eq!(
            query(&[("bestseller", "true"), ("fragranceFamily", "WOODY")]),
            ListingQuery::Bestsellers
        );
        assert_eq!(query(&[]), ListingQuery::All);
    }

    #[test]
    fn test_category_id_alias() {
        assert_eq!(
            query(&[("categoryId", "9")]),
            ListingQuery::Category(CategoryId::new(9))
        );
        assert_eq!(
            query(&[("category", "7"), ("categoryId", "9")]),
            ListingQuery::Category(CategoryId::new(7))
        );
    }

    #[test]
    fn test_flags_require_literal_true() {
        assert_eq!(query(&[("featured", "1")]), ListingQuery::All);
        assert_eq!(query(&[("bestseller", "yes")]), ListingQuery::All);
    }

    #[test]
    fn test_filter_criteria_params() {
        let q = query(&[
            ("fragranceFamily", "citrus"),
            ("minPrice", "50"),
            ("maxPrice", "250.50"),
        ]);
        assert_eq!(q.path(), "/api/perfumes/filter");
        assert_eq!(
            q.params(),
            vec![
                ("fragranceFamily", "CITRUS".to_owned()),
                ("minPrice", "50".to_owned()),
                ("maxPrice", "250.5".to_owned()),
            ]
        );
    }

    #[test]
    fn test_slider_bounds_mean_unbounded() {
        assert_eq!(
            query(&[("minPrice", "0"), ("maxPrice", "1000")]),
            ListingQuery::All
        );
        let q = query(&[("minPrice", "0"), ("maxPrice", "300")]);
        assert_eq!(q.params(), vec![("maxPrice", "300".to_owned())]);
    }

    #[test]
    fn test_malformed_values_are_dropped() {
        let filters = ListingFilters::from_params(&params(&[
            ("category", "perfume"),
            ("brand", ""),
            ("gender", "robot"),
            ("minPrice", "cheap"),
        ]));
        assert_eq!(filters, ListingFilters::default());
        assert!(filters.is_empty());
    }
}
