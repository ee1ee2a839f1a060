//! Display data for templates.
//!
//! Templates only format what these views hand them; every price string and
//! badge is computed here from the backend models.

use perfume_shop_core::listing::PRICE_CEILING;
use perfume_shop_core::{FragranceFamily, Gender, ListingFilters, OrderStatus, Stars, UserRole};

use crate::flash::Toast;
use crate::models::{Brand, Cart, CartItem, Category, Order, OrderItem, Perfume, Rating, User};

/// Shared page chrome: header, cart badge, notifications.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub user: Option<UserView>,
    pub cart_count: u32,
    pub toasts: Vec<Toast>,
}

impl Layout {
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

/// The signed-in shopper as shown in the header and profile form.
#[derive(Debug, Clone)]
pub struct UserView {
    pub first_name: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub is_admin: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name().to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
            is_admin: user.role == UserRole::Admin,
        }
    }
}

/// Number of filled stars for an average rating.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn filled_stars(average: f64) -> u8 {
    if !average.is_finite() || average <= 0.0 {
        return 0;
    }
    average.floor().min(f64::from(Stars::MAX)) as u8
}

/// CSS classes for a row of five stars with the first `filled` lit.
#[must_use]
pub fn star_row(filled: u8) -> Vec<&'static str> {
    (Stars::MIN..=Stars::MAX)
        .map(|n| if n <= filled { "star star-on" } else { "star" })
        .collect()
}

// =============================================================================
// Perfumes
// =============================================================================

/// A perfume card in a grid.
#[derive(Debug, Clone)]
pub struct PerfumeCard {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub image_url: Option<String>,
    pub price: String,
    pub original_price: Option<String>,
    pub badge: Option<String>,
    pub stars: u8,
    pub rating_count: u32,
    pub favorite: bool,
    pub featured: bool,
    pub bestseller: bool,
}

impl From<&Perfume> for PerfumeCard {
    fn from(perfume: &Perfume) -> Self {
        let pricing = perfume.pricing();
        Self {
            id: perfume.id.to_string(),
            name: perfume.name.clone(),
            brand: perfume.brand_name().to_string(),
            image_url: perfume.image_url.clone(),
            price: pricing.effective().display(),
            original_price: pricing.has_discount().then(|| pricing.price.display()),
            badge: pricing.badge(),
            stars: filled_stars(perfume.average_rating),
            rating_count: perfume.rating_count,
            favorite: perfume.favorite,
            featured: perfume.featured,
            bestseller: perfume.bestseller,
        }
    }
}

impl PerfumeCard {
    #[must_use]
    pub fn star_row(&self) -> Vec<&'static str> {
        star_row(self.stars)
    }
}

/// Cards for a list of perfumes.
#[must_use]
pub fn cards(perfumes: &[Perfume]) -> Vec<PerfumeCard> {
    perfumes.iter().map(PerfumeCard::from).collect()
}

/// The product detail panel.
#[derive(Debug, Clone)]
pub struct PerfumeDetail {
    pub card: PerfumeCard,
    pub description: String,
    pub category: Option<String>,
    pub volume: Option<String>,
    pub gender: Option<&'static str>,
    pub fragrance_family: Option<&'static str>,
    pub stock: i64,
    pub in_stock: bool,
    pub can_rate: bool,
}

impl From<&Perfume> for PerfumeDetail {
    fn from(perfume: &Perfume) -> Self {
        Self {
            card: PerfumeCard::from(perfume),
            description: perfume
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "No description available for this perfume.".to_string()),
            category: perfume.category.as_ref().map(|c| c.name.clone()),
            volume: perfume.volume_label(),
            gender: perfume.gender.map(Gender::label),
            fragrance_family: perfume.fragrance_family.map(FragranceFamily::label),
            stock: perfume.stock(),
            in_stock: perfume.stock() > 0,
            can_rate: perfume.can_rate,
        }
    }
}

// =============================================================================
// Filters
// =============================================================================

/// One selectable filter value.
#[derive(Debug, Clone)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// The products page filter panel, echoing the active selections.
#[derive(Debug, Clone)]
pub struct FilterPanel {
    pub search: String,
    pub brands: Vec<FilterOption>,
    pub categories: Vec<FilterOption>,
    pub genders: Vec<FilterOption>,
    pub families: Vec<FilterOption>,
    pub min_price: String,
    pub max_price: String,
    pub featured: bool,
    pub bestseller: bool,
    pub active: bool,
}

impl FilterPanel {
    #[must_use]
    pub fn new(filters: &ListingFilters, brands: &[Brand], categories: &[Category]) -> Self {
        let criteria = &filters.criteria;
        Self {
            search: filters.search.clone().unwrap_or_default(),
            brands: brands
                .iter()
                .map(|brand| FilterOption {
                    value: brand.id.to_string(),
                    label: brand.name.clone(),
                    selected: filters.brand == Some(brand.id),
                })
                .collect(),
            categories: categories
                .iter()
                .map(|category| FilterOption {
                    value: category.id.to_string(),
                    label: category.name.clone(),
                    selected: filters.category == Some(category.id),
                })
                .collect(),
            genders: Gender::ALL
                .iter()
                .map(|gender| FilterOption {
                    value: gender.as_str().to_string(),
                    label: gender.label().to_string(),
                    selected: filters.gender == Some(*gender),
                })
                .collect(),
            families: FragranceFamily::ALL
                .iter()
                .map(|family| FilterOption {
                    value: family.as_str().to_string(),
                    label: family.label().to_string(),
                    selected: criteria.fragrance_family == Some(*family),
                })
                .collect(),
            min_price: criteria
                .min_price
                .map_or_else(|| "0".to_string(), |min| min.normalize().to_string()),
            max_price: criteria
                .max_price
                .unwrap_or(PRICE_CEILING)
                .normalize()
                .to_string(),
            featured: filters.featured,
            bestseller: filters.bestseller,
            active: !filters.is_empty(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One cart line.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub perfume_id: String,
    pub name: String,
    pub brand: String,
    pub image_url: Option<String>,
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
    /// Quantity after pressing "-"; `None` at 1 (use remove instead).
    pub decrement: Option<u32>,
    pub increment: u32,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            perfume_id: item.perfume.id.to_string(),
            name: item.perfume.name.clone(),
            brand: item.perfume.brand_name().to_string(),
            image_url: item.perfume.image_url.clone(),
            unit_price: item.perfume.pricing().effective().display(),
            quantity: item.quantity,
            subtotal: item.subtotal.display(),
            decrement: (item.quantity > 1).then(|| item.quantity - 1),
            increment: item.quantity.saturating_add(1),
        }
    }
}

/// The cart page and checkout summary.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_items: u32,
    pub total_price: String,
}

impl CartView {
    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            total_items: 0,
            total_price: "$0.00".to_string(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Option<&Cart>> for CartView {
    fn from(cart: Option<&Cart>) -> Self {
        cart.map_or_else(Self::empty, |cart| Self {
            lines: cart.items.iter().map(CartLineView::from).collect(),
            total_items: cart.total_items,
            total_price: cart.total_price.display(),
        })
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub product_name: String,
    pub brand_name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub subtotal: String,
}

impl From<&OrderItem> for OrderLineView {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_name: item.product_name.clone(),
            brand_name: item.brand_name.clone().unwrap_or_default(),
            quantity: item.quantity,
            unit_price: item.unit_price.display(),
            subtotal: item.subtotal.display(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub status: &'static str,
    pub status_slug: &'static str,
    pub placed_on: String,
    pub total: String,
    pub lines: Vec<OrderLineView>,
    pub delivery_address: String,
    pub whatsapp_number: String,
    pub notes: Option<String>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            status: order.status.label(),
            status_slug: order.status.slug(),
            placed_on: order.created_at.as_deref().map(format_date).unwrap_or_default(),
            total: order.total_amount.display(),
            lines: order.items.iter().map(OrderLineView::from).collect(),
            delivery_address: order.delivery_address.clone().unwrap_or_default(),
            whatsapp_number: order.whatsapp_number.clone().unwrap_or_default(),
            notes: order.customer_notes.clone().filter(|n| !n.trim().is_empty()),
        }
    }
}

impl OrderView {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status_slug == OrderStatus::Pending.slug()
    }
}

/// Render a backend timestamp as a calendar date.
///
/// Accepts RFC 3339 and the backend's zone-less `LocalDateTime` form; anything
/// else is shown as sent.
#[must_use]
pub fn format_date(raw: &str) -> String {
    let parsed = chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"));
    parsed.map_or_else(|_| raw.to_string(), |dt| dt.format("%B %-d, %Y").to_string())
}

// =============================================================================
// Ratings
// =============================================================================

#[derive(Debug, Clone)]
pub struct RatingView {
    pub user_name: String,
    pub stars: u8,
    pub comment: String,
    pub date: String,
}

impl From<&Rating> for RatingView {
    fn from(rating: &Rating) -> Self {
        Self {
            user_name: rating
                .user_name
                .clone()
                .unwrap_or_else(|| "Anonymous".to_string()),
            stars: rating.rating.get(),
            comment: rating.comment.clone().unwrap_or_default(),
            date: rating.created_at.as_deref().map(format_date).unwrap_or_default(),
        }
    }
}

impl RatingView {
    #[must_use]
    pub fn star_row(&self) -> Vec<&'static str> {
        star_row(self.stars)
    }
}

/// One radio button of the rating form.
#[derive(Debug, Clone, Copy)]
pub struct StarChoice {
    pub value: u8,
    pub checked: bool,
}

/// The review section of a product page.
#[derive(Debug, Clone)]
pub struct RatingPanel {
    pub ratings: Vec<RatingView>,
    pub mine: Option<RatingView>,
    /// Whether the rating form is shown.
    pub can_rate: bool,
}

impl RatingPanel {
    /// Heading of the rating form.
    #[must_use]
    pub const fn form_title(&self) -> &'static str {
        if self.mine.is_some() {
            "Update Your Review"
        } else {
            "Write a Review"
        }
    }

    /// Star pre-selected in the form.
    #[must_use]
    pub fn selected_stars(&self) -> u8 {
        self.mine.as_ref().map_or(0, |mine| mine.stars)
    }

    /// Radio buttons of the form, the shopper's current rating checked.
    #[must_use]
    pub fn star_choices(&self) -> Vec<StarChoice> {
        let selected = self.selected_stars();
        (Stars::MIN..=Stars::MAX)
            .map(|value| StarChoice {
                value,
                checked: value == selected,
            })
            .collect()
    }

    /// Comment pre-filled in the form.
    #[must_use]
    pub fn draft_comment(&self) -> &str {
        self.mine.as_ref().map_or("", |mine| mine.comment.as_str())
    }
}
