//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::Shopper;
use crate::models::{Brand, Category};
use crate::services::catalog;
use crate::views::{Layout, PerfumeCard, cards};

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub featured: Vec<PerfumeCard>,
    pub bestsellers: Vec<PerfumeCard>,
    pub brands: Vec<Brand>,
    pub categories: Vec<Category>,
    pub return_to: &'static str,
}

/// Display the home page.
#[instrument(skip(shopper))]
pub async fn home(shopper: Shopper) -> Result<HomeTemplate> {
    let catalog = catalog::home(&shopper.backend()).await?;

    Ok(HomeTemplate {
        layout: shopper.layout().await,
        featured: cards(&catalog.featured),
        bestsellers: cards(&catalog.bestsellers),
        brands: catalog.brands,
        categories: catalog.categories,
        return_to: "/",
    })
}
