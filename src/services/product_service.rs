use std::sync::OnceLock;

use regex::Regex;
use sqlx::PgPool;

use crate::db::price_queries;
use crate::errors::AppError;
use crate::models::{Product, ProductSummary};

// Matches .../product-name with an optional 2-letter locale segment
// (stockx.com/fr/some-slug).
fn slug_pattern() -> &'static Regex {
    static SLUG_PATTERN: OnceLock<Regex> = OnceLock::new();
    SLUG_PATTERN.get_or_init(|| {
        Regex::new(r"stockx\.com/(?:[a-z]{2}/)?([a-zA-Z0-9-]+)(?:\?|$|/)")
            .expect("slug pattern is valid")
    })
}

pub fn slug_from_url(url: &str) -> Option<String> {
    slug_pattern()
        .captures(url)
        .map(|captures| captures[1].to_string())
}

/// labubu-the-monsters-zimomo -> Labubu The Monsters Zimomo
pub fn slug_to_name(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_threshold(threshold: f64) -> Result<f64, AppError> {
    if !(1.0..=99.0).contains(&threshold) {
        return Err(AppError::Validation(
            "Invalid threshold (must be 1-99)".to_string(),
        ));
    }
    Ok(threshold)
}

/// Enrich a product with its last observed price, the display reference
/// (registration snapshot, else the oldest stored price) and the discount
/// against that reference. Display-only: the scan's dip logic uses the
/// rolling median instead.
pub async fn summarize(pool: &PgPool, product: Product) -> Result<ProductSummary, AppError> {
    let last_price = price_queries::fetch_latest(pool, product.id)
        .await?
        .map(|point| point.price);

    let reference_price = match product.reference_price {
        Some(reference) => Some(reference),
        None => price_queries::fetch_oldest_price(pool, product.id).await?,
    };

    let discount_pct = match (last_price, reference_price) {
        (Some(last), Some(reference)) if reference > 0.0 => {
            Some((reference - last) / reference * 100.0)
        }
        _ => None,
    };

    Ok(ProductSummary {
        id: product.id,
        slug: product.slug,
        name: product.name,
        dip_threshold: product.dip_threshold,
        created_at: product.created_at,
        last_price,
        reference_price,
        discount_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_slug_from_product_url() {
        assert_eq!(
            slug_from_url("https://stockx.com/labubu-the-monsters-zimomo"),
            Some("labubu-the-monsters-zimomo".to_string())
        );
    }

    #[test]
    fn extracts_slug_with_locale_segment() {
        assert_eq!(
            slug_from_url("https://stockx.com/fr/air-jordan-1-retro-high-og"),
            Some("air-jordan-1-retro-high-og".to_string())
        );
    }

    #[test]
    fn extracts_slug_before_query_string() {
        assert_eq!(
            slug_from_url("https://stockx.com/some-figure?country=FR&size=10"),
            Some("some-figure".to_string())
        );
    }

    #[test]
    fn extracts_slug_before_trailing_path() {
        assert_eq!(
            slug_from_url("https://stockx.com/some-figure/extras"),
            Some("some-figure".to_string())
        );
    }

    #[test]
    fn rejects_non_stockx_url() {
        assert_eq!(slug_from_url("https://example.com/some-figure"), None);
    }

    #[test]
    fn slug_to_name_capitalizes_each_word() {
        assert_eq!(
            slug_to_name("labubu-the-monsters-zimomo"),
            "Labubu The Monsters Zimomo"
        );
        assert_eq!(slug_to_name("zimomo"), "Zimomo");
    }

    #[test]
    fn threshold_bounds_are_inclusive() {
        assert!(validate_threshold(1.0).is_ok());
        assert!(validate_threshold(99.0).is_ok());
        assert!(validate_threshold(0.5).is_err());
        assert!(validate_threshold(99.5).is_err());
    }
}
