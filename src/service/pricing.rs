//! Catalog lookups and amount computation.

use std::sync::Arc;

use crate::clients::{CollaboratorError, Deadline, HairColorCatalog, HairStyleCatalog};
use crate::domain::{DiscountUnit, HairColorSnapshot, HairStyleSnapshot};
use crate::error::BookingError;

/// Catalog snapshots of a request together with the amount to pay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedItems {
    /// Hair style as returned by the catalog.
    pub hair_style: HairStyleSnapshot,
    /// Hair color, when one was requested.
    pub hair_color: Option<HairColorSnapshot>,
    /// Discounted style price plus color price.
    pub amount: i64,
}

/// Looks up the requested catalog items and prices them.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    hair_styles: Arc<dyn HairStyleCatalog>,
    hair_colors: Arc<dyn HairColorCatalog>,
    deadline: Deadline,
}

impl PricingEngine {
    /// Creates an engine over the two catalogs.
    #[must_use]
    pub fn new(
        hair_styles: Arc<dyn HairStyleCatalog>,
        hair_colors: Arc<dyn HairColorCatalog>,
        deadline: Deadline,
    ) -> Self {
        Self {
            hair_styles,
            hair_colors,
            deadline,
        }
    }

    /// Fetches the hair style and, if requested, the hair color, then
    /// computes the amount.
    ///
    /// # Errors
    ///
    /// Any catalog failure, including a missing item or a timeout, is
    /// reported as [`BookingError::CatalogLookupFailed`]. The underlying
    /// cause is logged.
    pub async fn price(
        &self,
        hair_style_id: i32,
        hair_color_id: Option<i32>,
    ) -> Result<PricedItems, BookingError> {
        let hair_style = self
            .deadline
            .bound("hair style catalog", self.hair_styles.get_hair_style(hair_style_id))
            .await
            .map_err(|e| catalog_failure("hair style", hair_style_id, &e))?;

        let hair_color = match hair_color_id {
            Some(id) => Some(
                self.deadline
                    .bound("hair color catalog", self.hair_colors.get_hair_color(id))
                    .await
                    .map_err(|e| catalog_failure("hair color", id, &e))?,
            ),
            None => None,
        };

        let amount = quote_amount(&hair_style, hair_color.as_ref());
        Ok(PricedItems {
            hair_style,
            hair_color,
            amount,
        })
    }
}

fn catalog_failure(item: &'static str, id: i32, cause: &CollaboratorError) -> BookingError {
    tracing::error!(item, id, error = %cause, "catalog lookup failed");
    BookingError::CatalogLookupFailed
}

/// Hair style price after its discount.
///
/// Percentage discounts truncate toward zero. Values are not clamped, so a
/// discount larger than the price yields a negative amount.
#[must_use]
pub fn discounted_price(style: &HairStyleSnapshot) -> i64 {
    match &style.discount {
        None => style.price,
        Some(discount) => match discount.unit {
            DiscountUnit::Percentage => {
                style
                    .price
                    .saturating_mul(100_i64.saturating_sub(discount.value))
                    / 100
            }
            DiscountUnit::Fixed => style.price.saturating_sub(discount.value),
        },
    }
}

/// Amount to pay for a style and an optional color.
#[must_use]
pub fn quote_amount(style: &HairStyleSnapshot, color: Option<&HairColorSnapshot>) -> i64 {
    discounted_price(style).saturating_add(color.map_or(0, |c| c.price))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::service::test_support::{FakeCatalog, TEST_DEADLINE, color, fixed, percent, style};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn engine(catalog: &Arc<FakeCatalog>) -> PricingEngine {
        PricingEngine::new(
            Arc::clone(catalog) as Arc<dyn HairStyleCatalog>,
            Arc::clone(catalog) as Arc<dyn HairColorCatalog>,
            TEST_DEADLINE,
        )
    }

    #[test]
    fn percentage_discount_plus_color() {
        let s = style(1, 200, percent(10));
        let c = color(3, 30);
        assert_eq!(quote_amount(&s, Some(&c)), 210);
    }

    #[test]
    fn fixed_discount_without_color() {
        assert_eq!(quote_amount(&style(2, 150, fixed(20)), None), 130);
    }

    #[test]
    fn no_discount_is_list_price() {
        assert_eq!(discounted_price(&style(1, 99, None)), 99);
    }

    #[test]
    fn percentage_truncates() {
        assert_eq!(discounted_price(&style(1, 99, percent(15))), 84);
    }

    #[test]
    fn oversized_discounts_go_negative() {
        assert_eq!(discounted_price(&style(1, 100, fixed(150))), -50);
        assert_eq!(discounted_price(&style(1, 100, percent(150))), -50);
    }

    #[tokio::test]
    async fn prices_style_and_color() {
        let catalog = Arc::new(FakeCatalog::new(
            vec![style(1, 200, percent(10))],
            vec![color(3, 30)],
        ));
        let Ok(priced) = engine(&catalog).price(1, Some(3)).await else {
            panic!("expected a price");
        };
        assert_eq!(priced.amount, 210);
        assert_eq!(priced.hair_color.map(|c| c.id), Some(3));
    }

    #[tokio::test]
    async fn skips_color_lookup_when_not_requested() {
        let catalog = Arc::new(FakeCatalog::new(vec![style(2, 150, fixed(20))], Vec::new()));
        let Ok(priced) = engine(&catalog).price(2, None).await else {
            panic!("expected a price");
        };
        assert_eq!(priced.amount, 130);
        assert!(priced.hair_color.is_none());
        assert_eq!(catalog.color_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_items_collapse_into_one_error() {
        let catalog = Arc::new(FakeCatalog::new(vec![style(1, 200, None)], Vec::new()));
        let result = engine(&catalog).price(7, None).await;
        assert!(matches!(result, Err(BookingError::CatalogLookupFailed)));
        let result = engine(&catalog).price(1, Some(8)).await;
        assert!(matches!(result, Err(BookingError::CatalogLookupFailed)));
    }

    #[tokio::test]
    async fn transport_failures_collapse_too() {
        let catalog = Arc::new(FakeCatalog {
            failure: Some(CollaboratorError::Transport("reset".to_string())),
            ..FakeCatalog::new(vec![style(1, 200, None)], Vec::new())
        });
        let result = engine(&catalog).price(1, None).await;
        assert!(matches!(result, Err(BookingError::CatalogLookupFailed)));
    }

    #[tokio::test(start_paused = true)]
    async fn timeouts_collapse_too() {
        let catalog = Arc::new(FakeCatalog {
            delay: Some(Duration::from_secs(60)),
            ..FakeCatalog::new(vec![style(1, 200, None)], Vec::new())
        });
        let result = engine(&catalog).price(1, None).await;
        assert!(matches!(result, Err(BookingError::CatalogLookupFailed)));
    }
}
