use crate::model::ActivationState;
use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub flavor: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub wholesale_price: Option<Decimal>,
    pub wholesale_min_quantity: Option<i32>,
    pub stock: i32,
    pub image_url: Option<String>,
    pub category_id: i32,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Result of pricing an order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub wholesale: bool,
}

impl Product {
    pub fn state(&self) -> ActivationState {
        ActivationState::from(self.active)
    }

    /// Wholesale tier, present only when both the price and the threshold are set.
    pub fn wholesale_tier(&self) -> Option<(Decimal, i32)> {
        self.wholesale_price.zip(self.wholesale_min_quantity)
    }

    pub fn has_wholesale(&self) -> bool {
        self.wholesale_tier().is_some()
    }

    /// Prices `quantity` units. Callers guarantee `quantity > 0`.
    pub fn quote(&self, quantity: i32) -> PriceQuote {
        let (unit_price, wholesale) = match self.wholesale_tier() {
            Some((price, min_quantity)) if quantity >= min_quantity => (price, true),
            _ => (self.price, false),
        };

        PriceQuote {
            product_id: self.id,
            quantity,
            unit_price,
            total_price: unit_price * Decimal::from(quantity),
            wholesale,
        }
    }
}

/// Rounds to cents, matching the NUMERIC(10,2) columns.
pub fn normalize_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn product(wholesale_price: Option<Decimal>, wholesale_min_quantity: Option<i32>) -> Product {
        let now = Utc::now().naive_utc();
        Product {
            id: 7,
            name: "Helado de fresa".into(),
            flavor: "Fresa".into(),
            description: None,
            price: d("100.00"),
            wholesale_price,
            wholesale_min_quantity,
            stock: 50,
            image_url: None,
            category_id: 1,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn below_threshold_uses_standard_price() {
        let quote = product(Some(d("80.00")), Some(10)).quote(9);

        assert_eq!(quote.unit_price, d("100.00"));
        assert_eq!(quote.total_price, d("900.00"));
        assert!(!quote.wholesale);
    }

    #[test]
    fn at_threshold_uses_wholesale_price() {
        let quote = product(Some(d("80.00")), Some(10)).quote(10);

        assert_eq!(quote.unit_price, d("80.00"));
        assert_eq!(quote.total_price, d("800.00"));
        assert!(quote.wholesale);
        assert_eq!(quote.product_id, 7);
        assert_eq!(quote.quantity, 10);
    }

    #[test]
    fn partial_wholesale_configuration_never_applies() {
        let no_threshold = product(Some(d("80.00")), None).quote(500);
        assert_eq!(no_threshold.unit_price, d("100.00"));
        assert!(!no_threshold.wholesale);

        let no_price = product(None, Some(10)).quote(500);
        assert_eq!(no_price.unit_price, d("100.00"));
        assert!(!no_price.wholesale);
    }

    #[test]
    fn totals_are_exact_decimals() {
        let mut p = product(None, None);
        p.price = d("0.10");

        assert_eq!(p.quote(3).total_price, d("0.30"));
    }

    #[test]
    fn money_is_rounded_to_cents() {
        assert_eq!(normalize_money(d("12.345")).to_string(), "12.35");
        assert_eq!(normalize_money(d("80")).to_string(), "80.00");
    }
}
