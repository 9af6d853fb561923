//! Sweet catalog entity and the value types used to create, change and
//! search sweets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};

/// Sweet domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Sweet {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ladoo")]
    pub name: String,
    #[schema(example = "Indian")]
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 2.5)]
    pub price: Decimal,
    #[schema(example = 3)]
    pub quantity: i32,
}

/// Validated input for a new sweet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub quantity: i32,
}

impl NewSweet {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
        quantity: i32,
    ) -> AppResult<Self> {
        let name = name.into();
        let category = category.into();

        if name.trim().is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        if category.trim().is_empty() {
            return Err(AppError::validation("Category is required"));
        }
        ensure_price(price)?;
        ensure_quantity(quantity)?;

        Ok(Self {
            name,
            category,
            price,
            quantity,
        })
    }
}

/// Partial update: `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweetChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
}

impl SweetChanges {
    pub fn validate(&self) -> AppResult<()> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(AppError::validation("Name must not be empty"));
        }
        if matches!(&self.category, Some(category) if category.trim().is_empty()) {
            return Err(AppError::validation("Category must not be empty"));
        }
        if let Some(price) = self.price {
            ensure_price(price)?;
        }
        if let Some(quantity) = self.quantity {
            ensure_quantity(quantity)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
    }
}

/// Search criteria, combined with logical AND.
///
/// Text filters are case-sensitive substring matches; price bounds are
/// inclusive. An absent filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweetFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl SweetFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// Name and category criteria only.
    pub fn matches_text(&self, sweet: &Sweet) -> bool {
        self.name
            .as_deref()
            .map_or(true, |needle| sweet.name.contains(needle))
            && self
                .category
                .as_deref()
                .map_or(true, |needle| sweet.category.contains(needle))
    }

    /// Every criterion, price bounds included.
    pub fn matches(&self, sweet: &Sweet) -> bool {
        self.matches_text(sweet)
            && self.min_price.map_or(true, |min| sweet.price >= min)
            && self.max_price.map_or(true, |max| sweet.price <= max)
    }
}

/// Validated positive restock amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestockAmount(i32);

impl RestockAmount {
    pub fn new(amount: i32) -> AppResult<Self> {
        if amount <= 0 {
            return Err(AppError::validation("Restock amount must be greater than 0"));
        }
        Ok(Self(amount))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

fn ensure_price(price: Decimal) -> AppResult<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::validation("Price must not be negative"));
    }
    Ok(())
}

fn ensure_quantity(quantity: i32) -> AppResult<()> {
    if quantity < 0 {
        return Err(AppError::validation("Quantity must not be negative"));
    }
    Ok(())
}
