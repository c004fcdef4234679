//! Movement catalog definitions and the line items recorded inside a closing.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Semantic bucket every movement resolves to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovementCategory {
    Revenue,
    Expense,
    Other,
}

impl fmt::Display for MovementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MovementCategory::Revenue => "Revenue",
            MovementCategory::Expense => "Expense",
            MovementCategory::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Named movement definition referenced by [`MovementItem::movement_type_id`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovementType {
    pub id: Uuid,
    pub name: String,
    pub category: MovementCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl MovementType {
    pub fn new(name: impl Into<String>, category: MovementCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            color: None,
            icon: None,
        }
    }
}

impl Identifiable for MovementType {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for MovementType {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.category)
    }
}

/// Payment channel used by a movement. Informational only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentMethod {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl PaymentMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon: None,
        }
    }
}

impl Identifiable for PaymentMethod {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// A single cash-flow line recorded within one closing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovementItem {
    pub id: Uuid,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    pub movement_type_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MovementItem {
    pub fn new(movement_type_id: Uuid, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            discount: None,
            movement_type_id,
            payment_method_id: None,
            description: None,
        }
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = Some(discount);
        self
    }

    pub fn with_payment_method(mut self, payment_method_id: Uuid) -> Self {
        self.payment_method_id = Some(payment_method_id);
        self
    }

    /// Discount applied to the movement, zero when none was recorded.
    pub fn discount_or_zero(&self) -> Decimal {
        self.discount.unwrap_or(Decimal::ZERO)
    }

    /// Amount recognized for the given category. Discounts only reduce revenue.
    pub fn recognized_amount(&self, category: MovementCategory) -> Decimal {
        match category {
            MovementCategory::Revenue => self.amount.saturating_sub(self.discount_or_zero()),
            MovementCategory::Expense | MovementCategory::Other => self.amount,
        }
    }
}

impl Identifiable for MovementItem {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Non-fatal notice that a movement's type could not be resolved.
///
/// The offending movement is left out of every total; the notice is returned
/// to the caller so the underlying record can be fixed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigurationIssue {
    pub movement_id: Uuid,
    pub movement_type_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_id: Option<Uuid>,
    pub message: String,
}

impl ConfigurationIssue {
    pub fn unresolved(
        movement: &MovementItem,
        closing_id: Option<Uuid>,
        reason: impl fmt::Display,
    ) -> Self {
        Self {
            movement_id: movement.id,
            movement_type_id: movement.movement_type_id,
            closing_id,
            message: format!("movement {} excluded from totals: {}", movement.id, reason),
        }
    }
}

impl fmt::Display for ConfigurationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
