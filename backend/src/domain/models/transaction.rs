//! An amount paired with an optional category, validated for sign
//! consistency.

use shared::CategoryType;
use uuid::Uuid;

use super::{Category, Money};
use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    sum: Money,
    category_id: Option<Uuid>,
}

impl Transaction {
    /// Negative sums require an expense category, positive sums an income
    /// category. A transaction may carry no category at all.
    pub fn create(sum: Money, category: Option<&Category>) -> Result<Self, DomainError> {
        if sum.is_zero() {
            return Err(DomainError::ZeroAmount);
        }

        let Some(category) = category else {
            return Ok(Self { sum, category_id: None });
        };

        if sum.is_negative() && category.category_type() != CategoryType::Expense {
            return Err(DomainError::ExpenseCategoryRequired);
        }

        if sum.is_positive() && category.category_type() != CategoryType::Income {
            return Err(DomainError::IncomeCategoryRequired);
        }

        Ok(Self {
            sum,
            category_id: Some(category.id()),
        })
    }

    pub fn sum(&self) -> Money {
        self.sum
    }

    pub fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }

}
