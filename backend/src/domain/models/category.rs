use shared::CategoryType;
use uuid::Uuid;

use crate::domain::DomainError;

pub const MAX_CATEGORY_NAME_LENGTH: usize = 50;

/// Named bucket for transactions. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: Uuid,
    account_id: Uuid,
    name: String,
    category_type: CategoryType,
}

impl Category {
    pub fn create(
        id: Uuid,
        account_id: Uuid,
        name: impl Into<String>,
        category_type: CategoryType,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let length = name.chars().count();

        if length == 0 || length > MAX_CATEGORY_NAME_LENGTH {
            return Err(DomainError::CategoryNameLength {
                length,
                max: MAX_CATEGORY_NAME_LENGTH,
            });
        }

        Ok(Self {
            id,
            account_id,
            name,
            category_type,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn account_id(&self) -> Uuid {
        self.account_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category_type(&self) -> CategoryType {
        self.category_type
    }
}
