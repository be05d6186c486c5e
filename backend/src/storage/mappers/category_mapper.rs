use crate::domain::models::Category;
use crate::domain::DomainError;

pub struct CategoryMapper;

impl CategoryMapper {
    pub fn to_domain(record: &shared::Category) -> Result<Category, DomainError> {
        Category::create(record.id, record.account_id, record.name.as_str(), record.category_type)
    }

    pub fn to_dto(category: &Category) -> shared::Category {
        shared::Category {
            id: category.id(),
            account_id: category.account_id(),
            name: category.name().to_string(),
            category_type: category.category_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CategoryType;
    use uuid::Uuid;

    #[test]
    fn test_invalid_name_is_rejected_on_load() {
        let record = shared::Category {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            name: String::new(),
            category_type: CategoryType::Income,
        };

        assert!(matches!(
            CategoryMapper::to_domain(&record),
            Err(DomainError::CategoryNameLength { length: 0, .. })
        ));
    }
}
