use uuid::Uuid;

use super::Money;

/// A user's account. Entries and flows reference it by id and are loaded
/// separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    id: Uuid,
    basis_sum: Money,
}

impl Account {
    /// `id` is the owning user's id
    pub fn create(id: Uuid, basis_sum: Money) -> Self {
        Self { id, basis_sum }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn basis_sum(&self) -> Money {
        self.basis_sum
    }
}
