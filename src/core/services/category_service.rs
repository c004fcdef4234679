use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::domain::movement::{MovementCategory, MovementType};

use super::{ServiceError, ServiceResult};

/// Resolves movement type references to their semantic category.
pub struct CategoryService;

impl CategoryService {
    /// Resolves a single reference against the movement type catalog.
    pub fn resolve(
        movement_type_id: Uuid,
        movement_types: &[MovementType],
    ) -> ServiceResult<MovementCategory> {
        Self::catalog(movement_types).resolve(movement_type_id)
    }

    /// Builds a lookup for repeated resolution inside aggregation loops.
    pub fn catalog(movement_types: &[MovementType]) -> CategoryCatalog {
        let mut categories = HashMap::with_capacity(movement_types.len());
        let mut conflicting = HashSet::new();
        for movement_type in movement_types {
            match categories.insert(movement_type.id, movement_type.category) {
                Some(previous) if previous != movement_type.category => {
                    conflicting.insert(movement_type.id);
                }
                _ => {}
            }
        }
        if !conflicting.is_empty() {
            tracing::warn!(
                count = conflicting.len(),
                "movement type catalog defines conflicting categories for the same id"
            );
        }
        CategoryCatalog {
            categories,
            conflicting,
        }
    }
}

/// Id-to-category lookup built once per computation.
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    categories: HashMap<Uuid, MovementCategory>,
    conflicting: HashSet<Uuid>,
}

impl CategoryCatalog {
    pub fn resolve(&self, movement_type_id: Uuid) -> ServiceResult<MovementCategory> {
        if self.conflicting.contains(&movement_type_id) {
            return Err(ServiceError::AmbiguousMovementType(movement_type_id));
        }
        self.categories
            .get(&movement_type_id)
            .copied()
            .ok_or(ServiceError::UnknownMovementType(movement_type_id))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
