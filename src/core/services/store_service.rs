use uuid::Uuid;

use crate::domain::{common::find_by_id, store::Store};

use super::{ServiceError, ServiceResult};

/// Catalog rules for stores. At most one store may be the default.
pub struct StoreService;

impl StoreService {
    /// Marks `store_id` as the default store and clears the flag elsewhere.
    pub fn set_default(stores: &mut [Store], store_id: Uuid) -> ServiceResult<()> {
        if !stores.iter().any(|store| store.id == store_id) {
            return Err(ServiceError::StoreNotFound(store_id));
        }
        for store in stores.iter_mut() {
            store.is_default = store.id == store_id;
        }
        tracing::debug!(store = %store_id, "default store changed");
        Ok(())
    }

    pub fn default_store(stores: &[Store]) -> Option<&Store> {
        stores.iter().find(|store| store.is_default)
    }

    pub fn find(stores: &[Store], store_id: Uuid) -> ServiceResult<&Store> {
        find_by_id(stores, store_id).ok_or(ServiceError::StoreNotFound(store_id))
    }

    /// Rejects catalogs with more than one default store.
    pub fn validate_catalog(stores: &[Store]) -> ServiceResult<()> {
        let defaults = stores.iter().filter(|store| store.is_default).count();
        if defaults > 1 {
            return Err(ServiceError::Invalid(format!(
                "{} stores are marked as default; at most one is allowed",
                defaults
            )));
        }
        Ok(())
    }
}
