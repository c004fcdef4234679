use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    closing::StoreClosing,
    common::find_by_id,
    goal::StoreGoal,
    movement::{MovementType, PaymentMethod},
    store::Store,
};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Immutable view of the records the reports are computed from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClosingSnapshot {
    #[serde(default)]
    pub stores: Vec<Store>,
    #[serde(default)]
    pub movement_types: Vec<MovementType>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(default)]
    pub closings: Vec<StoreClosing>,
    #[serde(default)]
    pub goals: Vec<StoreGoal>,
    #[serde(default = "ClosingSnapshot::schema_version_default")]
    pub schema_version: u8,
}

impl ClosingSnapshot {
    pub fn new() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            ..Self::default()
        }
    }

    pub fn add_store(&mut self, store: Store) -> Uuid {
        let id = store.id;
        self.stores.push(store);
        id
    }

    pub fn add_movement_type(&mut self, movement_type: MovementType) -> Uuid {
        let id = movement_type.id;
        self.movement_types.push(movement_type);
        id
    }

    pub fn add_payment_method(&mut self, method: PaymentMethod) -> Uuid {
        let id = method.id;
        self.payment_methods.push(method);
        id
    }

    pub fn add_closing(&mut self, closing: StoreClosing) -> Uuid {
        let id = closing.id;
        self.closings.push(closing);
        id
    }

    pub fn store(&self, id: Uuid) -> Option<&Store> {
        find_by_id(&self.stores, id)
    }

    pub fn closings_for(&self, store_id: Uuid) -> impl Iterator<Item = &StoreClosing> {
        self.closings
            .iter()
            .filter(move |closing| closing.store_id == store_id)
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn current_schema_version() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
