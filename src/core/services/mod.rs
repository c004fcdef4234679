pub mod category_service;
pub mod closing_service;
pub mod comparison_service;
pub mod dre_service;
pub mod goal_service;
pub mod ranking_service;
pub mod store_service;
pub mod totals_service;

pub use category_service::{CategoryCatalog, CategoryService};
pub use closing_service::{ClosingDraft, ClosingService, RegisteredClosing};
pub use comparison_service::ComparisonService;
pub use dre_service::DreService;
pub use goal_service::{GoalService, GoalUpsert};
pub use ranking_service::RankingService;
pub use store_service::StoreService;
pub use totals_service::{PaymentMethodTotal, TotalsOutcome, TotalsService};

use uuid::Uuid;

use crate::errors::ClosingError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] ClosingError),
    #[error("Unknown movement type: {0}")]
    UnknownMovementType(Uuid),
    #[error("Movement type {0} is defined more than once")]
    AmbiguousMovementType(Uuid),
    #[error("Store not found: {0}")]
    StoreNotFound(Uuid),
    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
pub(crate) mod fixtures;
