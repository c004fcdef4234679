pub mod closing;
pub mod common;
pub mod goal;
pub mod movement;
pub mod report;
pub mod snapshot;
pub mod store;

pub use closing::{BalanceReconciliation, ClosingTotals, StoreClosing};
pub use common::{find_by_id, Displayable, Identifiable};
pub use goal::{GoalProgress, StoreGoal};
pub use movement::{
    ConfigurationIssue, MovementCategory, MovementItem, MovementType, PaymentMethod,
};
pub use report::{
    DateWindow, DreData, DreStoreRow, DreTotals, MomReport, MomRow, MonthYear, StoreRanking,
};
pub use snapshot::ClosingSnapshot;
pub use store::Store;
