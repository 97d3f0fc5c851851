//! Services that apply inventory rules and persist the outcome.
//!
//! Services hold no state; the inventory and the stores they act on are
//! passed in by the caller that owns them.

mod adjustment;
mod order;
mod write_off;

pub use adjustment::{ADJUSTMENT_REASON, AdjustmentResult, AdjustmentRow, InventoryAdjustmentService};
pub use order::{OrderOutcome, OrderService};
pub use write_off::{WriteOffOutcome, WriteOffService};
