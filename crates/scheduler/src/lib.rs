pub mod default;
pub mod horizon;
pub mod preview;
pub mod round_robin;
pub mod run_loop;

pub use horizon::{shifts_for_schedule, Shift};
pub use preview::preview_schedule;
pub use run_loop::run_loop;
