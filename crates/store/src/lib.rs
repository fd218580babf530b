mod events;
mod filter;
mod ical;
mod notifications;
mod rosters;
mod schedules;
mod store;
mod tables;
mod teams;
mod users;

pub use filter::{Filter, FilterClause, Op};
pub use store::{require, Store};
pub use tables::Tables;
