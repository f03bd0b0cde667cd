//! # cronhost Engine
//!
//! An in-process implementation of the [`Scheduler`](cronhost_core::Scheduler)
//! boundary. Triggers are kept in memory and fired from a tick loop on the
//! tokio runtime; nothing is persisted.
//!
//! ```ignore
//! let scheduler = LocalScheduler::new("main", Duration::from_millis(250));
//! scheduler.start()?;
//! scheduler.schedule_trigger(detail, Trigger::now(&key, None)).await?;
//! scheduler.shutdown(true).await;
//! ```

mod factory;
mod local;
mod state;
mod store;

pub use factory::LocalSchedulerFactory;
pub use local::LocalScheduler;
pub use state::SchedulerState;
