//! # cronhost Host
//!
//! Wires jobs into an application:
//!
//! - [`ServiceCollection`] / [`ServiceProvider`] - a small typed service container
//! - [`ServiceCollection::add_scheduler`] - registers the engine and its hosted service
//! - [`App`] - starts and stops hosted services
//! - [`JobRegistry`] - explicit list of recurring job factories
//! - [`schedule_recurring_jobs`] - schedules every registered recurring job
//!
//! ```ignore
//! let mut services = ServiceCollection::new(config);
//! services.add_scheduler(settings)?;
//! let app = services.build();
//!
//! let mut registry = JobRegistry::new();
//! registry.register::<DailyReport>()?;
//!
//! app.start().await?;
//! schedule_recurring_jobs(app.services(), &registry).await?;
//! ```

mod app;
mod bootstrap;
mod error;
mod hosted;
mod registry;
mod services;

pub use app::{App, HostState, ShutdownSignal};
pub use bootstrap::{schedule_recurring_jobs, ScheduleReport};
pub use error::HostError;
pub use hosted::{priority, HostedService, SchedulerHostedService};
pub use registry::{FromServices, JobFactory, JobRegistry};
pub use services::{ServiceCollection, ServiceProvider};
