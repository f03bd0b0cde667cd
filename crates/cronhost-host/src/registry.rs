//! Explicit registry of recurring jobs.
//!
//! Applications list their recurring jobs here at startup;
//! [`schedule_recurring_jobs`](crate::schedule_recurring_jobs) instantiates
//! and schedules every entry.

use std::any::type_name;
use std::sync::Arc;

use cronhost_core::{RecurringJob, Result, SchedulerError};

use crate::error::HostError;
use crate::services::ServiceProvider;

/// Builds a job from the registered services.
pub trait FromServices: Sized {
    fn from_services(services: &ServiceProvider) -> std::result::Result<Self, HostError>;
}

/// Factory producing a recurring job instance.
pub type JobFactory = Arc<
    dyn Fn(&ServiceProvider) -> std::result::Result<Arc<dyn RecurringJob>, HostError>
        + Send
        + Sync,
>;

/// Ordered list of `(id, factory)` entries. Ids are unique.
#[derive(Default, Clone)]
pub struct JobRegistry {
    entries: Vec<(String, JobFactory)>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `J` under its type name, built with [`FromServices`].
    pub fn register<J>(&mut self) -> Result<&mut Self>
    where
        J: RecurringJob + FromServices,
    {
        self.register_with(type_name::<J>(), |services| {
            let job = J::from_services(services)?;
            Ok(Arc::new(job) as Arc<dyn RecurringJob>)
        })
    }

    /// Register an arbitrary factory under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::AlreadyRegistered`] when `id` is taken.
    pub fn register_with<F>(&mut self, id: impl Into<String>, factory: F) -> Result<&mut Self>
    where
        F: Fn(&ServiceProvider) -> std::result::Result<Arc<dyn RecurringJob>, HostError>
            + Send
            + Sync
            + 'static,
    {
        let id = id.into();
        if self.contains(&id) {
            return Err(SchedulerError::AlreadyRegistered(id));
        }
        self.entries.push((id, Arc::new(factory)));
        Ok(self)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the job registered under `id`.
    pub fn instantiate(&self, id: &str, services: &ServiceProvider) -> Result<Arc<dyn RecurringJob>> {
        let (_, factory) = self
            .entries
            .iter()
            .find(|(existing, _)| existing == id)
            .ok_or_else(|| SchedulerError::Instantiation {
                id: id.to_string(),
                reason: "not registered".to_string(),
            })?;
        factory(services).map_err(|e| SchedulerError::Instantiation {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JobFactory)> + '_ {
        self.entries.iter().map(|(id, factory)| (id.as_str(), factory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cronhost_config::Configuration;
    use cronhost_core::{Job, JobExecutionContext, JobExecutionError, JobKey, Trigger};

    use crate::services::ServiceCollection;

    struct Greeting(String);

    struct Hello {
        greeting: Arc<Greeting>,
    }

    #[async_trait]
    impl Job for Hello {
        fn key(&self) -> JobKey {
            JobKey::new("Hello", "Tests")
        }

        async fn execute(
            &self,
            _ctx: &JobExecutionContext,
        ) -> std::result::Result<(), JobExecutionError> {
            Ok(())
        }
    }

    impl RecurringJob for Hello {
        fn manual_triggers(&self, _key: &JobKey) -> Vec<Trigger> {
            Vec::new()
        }
    }

    impl FromServices for Hello {
        fn from_services(services: &ServiceProvider) -> std::result::Result<Self, HostError> {
            Ok(Self {
                greeting: services.require::<Greeting>()?,
            })
        }
    }

    #[test]
    fn test_register_uses_type_name() {
        let mut registry = JobRegistry::new();
        registry.register::<Hello>().unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.ids()[0].ends_with("Hello"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut registry = JobRegistry::new();
        registry.register::<Hello>().unwrap();
        let result = registry.register::<Hello>();
        assert!(matches!(result, Err(SchedulerError::AlreadyRegistered(_))));
    }

    #[test]
    fn test_iteration_keeps_registration_order() {
        let mut registry = JobRegistry::new();
        for id in ["c", "a", "b"] {
            registry
                .register_with(id, |_| Err(HostError::MissingService("unused".to_string())))
                .unwrap();
        }
        let ids: Vec<_> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_instantiate_resolves_dependencies() {
        let mut services = ServiceCollection::new(Configuration::default());
        services.add_singleton(Greeting("hi".to_string()));
        let app = services.build();

        let mut registry = JobRegistry::new();
        registry.register::<Hello>().unwrap();
        let id = registry.ids()[0].to_string();

        let job = registry.instantiate(&id, app.services()).unwrap();
        assert_eq!(job.key(), JobKey::new("Hello", "Tests"));
    }

    #[test]
    fn test_instantiate_reports_missing_dependency() {
        let app = ServiceCollection::new(Configuration::default()).build();
        let mut registry = JobRegistry::new();
        registry.register::<Hello>().unwrap();
        let id = registry.ids()[0].to_string();

        let err = match registry.instantiate(&id, app.services()) {
            Err(err) => err,
            Ok(_) => panic!("instantiation should fail"),
        };
        assert!(matches!(err, SchedulerError::Instantiation { .. }));
        assert!(err.to_string().contains("Greeting"));
    }

    #[test]
    fn test_instantiate_unknown_id() {
        let app = ServiceCollection::new(Configuration::default()).build();
        let registry = JobRegistry::new();
        assert!(registry.instantiate("missing", app.services()).is_err());
    }

    #[test]
    fn test_greeting_is_shared() {
        let mut services = ServiceCollection::new(Configuration::default());
        services.add_singleton(Greeting("hi".to_string()));
        let app = services.build();
        let hello = Hello::from_services(app.services()).unwrap();
        assert_eq!(hello.greeting.0, "hi");
    }
}
