//! A small typed service container.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use cronhost_config::{ConfigSource, Configuration, SchedulerSettings};
use cronhost_core::SchedulerFactory;
use cronhost_engine::{LocalScheduler, LocalSchedulerFactory};

use crate::app::App;
use crate::error::HostError;
use crate::hosted::{HostedService, SchedulerHostedService};

type Singleton = Arc<dyn Any + Send + Sync>;

/// Services registered before the application is built.
pub struct ServiceCollection {
    configuration: Arc<Configuration>,
    singletons: HashMap<TypeId, Singleton>,
    scheduler_factory: Option<Arc<dyn SchedulerFactory>>,
    hosted: Vec<Arc<dyn HostedService>>,
}

impl ServiceCollection {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration: Arc::new(configuration),
            singletons: HashMap::new(),
            scheduler_factory: None,
            hosted: Vec::new(),
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Register a singleton. A later registration of the same type replaces it.
    pub fn add_singleton<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.add_singleton_arc(Arc::new(value))
    }

    pub fn add_singleton_arc<T: Send + Sync + 'static>(&mut self, value: Arc<T>) -> &mut Self {
        debug!(service = type_name::<T>(), "singleton registered");
        self.singletons.insert(TypeId::of::<T>(), value);
        self
    }

    /// Plug in a scheduler factory for another engine.
    pub fn add_scheduler_factory(&mut self, factory: Arc<dyn SchedulerFactory>) -> &mut Self {
        self.scheduler_factory = Some(factory);
        self
    }

    pub fn add_hosted_service(&mut self, service: Arc<dyn HostedService>) -> &mut Self {
        self.hosted.push(service);
        self
    }

    /// Register the in-process scheduler, its factory and the hosted service
    /// that starts it with the app and drains it on stop.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidState`] when a scheduler factory is
    /// already registered.
    pub fn add_scheduler(&mut self, settings: SchedulerSettings) -> Result<&mut Self, HostError> {
        if self.scheduler_factory.is_some() {
            return Err(HostError::InvalidState(
                "a scheduler is already registered".to_string(),
            ));
        }

        let scheduler = LocalScheduler::from_settings("cronhost", &settings);
        let factory = LocalSchedulerFactory::new(scheduler.clone());
        let hosted = SchedulerHostedService::new(scheduler.clone(), settings);

        self.add_singleton_arc(scheduler);
        self.add_singleton(factory.clone());
        self.add_scheduler_factory(Arc::new(factory));
        self.add_hosted_service(Arc::new(hosted));
        Ok(self)
    }

    /// Freeze the registrations into an [`App`].
    pub fn build(self) -> App {
        App::new(Arc::new(ServiceProvider {
            configuration: self.configuration,
            singletons: self.singletons,
            scheduler_factory: self.scheduler_factory,
            hosted: self.hosted,
        }))
    }
}

/// Read-only view of the registered services.
pub struct ServiceProvider {
    configuration: Arc<Configuration>,
    singletons: HashMap<TypeId, Singleton>,
    scheduler_factory: Option<Arc<dyn SchedulerFactory>>,
    hosted: Vec<Arc<dyn HostedService>>,
}

impl ServiceProvider {
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.singletons
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|service| service.downcast::<T>().ok())
    }

    /// Like [`ServiceProvider::get`], failing with [`HostError::MissingService`].
    pub fn require<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, HostError> {
        self.get::<T>()
            .ok_or_else(|| HostError::MissingService(type_name::<T>().to_string()))
    }

    pub fn configuration(&self) -> &Arc<Configuration> {
        &self.configuration
    }

    /// The configuration as a cron list source.
    pub fn config_source(&self) -> Arc<dyn ConfigSource> {
        self.configuration.clone()
    }

    pub fn scheduler_factory(&self) -> Option<Arc<dyn SchedulerFactory>> {
        self.scheduler_factory.clone()
    }

    pub(crate) fn hosted_services(&self) -> &[Arc<dyn HostedService>] {
        &self.hosted
    }
}
