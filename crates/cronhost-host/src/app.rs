//! Application lifecycle.
//!
//! Hosted services start in priority order (higher first) and stop in
//! reverse. A failed start rolls back the services already started.

use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::error::HostError;
use crate::hosted::HostedService;
use crate::services::ServiceProvider;

/// App state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HostState {
    Created = 0,
    Starting = 1,
    Running = 2,
    Stopping = 3,
    Stopped = 4,
}

impl From<u8> for HostState {
    fn from(v: u8) -> Self {
        match v {
            1 => HostState::Starting,
            2 => HostState::Running,
            3 => HostState::Stopping,
            4 => HostState::Stopped,
            _ => HostState::Created,
        }
    }
}

/// Shutdown signal for graceful shutdown.
#[derive(Clone)]
pub struct ShutdownSignal {
    sender: broadcast::Sender<()>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender }
    }

    /// Trigger shutdown.
    pub fn trigger(&self) {
        let _ = self.sender.send(());
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// A built application: services plus the lifecycle of its hosted services.
pub struct App {
    services: Arc<ServiceProvider>,
    state: AtomicU8,
    shutdown: ShutdownSignal,
}

impl App {
    pub(crate) fn new(services: Arc<ServiceProvider>) -> Self {
        Self {
            services,
            state: AtomicU8::new(HostState::Created as u8),
            shutdown: ShutdownSignal::new(),
        }
    }

    pub fn services(&self) -> &Arc<ServiceProvider> {
        &self.services
    }

    pub fn state(&self) -> HostState {
        HostState::from(self.state.load(Ordering::SeqCst))
    }

    pub fn is_running(&self) -> bool {
        self.state() == HostState::Running
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    fn ordered_services(&self) -> Vec<Arc<dyn HostedService>> {
        let mut services = self.services.hosted_services().to_vec();
        services.sort_by(|a, b| b.priority().cmp(&a.priority()));
        services
    }

    /// Start all hosted services.
    pub async fn start(&self) -> Result<(), HostError> {
        let current = self.state.load(Ordering::SeqCst);
        if current != HostState::Created as u8 {
            return Err(HostError::InvalidState(format!(
                "cannot start from state {:?}",
                HostState::from(current)
            )));
        }
        self.state.store(HostState::Starting as u8, Ordering::SeqCst);
        info!("Host starting...");

        let services = self.ordered_services();
        for (i, service) in services.iter().enumerate() {
            if let Err(e) = service.start().await {
                error!(service = service.name(), "Failed to start hosted service: {}", e);
                for started in services.iter().take(i).rev() {
                    if let Err(stop_err) = started.stop().await {
                        warn!(service = started.name(), "Rollback stop failed: {}", stop_err);
                    }
                }
                self.state.store(HostState::Stopped as u8, Ordering::SeqCst);
                return Err(HostError::ServiceFailed {
                    service: service.name().to_string(),
                    message: e.to_string(),
                });
            }
        }

        self.state.store(HostState::Running as u8, Ordering::SeqCst);
        info!("Host started");
        Ok(())
    }

    /// Stop all hosted services in reverse start order.
    pub async fn stop(&self) -> Result<(), HostError> {
        let current = self.state.load(Ordering::SeqCst);
        if current != HostState::Running as u8 {
            return Err(HostError::InvalidState(format!(
                "cannot stop from state {:?}",
                HostState::from(current)
            )));
        }
        self.state.store(HostState::Stopping as u8, Ordering::SeqCst);
        info!("Host stopping...");
        self.shutdown.trigger();

        let mut failures = Vec::new();
        for service in self.ordered_services().iter().rev() {
            if let Err(e) = service.stop().await {
                warn!(service = service.name(), "Hosted service stop error: {}", e);
                failures.push(service.name().to_string());
            }
        }

        self.state.store(HostState::Stopped as u8, Ordering::SeqCst);
        info!("Host stopped");

        if failures.is_empty() {
            Ok(())
        } else {
            Err(HostError::ServiceFailed {
                service: failures.join(", "),
                message: "stop failed".to_string(),
            })
        }
    }

    /// Keep a started app running until `signal` completes or
    /// [`App::shutdown_signal`] fires, then stop it.
    ///
    /// Work that needs running services, such as scheduling jobs, goes
    /// between [`App::start`] and this call.
    pub async fn run_until<F>(&self, signal: F) -> Result<(), HostError>
    where
        F: Future<Output = ()>,
    {
        if !self.is_running() {
            return Err(HostError::InvalidState(format!(
                "cannot run from state {:?}",
                self.state()
            )));
        }
        let mut shutdown = self.shutdown.subscribe();
        tokio::select! {
            _ = signal => info!("Shutdown requested"),
            _ = shutdown.recv() => info!("Shutdown signal received"),
        }
        self.stop().await
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
