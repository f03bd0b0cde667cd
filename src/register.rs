//! Registration of the bundled recurring jobs.

use cronhost_core::Result;
use cronhost_host::JobRegistry;

use crate::jobs::{DailyReport, Heartbeat};

/// Registry with every recurring job this binary runs.
pub(crate) fn recurring_jobs() -> Result<JobRegistry> {
    let mut registry = JobRegistry::new();
    registry.register::<DailyReport>()?.register::<Heartbeat>()?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_jobs_registered() {
        let registry = recurring_jobs().unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.ids().iter().any(|id| id.ends_with("DailyReport")));
        assert!(registry.ids().iter().any(|id| id.ends_with("Heartbeat")));
    }
}
