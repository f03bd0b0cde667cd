    use super::*;
    use std::time::Duration;

    use cronhost_config::MemoryConfig;

    use crate::listener::LoggingJobListener;

    const DAILY_REPORT_PATH: &str = "ScheduledTasks:Quartz:Reports:DailyReport";

    struct DailyReport {
        manual: bool,
    }

    #[async_trait]
    impl Job for DailyReport {
        fn key(&self) -> JobKey {
            JobKey::new("DailyReport", "Reports")
        }

        fn listeners(&self) -> Vec<Arc<dyn JobListener>> {
            vec![Arc::new(LoggingJobListener::new("report-audit"))]
        }

        async fn execute(&self, _ctx: &JobExecutionContext) -> std::result::Result<(), JobExecutionError> {
            Ok(())
        }

        fn concurrency(&self) -> ConcurrencyPolicy {
            ConcurrencyPolicy::Disallow
        }
    }

    impl RecurringJob for DailyReport {
        fn manual_triggers(&self, key: &JobKey) -> Vec<Trigger> {
            if !self.manual {
                return Vec::new();
            }
            vec![
                Trigger::builder(key.clone())
                    .with_interval(Duration::from_secs(300), None)
                    .build(),
            ]
        }
    }

    fn recurring(manual: bool, config: MemoryConfig) -> Recurring {
        Recurring::new(Arc::new(DailyReport { manual }), Arc::new(config))
    }

    #[test]
    fn test_config_path() {
        let job = recurring(false, MemoryConfig::new());
        assert_eq!(job.config_path(), DAILY_REPORT_PATH);
    }

    #[test]
    fn test_single_configured_cron_without_manual_triggers() {
        let config = MemoryConfig::new().with_list(DAILY_REPORT_PATH, ["0 0 * * * ?"]);
        let job = recurring(false, config);

        let triggers = job.all_triggers().unwrap();
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].job_key, JobKey::new("DailyReport", "Reports"));
        assert!(triggers[0].has_cron("0 0 * * * ?"));
    }

    #[test]
    fn test_manual_trigger_without_configuration() {
        let job = recurring(true, MemoryConfig::new());

        let triggers = job.all_triggers().unwrap();
        assert_eq!(triggers.len(), 1);
        assert!(matches!(
            triggers[0].schedule,
            TriggerSchedule::Interval { repeat: None, .. }
        ));
    }

    #[test]
    fn test_absent_section_yields_empty() {
        let job = recurring(false, MemoryConfig::new());
        assert!(job.crontab_triggers_from_config().unwrap().is_empty());
        assert!(job.all_triggers().unwrap().is_empty());
    }

    #[test]
    fn test_cron_triggers_keep_source_order_and_unique_keys() {
        let expressions = ["0 0 * * * ?", "0 30 12 * * ?", "0 0/1 * 1/1 * ? *"];
        let config = MemoryConfig::new().with_list(DAILY_REPORT_PATH, expressions);
        let job = recurring(false, config);

        let triggers = job.crontab_triggers_from_config().unwrap();
        assert_eq!(triggers.len(), expressions.len());
        for (trigger, expression) in triggers.iter().zip(expressions) {
            assert!(trigger.has_cron(expression));
            assert_eq!(trigger.job_key, *job.key());
        }
        let mut keys: Vec<_> = triggers.iter().map(|t| t.key.clone()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), expressions.len());
    }

    #[test]
    fn test_all_triggers_puts_cron_first() {
        let config =
            MemoryConfig::new().with_list(DAILY_REPORT_PATH, ["0 0 * * * ?", "0 30 12 * * ?"]);
        let job = recurring(true, config);

        let all = job.all_triggers().unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[0].has_cron("0 0 * * * ?"));
        assert!(all[1].has_cron("0 30 12 * * ?"));
        assert!(matches!(all[2].schedule, TriggerSchedule::Interval { .. }));
    }

    #[test]
    fn test_invalid_expression_fails_whole_call() {
        let config =
            MemoryConfig::new().with_list(DAILY_REPORT_PATH, ["0 0 * * * ?", "not-a-cron"]);
        let job = recurring(true, config);

        let err = job.all_triggers().unwrap_err();
        match err {
            SchedulerError::InvalidConfiguration { path, reason } => {
                assert_eq!(path, format!("{DAILY_REPORT_PATH}:1"));
                assert!(reason.contains("not-a-cron"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_repeated_calls_generate_fresh_keys() {
        let config = MemoryConfig::new().with_list(DAILY_REPORT_PATH, ["0 0 * * * ?"]);
        let job = recurring(false, config);

        let first = job.crontab_triggers_from_config().unwrap();
        let second = job.crontab_triggers_from_config().unwrap();
        assert_ne!(first[0].key, second[0].key);
    }

    #[test]
    fn test_build_uses_job_policy_and_is_memoized() {
        let job = recurring(false, MemoryConfig::new());

        let first = job.build(None);
        let second = job.build(Some(JobDataMap::new().with("ignored", true)));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.key, JobKey::new("DailyReport", "Reports"));
        assert_eq!(first.concurrency, ConcurrencyPolicy::Disallow);
        assert!(first.job_type.ends_with("DailyReport"));
        assert!(!second.data.contains_key("ignored"));
    }

    #[test]
    fn test_listeners_delegate_to_job() {
        let job = recurring(false, MemoryConfig::new());
        let names: Vec<_> = job.listeners().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["report-audit"]);
    }

    #[tokio::test]
    async fn test_definition_executes_wrapped_job() {
        let job = recurring(false, MemoryConfig::new());
        let detail = job.build(None);
        let trigger = Trigger::now(job.key(), None);
        let ctx = JobExecutionContext::new(
            detail.clone(),
            trigger,
            None,
            tokio_util::sync::CancellationToken::new(),
        );
        assert!(detail.job().execute(&ctx).await.is_ok());
    }
