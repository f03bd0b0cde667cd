    use super::*;
    use chrono::TimeZone;

    use crate::error::SchedulerError;

    fn report_key() -> JobKey {
        JobKey::new("DailyReport", "Reports")
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_builder_defaults_to_immediate_with_generated_key() {
        let trigger = Trigger::builder(report_key()).build();
        assert_eq!(trigger.schedule, TriggerSchedule::Now);
        assert_eq!(trigger.job_key, report_key());
        assert!(trigger.key.name.starts_with("DailyReport-"));
        assert_eq!(trigger.key.group, "Reports");
        assert!(trigger.data.is_empty());
    }

    #[test]
    fn test_builder_explicit_identity() {
        let key = TriggerKey::new("every-5s", "Reports");
        let trigger = Trigger::builder(report_key())
            .with_identity(key.clone())
            .with_interval(Duration::from_secs(5), None)
            .with_description("heartbeat")
            .build();
        assert_eq!(trigger.key, key);
        assert_eq!(trigger.description.as_deref(), Some("heartbeat"));
    }

    #[test]
    fn test_for_job_retargets() {
        let other = JobKey::new("Purge", "Maintenance");
        let trigger = Trigger::builder(report_key()).for_job(other.clone()).build();
        assert_eq!(trigger.job_key, other);
        assert!(trigger.key.name.starts_with("Purge-"));
    }

    #[test]
    fn test_cron_trigger() {
        let trigger = Trigger::cron(&report_key(), "0 0 * * * ?").unwrap();
        assert!(trigger.has_cron("0 0 * * * ?"));
        assert!(trigger.schedule.is_repeating());
    }

    #[test]
    fn test_cron_trigger_invalid() {
        let result = Trigger::cron(&report_key(), "not-a-cron");
        assert!(matches!(
            result,
            Err(SchedulerError::InvalidCronExpression { .. })
        ));
    }

    #[test]
    fn test_now_trigger_carries_data() {
        let data = JobDataMap::new().with("var1", "value");
        let trigger = Trigger::now(&report_key(), Some(data));
        assert_eq!(trigger.data.get_str("var1"), Some("value"));
        assert_eq!(trigger.schedule, TriggerSchedule::Now);
    }

    #[test]
    fn test_cron_triggers_have_distinct_keys() {
        let a = Trigger::cron(&report_key(), "0 0 * * * ?").unwrap();
        let b = Trigger::cron(&report_key(), "0 0 * * * ?").unwrap();
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn test_now_fires_once() {
        let now = at(10, 0, 0);
        let schedule = TriggerSchedule::Now;
        assert_eq!(schedule.first_fire_time(now), Some(now));
        assert_eq!(schedule.next_fire_time(now, 1), None);
        assert!(!schedule.is_repeating());
    }

    #[test]
    fn test_at_fires_once_at_instant() {
        let target = at(12, 30, 0);
        let schedule = TriggerSchedule::At(target);
        assert_eq!(schedule.first_fire_time(at(10, 0, 0)), Some(target));
        assert_eq!(schedule.next_fire_time(target, 1), None);
    }

    #[test]
    fn test_cron_schedule_times() {
        let schedule = TriggerSchedule::Cron(CronExpression::parse("0 0 * * * ?").unwrap());
        let first = schedule.first_fire_time(at(10, 15, 0)).unwrap();
        assert_eq!(first, at(11, 0, 0));
        assert_eq!(schedule.next_fire_time(first, 1), Some(at(12, 0, 0)));
    }

    #[test]
    fn test_interval_with_repeat_count() {
        let start = at(10, 0, 0);
        let schedule = TriggerSchedule::Interval {
            every: Duration::from_secs(30),
            repeat: Some(2),
        };
        assert_eq!(schedule.first_fire_time(start), Some(start));
        assert_eq!(schedule.next_fire_time(start, 1), Some(at(10, 0, 30)));
        assert_eq!(schedule.next_fire_time(at(10, 0, 30), 2), Some(at(10, 1, 0)));
        // Three fires in total.
        assert_eq!(schedule.next_fire_time(at(10, 1, 0), 3), None);
    }

    #[test]
    fn test_interval_forever() {
        let schedule = TriggerSchedule::Interval {
            every: Duration::from_secs(60),
            repeat: None,
        };
        assert_eq!(schedule.next_fire_time(at(10, 0, 0), 1000), Some(at(10, 1, 0)));
        assert!(schedule.is_repeating());
    }

    #[test]
    fn test_interval_zero_repeat_is_one_shot() {
        let schedule = TriggerSchedule::Interval {
            every: Duration::from_secs(1),
            repeat: Some(0),
        };
        assert!(!schedule.is_repeating());
        assert_eq!(schedule.next_fire_time(at(10, 0, 0), 1), None);
    }
