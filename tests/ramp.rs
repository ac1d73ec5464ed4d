mod common;

mod tests {
    use std::cell::Cell;

    use embassy_futures::block_on;
    use gesture_dimmer::{
        CommandId, DimmerBus, Duration, DutyCommand, RAMP_STEPS, RampEngine, RampOutcome,
        RampRequest, SharedDuty, level_to_duty,
    };

    use super::common::{
        MAX_DUTY, RecordingRegister, VirtualClock, VirtualDelay, is_non_decreasing,
        is_non_increasing,
    };

    const RAMP: Duration = Duration::from_millis(1000);

    #[test]
    fn test_request_levels() {
        let up = RampRequest::new(0, 100, RAMP);
        assert!(up.is_ascending());
        assert_eq!(up.level_at(1), 1);
        assert_eq!(up.level_at(50), 50);
        assert_eq!(up.level_at(RAMP_STEPS), 100);

        let down = RampRequest::new(40, 0, RAMP);
        assert!(!down.is_ascending());
        assert_eq!(down.level_at(50), 20);
        assert_eq!(down.level_at(RAMP_STEPS), 0);
    }

    #[test]
    fn test_request_clamps_levels() {
        let request = RampRequest::new(120, 200, RAMP);
        assert_eq!(request.from, 100);
        assert_eq!(request.to, 100);
    }

    #[test]
    fn test_step_interval() {
        assert_eq!(
            RampRequest::new(0, 100, RAMP).step_interval(),
            Duration::from_millis(10)
        );
        assert_eq!(
            RampRequest::new(0, 100, Duration::from_ticks(50)).step_interval(),
            Duration::from_ticks(0)
        );
    }

    #[test]
    fn test_ramp_up_stages_one_hundred_increasing_values() {
        let duty = SharedDuty::new(RecordingRegister::new());
        let bus = DimmerBus::new();
        let clock = VirtualClock::default();
        let mut engine = RampEngine::new(&duty, &bus, VirtualDelay::new(&clock));
        let id = CommandId::new(1);

        block_on(engine.execute(DutyCommand::ramp(id, RampRequest::new(0, 100, RAMP))));

        let writes = duty.with(|register| register.writes.clone());
        assert_eq!(writes.len(), usize::from(RAMP_STEPS));
        assert!(is_non_decreasing(&writes));
        assert_eq!(writes[0], level_to_duty(1, MAX_DUTY));
        assert_eq!(writes.last().copied(), Some(MAX_DUTY));
        assert_eq!(engine.level(), 100);
        assert_eq!(
            bus.outcomes.try_take(),
            Some(RampOutcome::Settled { id, level: 100 })
        );

        // One tick is 1 us with the std driver
        let elapsed = clock.elapsed_us();
        assert!(elapsed.abs_diff(RAMP.as_micros()) <= 1, "took {} us", elapsed);
    }

    #[test]
    fn test_ramp_down_ends_at_zero() {
        let duty = SharedDuty::new(RecordingRegister::staged_at(MAX_DUTY, MAX_DUTY));
        let bus = DimmerBus::new();
        let clock = VirtualClock::default();
        let mut engine = RampEngine::new(&duty, &bus, VirtualDelay::new(&clock));
        assert_eq!(engine.level(), 100);

        block_on(engine.execute(DutyCommand::ramp(
            CommandId::new(1),
            RampRequest::new(100, 0, RAMP),
        )));

        let writes = duty.with(|register| register.writes.clone());
        assert_eq!(writes.len(), usize::from(RAMP_STEPS));
        assert!(is_non_increasing(&writes));
        assert_eq!(writes.last().copied(), Some(0));
        assert_eq!(engine.level(), 0);
    }

    #[test]
    fn test_engine_starts_from_staged_level() {
        let staged = level_to_duty(50, MAX_DUTY);
        let duty = SharedDuty::new(RecordingRegister::staged_at(MAX_DUTY, staged));
        let bus = DimmerBus::new();
        let clock = VirtualClock::default();
        let mut engine = RampEngine::new(&duty, &bus, VirtualDelay::new(&clock));
        assert_eq!(engine.level(), 50);

        // Request claims 0 but the register sits at 50
        block_on(engine.execute(DutyCommand::ramp(
            CommandId::new(1),
            RampRequest::new(0, 100, RAMP),
        )));

        let writes = duty.with(|register| register.writes.clone());
        assert!(writes[0] >= staged);
        assert!(is_non_decreasing(&writes));
    }

    #[test]
    fn test_set_writes_once() {
        let duty = SharedDuty::new(RecordingRegister::new());
        let bus = DimmerBus::new();
        let clock = VirtualClock::default();
        let mut engine = RampEngine::new(&duty, &bus, VirtualDelay::new(&clock));
        let id = CommandId::new(7);

        block_on(engine.execute(DutyCommand::set(id, 75)));

        let writes = duty.with(|register| register.writes.clone());
        assert_eq!(writes, [level_to_duty(75, MAX_DUTY)]);
        assert_eq!(clock.delays(), 0);
        assert_eq!(
            bus.outcomes.try_take(),
            Some(RampOutcome::Settled { id, level: 75 })
        );
    }

    #[test]
    fn test_down_preempts_up_ramp_without_interleaving() {
        let duty = SharedDuty::new(RecordingRegister::new());
        let bus = DimmerBus::new();
        let clock = VirtualClock::default();
        let down = DutyCommand::ramp(CommandId::new(2), RampRequest::new(100, 0, RAMP));
        let delay = VirtualDelay::with_hook(&clock, |delays| {
            if delays == 40 {
                bus.commands.signal(down);
            }
        });
        let mut engine = RampEngine::new(&duty, &bus, delay);

        block_on(engine.execute(DutyCommand::ramp(
            CommandId::new(1),
            RampRequest::new(0, 100, RAMP),
        )));

        let writes = duty.with(|register| register.writes.clone());
        assert_eq!(writes.len(), 40 + usize::from(RAMP_STEPS));

        let (up, down_writes) = writes.split_at(40);
        assert!(is_non_decreasing(up));
        assert_eq!(up.last().copied(), Some(level_to_duty(40, MAX_DUTY)));
        // Down ramp picks up from the staged value, not from 100
        assert!(down_writes[0] <= level_to_duty(40, MAX_DUTY));
        assert!(is_non_increasing(down_writes));
        assert_eq!(down_writes.last().copied(), Some(0));

        assert_eq!(engine.level(), 0);
        assert_eq!(
            bus.outcomes.try_take(),
            Some(RampOutcome::Settled {
                id: CommandId::new(2),
                level: 0,
            })
        );
    }

    #[test]
    fn test_set_preempts_ramp() {
        let duty = SharedDuty::new(RecordingRegister::new());
        let bus = DimmerBus::new();
        let clock = VirtualClock::default();
        let set = DutyCommand::set(CommandId::new(2), 75);
        let delay = VirtualDelay::with_hook(&clock, |delays| {
            if delays == 10 {
                bus.commands.signal(set);
            }
        });
        let mut engine = RampEngine::new(&duty, &bus, delay);

        block_on(engine.execute(DutyCommand::ramp(
            CommandId::new(1),
            RampRequest::new(0, 100, RAMP),
        )));

        let writes = duty.with(|register| register.writes.clone());
        assert_eq!(writes.len(), 11);
        assert_eq!(writes.last().copied(), Some(level_to_duty(75, MAX_DUTY)));
        assert_eq!(engine.level(), 75);
        assert_eq!(clock.delays(), 10);
    }

    #[test]
    fn test_preempted_ramp_reports_interruption() {
        let duty = SharedDuty::new(RecordingRegister::new());
        let bus = DimmerBus::new();
        let clock = VirtualClock::default();
        let down = DutyCommand::ramp(CommandId::new(2), RampRequest::new(100, 0, RAMP));
        let reported = Cell::new(None);
        let delay = VirtualDelay::with_hook(&clock, |delays| {
            if delays == 40 {
                bus.commands.signal(down);
            }
            // First delay of the down ramp
            if delays == 41 {
                reported.set(bus.outcomes.try_take());
            }
        });
        let mut engine = RampEngine::new(&duty, &bus, delay);

        block_on(engine.execute(DutyCommand::ramp(
            CommandId::new(1),
            RampRequest::new(0, 100, RAMP),
        )));

        assert_eq!(
            reported.get(),
            Some(RampOutcome::Interrupted {
                id: CommandId::new(1),
                level: 40,
            })
        );
    }
}
