use pitune_core::{ActingDirection, ControllerState, LogSample, LogSeries, StepInputs, step, suggest};
use proptest::prelude::*;

fn acting() -> impl Strategy<Value = ActingDirection> {
    prop_oneof![Just(ActingDirection::Direct), Just(ActingDirection::Reverse)]
}

prop_compose! {
    fn step_inputs()(
        feedback in -500.0f64..500.0,
        setpoint in -500.0f64..500.0,
        kp in -20.0f64..20.0,
        ki in prop_oneof![Just(0.0f64), -50.0f64..50.0],
        imax in 0.0f64..100.0,
        istartup in -50.0f64..50.0,
        ilimit in 0.0f64..100.0,
        acting in acting(),
    ) -> StepInputs {
        StepInputs { feedback, setpoint, kp, ki, imax, istartup, ilimit, acting }
    }
}

proptest! {
    #[test]
    fn integral_and_increment_stay_within_limits(
        seq in proptest::collection::vec(step_inputs(), 1..60),
        start in -200.0f64..200.0,
    ) {
        let mut state = ControllerState::new(start);
        for inputs in &seq {
            let r = step(&mut state, inputs);
            prop_assert!(r.integral.abs() <= inputs.ilimit, "integral {} > {}", r.integral, inputs.ilimit);
            prop_assert!(r.integral_increment.abs() <= inputs.imax / 60.0 + 1e-12);
            prop_assert_eq!(state.integral(), r.integral);
            prop_assert!(r.output.is_finite());
        }
    }

    #[test]
    fn ki_zero_pins_integral_to_startup(
        inputs in step_inputs(),
        prior in -1_000.0f64..1_000.0,
    ) {
        let inputs = StepInputs { ki: 0.0, ilimit: inputs.istartup.abs() + inputs.ilimit, ..inputs };
        let mut state = ControllerState::new(prior);
        let r = step(&mut state, &inputs);
        prop_assert_eq!(r.integral, inputs.istartup);
        prop_assert_eq!(r.integral_increment, 0.0);
    }

    #[test]
    fn suggestion_is_deterministic(
        values in proptest::collection::vec((0.0f64..100.0, 0.0f64..100.0), 2..200),
    ) {
        let base = chrono::NaiveDate::from_ymd_opt(2025, 8, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let samples: Vec<LogSample> = values
            .iter()
            .enumerate()
            .map(|(i, &(feedback, setpoint))| LogSample {
                time: base + chrono::Duration::seconds(i as i64),
                feedback,
                setpoint,
            })
            .collect();
        let a = suggest(&LogSeries::new(samples.clone()).unwrap());
        let b = suggest(&LogSeries::new(samples).unwrap());
        prop_assert_eq!(a, b);
        prop_assert!(a.kp >= 0.0 && a.kp.is_finite());
    }
}
