#[cfg(test)]
mod tests {
    use crate::commands::QuestCommand;
    use crate::enums::*;
    use crate::error::{parse_answer, InputError, SimError};
    use crate::state::{CartPoleState, PendulumSeries, TankFrame, TankSample, TankSeries};
    use crate::types::{steps_for, SimTime, Verdict};

    #[test]
    fn test_quest_numbers_are_sequential() {
        let numbers: Vec<u32> = QuestId::ALL.iter().map(|q| q.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
        for quest in QuestId::ALL {
            assert_eq!(QuestId::from_number(quest.number()), Some(quest));
        }
        assert_eq!(QuestId::from_number(0), None);
        assert_eq!(QuestId::from_number(8), None);
    }

    #[test]
    fn test_command_tagged_serde() {
        let json = serde_json::to_string(&QuestCommand::Reset).unwrap();
        assert_eq!(json, r#"{"type":"Reset"}"#);
        let back: QuestCommand = serde_json::from_str(r#"{"type":"Start"}"#).unwrap();
        assert_eq!(back, QuestCommand::Start);
    }

    #[test]
    fn test_pendulum_model_snake_case() {
        let json = serde_json::to_string(&PendulumModel::Nonlinear).unwrap();
        assert_eq!(json, "\"nonlinear\"");
        assert_eq!(PendulumModel::default(), PendulumModel::Linearized);
    }

    #[test]
    fn test_sim_time_has_no_drift() {
        let mut time = SimTime::default();
        for _ in 0..500 {
            time.advance(0.02);
        }
        assert_eq!(time.tick, 500);
        assert!((time.elapsed_secs - 10.0).abs() < 1e-12);
        assert_eq!(time, SimTime::at(500, 0.02));
    }

    #[test]
    fn test_steps_for_durations() {
        assert_eq!(steps_for(50.0, 0.1), 500);
        assert_eq!(steps_for(10.0, 0.01), 1000);
        assert_eq!(steps_for(10.0, 0.02), 500);
    }

    #[test]
    fn test_series_push_keeps_columns_aligned() {
        let mut series = TankSeries::starting_at(0.0);
        series.push(TankSample {
            time: 0.1,
            level: 0.01,
            kv: 0.5,
            error: 0.5,
            integral: 0.05,
            derivative: 0.0,
        });
        assert_eq!(series.len(), 2);
        assert_eq!(series.levels.len(), series.kv.len());
        assert_eq!(series.errors.len(), series.derivatives.len());

        let mut pendulum = PendulumSeries::starting_at(0.05);
        pendulum.push(0.02, CartPoleState::default(), 3.0);
        assert_eq!(pendulum.len(), 2);
        assert_eq!(pendulum.forces, vec![0.0, 3.0]);
    }

    #[test]
    fn test_frame_serializes_series() {
        let frame = TankFrame {
            time: SimTime::at(1, 0.1),
            target_level: 0.5,
            series: TankSeries::starting_at(0.0),
        };
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["target_level"], 0.5);
        assert_eq!(value["series"]["levels"][0], 0.0);
        assert_eq!(value["time"]["tick"], 1);
    }

    #[test]
    fn test_verdict_constructors() {
        assert!(Verdict::success("ok").success);
        assert!(!Verdict::failure("no").success);
    }

    #[test]
    fn test_parse_answer_accepts_numbers() {
        assert_eq!(parse_answer("angle", " 45.5 "), Ok(45.5));
        assert_eq!(parse_answer("angle", "-3"), Ok(-3.0));
    }

    #[test]
    fn test_parse_answer_rejects_text() {
        let err = parse_answer("angle", "forty").unwrap_err();
        assert_eq!(
            err,
            InputError::NotANumber {
                field: "angle",
                input: "forty".into()
            }
        );
        assert!(parse_answer("angle", "").is_err());
        assert!(parse_answer("angle", "NaN").is_err());
        assert!(parse_answer("angle", "inf").is_err());
    }

    #[test]
    fn test_check_positive() {
        assert_eq!(SimError::check_positive("mass", 2.0), Ok(2.0));
        assert!(matches!(
            SimError::check_positive("mass", 0.0),
            Err(SimError::InvalidParameter { name: "mass", .. })
        ));
        assert_eq!(
            SimError::check_positive("mass", f64::NAN),
            Err(SimError::NonFinite { name: "mass" })
        );
    }
}
