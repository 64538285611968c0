mod tests {
    use embassy_time::Instant;
    use pattern_composer::{
        AdvancedPluginFactory, EngineConfig, EngineError, PatternEngine,
    };
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    type Engine = PatternEngine<AdvancedPluginFactory, SmallRng, 10, 4, 3>;

    fn engine() -> Engine {
        PatternEngine::new(
            AdvancedPluginFactory,
            SmallRng::seed_from_u64(7),
            &EngineConfig::default(),
        )
    }

    const T0: Instant = Instant::from_millis(0);

    #[test]
    fn test_empty_pattern_is_accepted() {
        let mut engine = engine();
        assert_eq!(engine.exec_cmd_str("", T0), Ok(()));
        assert_eq!(engine.exec_cmd_str("   ", T0), Ok(()));
        assert_eq!(engine.layer_count(), 0);
        assert_eq!(engine.track_count(), 0);
    }

    #[test]
    fn test_property_command_without_track_is_rejected() {
        let mut engine = engine();
        assert_eq!(engine.exec_cmd_str("H180", T0), Err(EngineError::BadCmd));
        assert_eq!(engine.layer_count(), 0);
    }

    #[test]
    fn test_trigger_command_without_track_is_rejected() {
        let mut engine = engine();
        assert_eq!(engine.exec_cmd_str("T", T0), Err(EngineError::BadCmd));
        assert_eq!(engine.exec_cmd_str("G", T0), Err(EngineError::BadCmd));
    }

    #[test]
    fn test_unknown_letter_is_rejected() {
        let mut engine = engine();
        assert_eq!(engine.exec_cmd_str("E0 Z1", T0), Err(EngineError::BadCmd));
        assert_eq!(engine.exec_cmd_str("L", T0), Err(EngineError::BadCmd));
    }

    #[test]
    fn test_effect_without_id_is_rejected() {
        let mut engine = engine();
        assert_eq!(engine.exec_cmd_str("E", T0), Err(EngineError::BadVal));
        assert_eq!(engine.layer_count(), 0);
    }

    #[test]
    fn test_effect_id_out_of_range_is_rejected() {
        let mut engine = engine();
        assert_eq!(engine.exec_cmd_str("E1000", T0), Err(EngineError::BadVal));
        // in range but unknown to the factory
        assert_eq!(engine.exec_cmd_str("E7", T0), Err(EngineError::BadVal));
        assert_eq!(engine.layer_count(), 0);
    }

    #[test]
    fn test_lowercase_commands_are_accepted() {
        let mut engine = engine();
        assert_eq!(engine.exec_cmd_str("e0 h120 t g", T0), Ok(()));
        assert_eq!(engine.track_draw(0).unwrap().degree_hue, 120);
    }

    #[test]
    fn test_error_stops_execution_but_keeps_earlier_mutations() {
        let mut engine = engine();
        let status = engine.exec_cmd_str("E0 H100 Z5 H200", T0);
        assert_eq!(status, Err(EngineError::BadCmd));
        assert_eq!(engine.track_draw(0).unwrap().degree_hue, 100);
    }

    #[test]
    fn test_hue_clips_to_full_circle() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 H9999", T0).unwrap();
        assert_eq!(engine.track_draw(0).unwrap().degree_hue, 359);
    }

    #[test]
    fn test_hue_without_value_keeps_current() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 H45 H", T0).unwrap();
        assert_eq!(engine.track_draw(0).unwrap().degree_hue, 45);
    }

    #[test]
    fn test_window_percent_math() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 J50 K50", T0).unwrap();
        let draw = engine.track_draw(0).unwrap();
        // (50 * 9) / 100 = 4, (50 * 9) / 100 + 1 = 5
        assert_eq!(draw.pix_start, 4);
        assert_eq!(draw.pix_len, 5);
    }

    #[test]
    fn test_window_at_hundred_percent_loses_one_pixel() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 J100 K100", T0).unwrap();
        let draw = engine.track_draw(0).unwrap();
        assert_eq!(draw.pix_start, 9);
        assert_eq!(draw.pix_len, 10);
    }

    #[test]
    fn test_window_without_value_resets() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 J50 K50 J K", T0).unwrap();
        let draw = engine.track_draw(0).unwrap();
        assert_eq!(draw.pix_start, 0);
        assert_eq!(draw.pix_len, 1);
    }

    #[test]
    fn test_direction_toggle() {
        let mut engine = engine();
        engine.exec_cmd_str("E0", T0).unwrap();
        assert!(engine.track_draw(0).unwrap().go_upwards);

        engine.exec_cmd_str("U", T0).unwrap();
        assert!(!engine.track_draw(0).unwrap().go_upwards);

        engine.exec_cmd_str("U1", T0).unwrap();
        assert!(engine.track_draw(0).unwrap().go_upwards);

        engine.exec_cmd_str("U0", T0).unwrap();
        assert!(!engine.track_draw(0).unwrap().go_upwards);
    }

    #[test]
    fn test_overwrite_toggle_is_inverted() {
        let mut engine = engine();
        engine.exec_cmd_str("E0", T0).unwrap();
        // OR blending is the default
        assert!(engine.track_draw(0).unwrap().or_pixel_values);

        engine.exec_cmd_str("V1", T0).unwrap();
        assert!(!engine.track_draw(0).unwrap().or_pixel_values);

        engine.exec_cmd_str("V0", T0).unwrap();
        assert!(engine.track_draw(0).unwrap().or_pixel_values);

        engine.exec_cmd_str("V", T0).unwrap();
        assert!(!engine.track_draw(0).unwrap().or_pixel_values);
    }

    #[test]
    fn test_count_maps_percent_onto_segment() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 C50", T0).unwrap();
        // map(50, 0..100, 1..10) = 50 * 9 / 100 + 1 = 5
        assert_eq!(engine.track_draw(0).unwrap().pix_count, 5);

        engine.exec_cmd_str("C100", T0).unwrap();
        assert_eq!(engine.track_draw(0).unwrap().pix_count, 10);
    }

    #[test]
    fn test_count_without_value_keeps_current() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 C", T0).unwrap();
        assert_eq!(engine.track_draw(0).unwrap().pix_count, 1);
    }

    #[test]
    fn test_delay_clips_to_maximum() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 D65535", T0).unwrap();
        assert_eq!(
            engine.track_draw(0).unwrap().msecs_delay,
            pattern_composer::MAX_DELAY_MSECS
        );
    }

    #[test]
    fn test_segment_staging_places_track() {
        let mut engine = engine();
        engine.exec_cmd_str("X5 Y5 E0 H0 T G", T0).unwrap();
        assert_eq!(engine.track_segment(0), Some((0, 5, 5)));
        engine.update_effects(Instant::from_millis(16));

        let display = engine.display();
        for pix in 0..5 {
            assert_eq!(display[pix], pattern_composer::Rgb::default());
        }
        for pix in 5..10 {
            assert_eq!(display[pix], pattern_composer::Rgb { r: 255, g: 0, b: 0 });
        }
    }

    #[test]
    fn test_segment_offset_without_value_resets_to_zero() {
        let mut engine = engine();
        engine
            .exec_cmd_str("X5 Y5 E0 H0 T X E0 H120 T G", T0)
            .unwrap();
        engine.update_effects(Instant::from_millis(16));

        let display = engine.display();
        // second track was staged at offset 0 with the staged count of 5
        for pix in 0..5 {
            assert_eq!(display[pix], pattern_composer::Rgb { r: 0, g: 255, b: 0 });
        }
        for pix in 5..10 {
            assert_eq!(display[pix], pattern_composer::Rgb { r: 255, g: 0, b: 0 });
        }
    }

    #[test]
    fn test_segment_count_without_value_restores_full_strip() {
        let mut engine = engine();
        engine.exec_cmd_str("X2 Y4 E0 T X0 Y E0", T0).unwrap();
        // first track kept the staged count, the second got the full strip
        assert_eq!(engine.track_draw(0).unwrap().pix_len, 4);
        assert_eq!(engine.track_draw(1).unwrap().pix_len, 10);
    }

    #[test]
    fn test_segment_count_above_remaining_pixels_restores_full_strip() {
        let mut engine = engine();
        // only 2 pixels remain past offset 8, so Y4 is out of range
        engine.exec_cmd_str("X8 Y4 E0", T0).unwrap();
        assert_eq!(engine.track_draw(0).unwrap().pix_len, 10);
    }
}
