mod tests {
    use embassy_time::Instant;
    use pattern_composer::{
        AdvancedPluginFactory, EngineConfig, EngineError, PatternEngine, Rgb,
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
    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    fn all_pixels(engine: &Engine, color: Rgb) -> bool {
        engine.display().iter().all(|&pixel| pixel == color)
    }

    #[test]
    fn test_first_update_forces_redisplay() {
        let mut engine = engine();
        assert!(engine.update_effects(T0));
        assert!(all_pixels(&engine, BLACK));
        // nothing is stacked, so later ticks report no change
        assert!(!engine.update_effects(Instant::from_millis(16)));
    }

    #[test]
    fn test_draw_all_fills_the_strip() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 T G", T0).unwrap();
        assert!(engine.update_effects(Instant::from_millis(16)));
        // default hue 0 at full brightness is pure red
        assert!(all_pixels(&engine, RED));
    }

    #[test]
    fn test_track_stays_quiet_until_activated() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 T", T0).unwrap();
        engine.update_effects(T0);
        assert!(!engine.update_effects(Instant::from_millis(16)));
        assert!(all_pixels(&engine, BLACK));

        engine.exec_cmd_str("G", Instant::from_millis(20)).unwrap();
        assert!(engine.update_effects(Instant::from_millis(32)));
        assert!(all_pixels(&engine, RED));
    }

    #[test]
    fn test_untriggered_track_draws_nothing() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 G", T0).unwrap();
        engine.update_effects(T0);
        assert!(!engine.update_effects(Instant::from_millis(16)));
        assert!(all_pixels(&engine, BLACK));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 T G", T0).unwrap();
        engine.update_effects(Instant::from_millis(16));
        assert!(all_pixels(&engine, RED));

        engine.exec_cmd_str("P", Instant::from_millis(32)).unwrap();
        assert_eq!(engine.layer_count(), 0);
        assert_eq!(engine.track_count(), 0);
        assert_eq!(engine.enabled_track_count(), 0);
        assert!(all_pixels(&engine, BLACK));
        // cleared engine redisplays on the next tick
        assert!(engine.update_effects(Instant::from_millis(48)));
    }

    #[test]
    fn test_repeated_clear_is_idempotent() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 T G", T0).unwrap();
        assert_eq!(engine.exec_cmd_str("P P P", T0), Ok(()));
        assert_eq!(engine.layer_count(), 0);
        assert_eq!(engine.track_count(), 0);
        assert!(all_pixels(&engine, BLACK));
    }

    #[test]
    fn test_full_layer_stack_reports_memory_error() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 H45 E100 E100 E100", T0).unwrap();
        assert_eq!(engine.layer_count(), 4);

        let status = engine.exec_cmd_str("E100", T0);
        assert_eq!(status, Err(EngineError::Memory));
        assert_eq!(engine.layer_count(), 4);
        assert_eq!(engine.track_count(), 1);
        assert_eq!(engine.track_draw(0).unwrap().degree_hue, 45);
    }

    #[test]
    fn test_full_track_stack_reports_memory_error() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 E0 E0", T0).unwrap();
        assert_eq!(engine.track_count(), 3);

        let status = engine.exec_cmd_str("E0", T0);
        assert_eq!(status, Err(EngineError::Memory));
        assert_eq!(engine.layer_count(), 3);
        assert_eq!(engine.track_count(), 3);
    }

    #[test]
    fn test_predraw_first_is_rejected() {
        let mut engine = engine();
        assert_eq!(engine.exec_cmd_str("E100", T0), Err(EngineError::BadCmd));
        assert_eq!(engine.layer_count(), 0);
        assert_eq!(engine.track_count(), 0);
    }

    #[test]
    fn test_max_brightness_clamps_drawn_pixels() {
        let mut engine = engine();
        engine.set_max_brightness(50);
        engine.exec_cmd_str("E0 T G", T0).unwrap();
        engine.update_effects(Instant::from_millis(16));

        let pixel = engine.display()[0];
        assert_eq!(pixel, Rgb { r: 127, g: 0, b: 0 });
    }

    #[test]
    fn test_redraw_waits_for_track_delay() {
        let mut engine = engine();
        engine.exec_cmd_str("E2 D100 T G", T0).unwrap();

        // DrawStep lights one more pixel per redraw
        assert!(engine.update_effects(T0));
        assert_eq!(engine.display()[0], RED);
        assert_eq!(engine.display()[1], BLACK);

        // not due yet
        assert!(!engine.update_effects(Instant::from_millis(50)));

        assert!(engine.update_effects(Instant::from_millis(100)));
        assert_eq!(engine.display()[1], RED);
    }

    #[test]
    fn test_delay_offset_shortens_the_wait() {
        let mut engine = engine();
        engine.set_delay_offset(-100);
        assert_eq!(engine.delay_offset(), -100);
        engine.exec_cmd_str("E2 D100 T G", T0).unwrap();

        engine.update_effects(T0);
        // 100ms delay minus 100ms offset floors at a 1ms advance
        assert!(engine.update_effects(Instant::from_millis(1)));
        assert_eq!(engine.display()[1], RED);
    }

    #[test]
    fn test_delay_offset_is_clamped_to_range() {
        let mut engine = engine();
        engine.set_delay_offset(-500);
        assert_eq!(engine.delay_offset(), -pattern_composer::DELAY_RANGE);
        engine.set_delay_offset(500);
        assert_eq!(engine.delay_offset(), pattern_composer::DELAY_RANGE);
    }

    #[test]
    fn test_brightness_command_dims_one_track() {
        let mut engine = engine();
        engine.exec_cmd_str("E0 B50 T G", T0).unwrap();
        engine.update_effects(Instant::from_millis(16));

        // track brightness halves the derived color
        assert_eq!(engine.display()[0], Rgb { r: 127, g: 0, b: 0 });
    }
}
