mod tests {
    use pattern_composer::math8::{blend8, clip_value, map_value, rand_range, scale8};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(128, 0), 0);
    }

    #[test]
    fn test_blend8() {
        assert_eq!(blend8(255, 128, 128), 191);
        assert_eq!(blend8(0, 128, 255), 128);
        assert_eq!(blend8(255, 0, 128), 127);
        assert_eq!(blend8(255, 128, 0), 255);
    }

    #[test]
    fn test_map_value() {
        assert_eq!(map_value(0, 0, 100, 1, 10), 1);
        assert_eq!(map_value(100, 0, 100, 1, 10), 10);
        assert_eq!(map_value(50, 0, 100, 1, 10), 5);
        // input outside the source range is clipped first
        assert_eq!(map_value(200, 0, 100, 1, 10), 10);
        // degenerate source range maps to the output minimum
        assert_eq!(map_value(5, 10, 10, 1, 10), 1);
    }

    #[test]
    fn test_clip_value() {
        assert_eq!(clip_value(5, 0, 10), 5);
        assert_eq!(clip_value(15, 0, 10), 10);
        assert_eq!(clip_value(0, 2, 10), 2);
    }

    #[test]
    fn test_rand_range_bounds() {
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..1000 {
            let value = rand_range(&mut rng, 3, 7);
            assert!((3..7).contains(&value));
        }
        // empty range collapses to the minimum
        assert_eq!(rand_range(&mut rng, 5, 5), 5);
    }
}
