mod tests {
    use pattern_composer::color::{
        dim, make_color, pcent_to_scale, rgb_from_degrees, scale_color, whiten,
    };
    use pattern_composer::Rgb;

    #[test]
    fn test_primary_hues() {
        assert_eq!(rgb_from_degrees(0), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(rgb_from_degrees(120), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(rgb_from_degrees(240), Rgb { r: 0, g: 0, b: 255 });
    }

    #[test]
    fn test_secondary_hues() {
        assert_eq!(rgb_from_degrees(60), Rgb { r: 255, g: 255, b: 0 });
        assert_eq!(rgb_from_degrees(180), Rgb { r: 0, g: 255, b: 255 });
        assert_eq!(rgb_from_degrees(300), Rgb { r: 255, g: 0, b: 255 });
    }

    #[test]
    fn test_hue_wraps_past_full_circle() {
        assert_eq!(rgb_from_degrees(360), rgb_from_degrees(0));
        assert_eq!(rgb_from_degrees(480), rgb_from_degrees(120));
    }

    #[test]
    fn test_whiten_lifts_toward_white() {
        let red = Rgb { r: 255, g: 0, b: 0 };
        assert_eq!(whiten(red, 0), red);
        assert_eq!(whiten(red, 100), Rgb { r: 255, g: 255, b: 255 });

        let half = whiten(red, 50);
        assert_eq!(half.r, 255);
        assert!(half.g > 100 && half.g < 155);
        assert_eq!(half.g, half.b);
    }

    #[test]
    fn test_dim_scales_channels() {
        let red = Rgb { r: 255, g: 0, b: 0 };
        assert_eq!(dim(red, 100), red);
        assert_eq!(dim(red, 0), Rgb { r: 0, g: 0, b: 0 });
        assert_eq!(dim(red, 50), Rgb { r: 127, g: 0, b: 0 });
    }

    #[test]
    fn test_make_color_combines_all_three() {
        assert_eq!(make_color(0, 0, 100), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(make_color(120, 0, 100), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(make_color(0, 100, 100), Rgb { r: 255, g: 255, b: 255 });
        assert_eq!(make_color(0, 0, 0), Rgb { r: 0, g: 0, b: 0 });
    }

    #[test]
    fn test_scale_color_full_scale_is_identity() {
        let color = Rgb { r: 12, g: 200, b: 77 };
        assert_eq!(scale_color(color, 255), color);
        assert_eq!(scale_color(color, 0), Rgb { r: 0, g: 0, b: 0 });
    }

    #[test]
    fn test_pcent_to_scale_endpoints() {
        assert_eq!(pcent_to_scale(0), 0);
        assert_eq!(pcent_to_scale(100), 255);
    }
}
