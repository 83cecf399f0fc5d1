// Property checks for the shape and color invariants of the normalizer.
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use normalize_images::image_handler::{
    CREAM, ImageHandler, NormalizeOptions, nudge_channel, pad_to_square, pad_with_border,
    replace_near_white,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn output_is_square_of_final_size(
        width in 1u32..120,
        height in 1u32..120,
        padding in 0u32..30,
        final_size in 8u32..96,
        with_alpha in any::<bool>(),
    ) {
        let mut options = NormalizeOptions::default();
        options.padding = padding;
        options.final_size = final_size;
        options.add_border = true;
        options.add_cache_buster = true;
        let handler = ImageHandler::new(options).expect("handler init failed");

        let input = if with_alpha {
            DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
                Rgba([x as u8, y as u8, 90, ((x + y) % 256) as u8])
            }))
        } else {
            DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
                Rgb([x as u8, y as u8, 90])
            }))
        };

        let output = handler.normalize(&input).expect("normalize should succeed");
        prop_assert_eq!(output.dimensions(), (final_size, final_size));
    }

    #[test]
    fn squaring_uses_larger_padded_side(
        width in 1u32..200,
        height in 1u32..200,
        padding in 0u32..40,
    ) {
        let source = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
        let padded = pad_with_border(&source, padding, CREAM).expect("pad should succeed");
        prop_assert_eq!(padded.dimensions(), (width + 2 * padding, height + 2 * padding));

        let side = (width + 2 * padding).max(height + 2 * padding);
        let square = pad_to_square(padded, CREAM);
        prop_assert_eq!(square.dimensions(), (side, side));
    }

    #[test]
    fn near_white_rule_is_per_channel(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), tolerance in 0u8..64) {
        let mut image = RgbImage::from_pixel(1, 1, Rgb([r, g, b]));
        let replaced = replace_near_white(&mut image, CREAM, tolerance);
        let threshold = 255 - tolerance;
        let expected = r >= threshold && g >= threshold && b >= threshold;

        prop_assert_eq!(replaced == 1, expected);
        if expected {
            prop_assert_eq!(*image.get_pixel(0, 0), CREAM);
        } else {
            prop_assert_eq!(*image.get_pixel(0, 0), Rgb([r, g, b]));
        }
    }

    #[test]
    fn nudge_changes_value_by_exactly_one(value in any::<u8>()) {
        let nudged = nudge_channel(value);
        prop_assert_eq!((nudged as i16 - value as i16).abs(), 1);
    }
}
