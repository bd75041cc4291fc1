use super::*;
use crate::common::color_format::{ColorFormat, ALL_FORMATS};
use crate::common::test_utils::assert_approx_eq;
use crate::image::ImageDesc;

fn matrix_from(rows: usize, cols: usize, values: &[f64]) -> CoefMatrix {
    let mut m = CoefMatrix::new(rows, cols);
    m.data_mut().copy_from_slice(values);
    m
}

#[test]
fn forward_1d_splits_low_and_high() {
    let mut data = [1.0, 2.0, 3.0, 4.0];
    forward_1d(&mut data);
    assert_eq!(data, [1.5, 3.5, -0.5, -0.5]);
}

#[test]
fn one_dimensional_round_trip_is_exact() {
    let original = [0.25, -0.75, 1.0, -1.0, 0.125, 0.5, -0.25, 0.0];
    let mut data = original;
    forward_1d(&mut data);
    inverse_1d(&mut data);
    for (a, b) in data.iter().zip(original.iter()) {
        assert_approx_eq(*a, *b, 1e-12);
    }
}

#[test]
fn forward_2d_matches_hand_applied_passes() {
    // 4x4 ramp remapped to [-1, 1], transformed by the separable
    // algorithm, compared against plain row-then-column application of
    // the 1D formulas.
    let values: Vec<f64> = (1..=16).map(|v| remap(0.0, 255.0, -1.0, 1.0, v as f64)).collect();

    let mut m = matrix_from(4, 4, &values);
    forward_2d(&mut m).unwrap();

    let mut expected = values.clone();
    for row in expected.chunks_mut(4) {
        forward_1d(row);
    }
    for j in 0..4 {
        let mut col = [0.0; 4];
        for i in 0..4 {
            col[i] = expected[i * 4 + j];
        }
        forward_1d(&mut col);
        for i in 0..4 {
            expected[i * 4 + j] = col[i];
        }
    }

    for (a, b) in m.data().iter().zip(expected.iter()) {
        assert_approx_eq(*a, *b, 1e-9);
    }
}

#[test]
fn two_dimensional_round_trip_is_exact() {
    let values: Vec<f64> = (0..64).map(|v| (v as f64) / 63.0 * 2.0 - 1.0).collect();
    let original = matrix_from(8, 8, &values);

    let mut m = original.clone();
    forward_2d(&mut m).unwrap();
    inverse_2d(&mut m).unwrap();

    for (a, b) in m.data().iter().zip(original.data().iter()) {
        assert_approx_eq(*a, *b, 1e-12);
    }
}

#[test]
fn odd_dimensions_are_rejected() {
    let mut m = CoefMatrix::new(3, 4);
    assert!(forward_2d(&mut m).is_err());

    let mut m = CoefMatrix::new(4, 6);
    assert!(forward_2d(&mut m).is_ok());

    let mut m = CoefMatrix::new(4, 5);
    assert!(inverse_2d(&mut m).is_err());
}

#[test]
fn constant_image_concentrates_in_approximation_band() {
    let img = crate::common::test_utils::gray_u8_image(8, 8, |_, _| 100);
    let coefs = HaarTransform.forward(&img).unwrap();
    assert_eq!(coefs.width(), 8);
    assert_eq!(coefs.height(), 8);
    assert_eq!(coefs.color_format(), ColorFormat::GRAY_U8);
    assert_eq!(coefs.planes().len(), 1);

    // Detail bands of a constant image are exactly zero, which the sample
    // range maps to its fractional midpoint. The plane must keep it.
    let plane = coefs.plane(0);
    for y in 0..8 {
        for x in 0..8 {
            let expected = if x < 4 && y < 4 { 100.0 } else { 127.5 };
            assert_approx_eq(plane.at(y, x), expected, 1e-9);
        }
    }
}

fn pattern_image(format: ColorFormat, side: u32) -> crate::image::Image {
    let desc = ImageDesc::new(side, side, format);
    let bytes: Vec<u8> = (0..desc.size_in_bytes()).map(|i| (i % 251) as u8).collect();
    crate::image::Image::from_vec(desc, bytes).unwrap()
}

#[test]
fn image_round_trip_stays_within_one_level() {
    let haar = HaarTransform;

    for &format in ALL_FORMATS {
        for side in [128u32, 256, 512] {
            let img = pattern_image(format, side);
            let restored = haar.inverse(&haar.forward(&img).unwrap()).unwrap();

            match format.channel_size {
                crate::common::color_format::ChannelSize::_8bit => {
                    for (a, b) in img.bytes().iter().zip(restored.bytes().iter()) {
                        assert!(
                            (*a as i32 - *b as i32).abs() <= 1,
                            "{} {}px: {} vs {}",
                            format,
                            side,
                            a,
                            b
                        );
                    }
                }
                crate::common::color_format::ChannelSize::_16bit => {
                    let a: &[u16] = bytemuck::cast_slice(img.bytes());
                    let b: &[u16] = bytemuck::cast_slice(restored.bytes());
                    for (a, b) in a.iter().zip(b.iter()) {
                        assert!(
                            (*a as i64 - *b as i64).abs() <= 1,
                            "{} {}px: {} vs {}",
                            format,
                            side,
                            a,
                            b
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn channel_matrix_round_trips_samples() {
    let desc = ImageDesc::new(2, 2, ColorFormat::RGB_U8);
    let img = crate::image::Image::from_vec(desc, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12])
        .unwrap();

    let green = channel_matrix(&img, 1);
    assert_eq!(green.at(0, 0), 2.0);
    assert_eq!(green.at(0, 1), 5.0);
    assert_eq!(green.at(1, 1), 11.0);

    let mut out = crate::image::Image::new_empty(desc).unwrap();
    write_channel(&green, &mut out, 1);
    assert_eq!(out.pixel_bytes(1, 1), &[0, 11, 0]);
}
