use ndarray::Array3;

use darkroom_core::error::DarkroomError;
use darkroom_core::image::Image;
use darkroom_core::ops::arith::{arithmetic, average, ArithOp};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_ramp(h: usize, w: usize) -> Image {
    let data = Array3::from_shape_fn((h, w, 1), |(row, col, _)| ((row * w + col) % 256) as u8);
    Image::new(data).unwrap()
}

// ---------------------------------------------------------------------------
// ArithOp
// ---------------------------------------------------------------------------

#[test]
fn test_arith_op_parse_known_names() {
    assert_eq!(ArithOp::parse("add").unwrap(), ArithOp::Add);
    assert_eq!(ArithOp::parse("subtract").unwrap(), ArithOp::Subtract);
    assert_eq!(ArithOp::parse("multiply").unwrap(), ArithOp::Multiply);
    assert_eq!(ArithOp::parse("divide").unwrap(), ArithOp::Divide);
}

#[test]
fn test_arith_op_parse_unknown_name() {
    let err = ArithOp::parse("modulo").unwrap_err();
    assert!(matches!(err, DarkroomError::UnsupportedArithmetic(name) if name == "modulo"));
}

// ---------------------------------------------------------------------------
// arithmetic
// ---------------------------------------------------------------------------

#[test]
fn test_add_is_blended_average() {
    let a = Image::gray_filled(4, 4, 100);
    let b = Image::gray_filled(4, 4, 200);
    let out = arithmetic(&a, &b, ArithOp::Add).unwrap();
    for &v in out.data().iter() {
        assert_eq!(v, 150);
    }
}

#[test]
fn test_subtract_self_is_zero() {
    let img = make_ramp(8, 8);
    let out = arithmetic(&img, &img, ArithOp::Subtract).unwrap();
    for &v in out.data().iter() {
        assert_eq!(v, 0);
    }
}

#[test]
fn test_subtract_is_absolute_difference() {
    let a = Image::gray_filled(4, 4, 50);
    let b = Image::gray_filled(4, 4, 200);
    let out = arithmetic(&a, &b, ArithOp::Subtract).unwrap();
    for &v in out.data().iter() {
        assert_eq!(v, 150, "subtract must be symmetric in magnitude");
    }
}

#[test]
fn test_multiply_by_white_is_identity() {
    let img = make_ramp(8, 8);
    let white = Image::gray_filled(8, 8, 255);
    let out = arithmetic(&img, &white, ArithOp::Multiply).unwrap();
    assert_eq!(img, out);
}

#[test]
fn test_multiply_by_black_is_black() {
    let img = make_ramp(8, 8);
    let black = Image::gray_filled(8, 8, 0);
    let out = arithmetic(&img, &black, ArithOp::Multiply).unwrap();
    for &v in out.data().iter() {
        assert_eq!(v, 0);
    }
}

#[test]
fn test_divide_constant_ratio_collapses_to_black() {
    // A constant quotient has no extrema spread; normalization maps it to 0.
    let a = Image::gray_filled(4, 4, 120);
    let b = Image::gray_filled(4, 4, 60);
    let out = arithmetic(&a, &b, ArithOp::Divide).unwrap();
    for &v in out.data().iter() {
        assert_eq!(v, 0);
    }
}

#[test]
fn test_divide_normalizes_to_full_range() {
    let a = make_ramp(8, 8);
    let b = Image::gray_filled(8, 8, 10);
    let out = arithmetic(&a, &b, ArithOp::Divide).unwrap();
    let min = out.data().iter().copied().min().unwrap();
    let max = out.data().iter().copied().max().unwrap();
    assert_eq!(min, 0);
    assert_eq!(max, 255);
}

#[test]
fn test_arithmetic_resizes_second_operand() {
    let a = Image::gray_filled(8, 8, 100);
    let b = Image::gray_filled(4, 4, 200);
    let out = arithmetic(&a, &b, ArithOp::Add).unwrap();
    assert_eq!(out.height(), 8);
    assert_eq!(out.width(), 8);
    for &v in out.data().iter() {
        assert_eq!(v, 150);
    }
}

#[test]
fn test_arithmetic_rejects_channel_mismatch() {
    let a = Image::gray_filled(8, 8, 100);
    let b = Image::rgb_filled(8, 8, [1, 2, 3]);
    let err = arithmetic(&a, &b, ArithOp::Add).unwrap_err();
    assert!(matches!(
        err,
        DarkroomError::ChannelMismatch { expected: 1, got: 3 }
    ));
}

// ---------------------------------------------------------------------------
// average
// ---------------------------------------------------------------------------

#[test]
fn test_average_empty_sequence_is_an_error() {
    let err = average(&[]).unwrap_err();
    assert!(matches!(err, DarkroomError::EmptySequence));
}

#[test]
fn test_average_of_identical_images_is_identity() {
    let img = make_ramp(8, 8);
    let out = average(&[img.clone(), img.clone(), img.clone()]).unwrap();
    assert_eq!(img, out);
}

#[test]
fn test_average_of_two_constants() {
    let a = Image::gray_filled(4, 4, 0);
    let b = Image::gray_filled(4, 4, 255);
    let out = average(&[a, b]).unwrap();
    for &v in out.data().iter() {
        assert_eq!(v, 128, "127.5 rounds up");
    }
}

#[test]
fn test_average_resizes_to_first_image() {
    let a = Image::gray_filled(8, 8, 100);
    let b = Image::gray_filled(16, 16, 200);
    let out = average(&[a, b]).unwrap();
    assert_eq!(out.height(), 8);
    assert_eq!(out.width(), 8);
    for &v in out.data().iter() {
        assert_eq!(v, 150);
    }
}

#[test]
fn test_average_rejects_channel_mismatch() {
    let a = Image::gray_filled(4, 4, 10);
    let b = Image::rgb_filled(4, 4, [10, 10, 10]);
    let err = average(&[a, b]).unwrap_err();
    assert!(matches!(err, DarkroomError::ChannelMismatch { .. }));
}
