use ndarray::Array3;
use serde_json::json;

use darkroom_core::error::DarkroomError;
use darkroom_core::image::Image;
use darkroom_core::ops::arith::ArithOp;
use darkroom_core::step::{execute_spec, parse_step_list, ExecContext, Operation, OperationSpec};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_ramp(h: usize, w: usize) -> Image {
    let data = Array3::from_shape_fn((h, w, 1), |(row, col, _)| ((row * w + col) % 256) as u8);
    Image::new(data).unwrap()
}

// ---------------------------------------------------------------------------
// parse_step_list
// ---------------------------------------------------------------------------

#[test]
fn test_parse_step_list_accepts_wire_format() {
    let steps = parse_step_list(
        r#"[{"op": "median", "params": {"kernel_size": 5}}, {"op": "gamma"}]"#,
    )
    .unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].op, "median");
    assert!(steps[1].params.is_null());
}

#[test]
fn test_parse_step_list_rejects_malformed_json() {
    let err = parse_step_list(r#"[{"op": "#).unwrap_err();
    assert!(matches!(err, DarkroomError::InvalidRequest(_)));
}

#[test]
fn test_parse_step_list_rejects_non_array_payload() {
    let err = parse_step_list(r#"{"op": "gamma"}"#).unwrap_err();
    assert!(matches!(err, DarkroomError::InvalidRequest(_)));
}

// ---------------------------------------------------------------------------
// Operation::parse
// ---------------------------------------------------------------------------

#[test]
fn test_parse_unknown_operation() {
    let spec = OperationSpec::bare("emboss");
    let err = Operation::parse(&spec).unwrap_err();
    assert!(matches!(err, DarkroomError::UnknownOperation(name) if name == "emboss"));
}

#[test]
fn test_parse_rejects_wrongly_typed_params() {
    let spec = OperationSpec::new("gamma", json!({"gamma": "bright"}));
    let err = Operation::parse(&spec).unwrap_err();
    assert!(matches!(err, DarkroomError::InvalidParams { op, .. } if op == "gamma"));
}

#[test]
fn test_parse_ignores_unknown_param_keys() {
    let spec = OperationSpec::new("gamma", json!({"gamma": 0.5, "vibe": "moody"}));
    let op = Operation::parse(&spec).unwrap();
    assert!(matches!(op, Operation::Gamma(p) if (p.gamma - 0.5).abs() < 1e-6));
}

#[test]
fn test_parse_null_params_take_defaults() {
    let op = Operation::parse(&OperationSpec::bare("median")).unwrap();
    assert!(matches!(op, Operation::Median(p) if p.kernel_size == 3));

    let op = Operation::parse(&OperationSpec::bare("gaussian")).unwrap();
    assert!(matches!(op, Operation::Gaussian(p) if p.kernel_size == 5 && p.sigma == 0.0));

    let op = Operation::parse(&OperationSpec::bare("clahe")).unwrap();
    assert!(
        matches!(op, Operation::Clahe(p) if (p.clip_limit - 2.0).abs() < 1e-6 && p.tile_grid_size == 8)
    );
}

#[test]
fn test_parse_arithmetic_requires_second_image() {
    let spec = OperationSpec::new("arithmetic", json!({"operation": "add"}));
    let err = Operation::parse(&spec).unwrap_err();
    assert!(matches!(err, DarkroomError::MissingOperand(_)));
}

#[test]
fn test_parse_arithmetic_defaults_to_add() {
    let spec = OperationSpec::new("arithmetic", json!({"image2_path": "other.png"}));
    let op = Operation::parse(&spec).unwrap();
    assert!(matches!(op, Operation::Arithmetic(p) if p.operation == ArithOp::Add));
}

#[test]
fn test_parse_arithmetic_unknown_sub_operation() {
    let spec = OperationSpec::new(
        "arithmetic",
        json!({"operation": "xor", "image2_path": "other.png"}),
    );
    let err = Operation::parse(&spec).unwrap_err();
    assert!(matches!(err, DarkroomError::UnsupportedArithmetic(_)));
}

// ---------------------------------------------------------------------------
// name / category / suffix
// ---------------------------------------------------------------------------

#[test]
fn test_name_round_trips_the_wire_name() {
    for wire in [
        "gamma",
        "clahe",
        "equalize",
        "log",
        "median",
        "gaussian",
        "unsharp",
        "contrast_stretching",
        "negative",
        "noise_gaussian",
        "noise_salt_pepper",
        "sim_downsampling",
        "sim_quantization",
    ] {
        let op = Operation::parse(&OperationSpec::bare(wire)).unwrap();
        assert_eq!(op.name(), wire);
    }
}

#[test]
fn test_categories() {
    let median = Operation::parse(&OperationSpec::bare("median")).unwrap();
    assert_eq!(median.category(), "Restoration");

    let gamma = Operation::parse(&OperationSpec::bare("gamma")).unwrap();
    assert_eq!(gamma.category(), "Enhancement");

    let noise = Operation::parse(&OperationSpec::bare("noise_salt_pepper")).unwrap();
    assert_eq!(noise.category(), "Simulation");
}

#[test]
fn test_suffix_encodes_parameters() {
    let op = Operation::parse(&OperationSpec::new("gamma", json!({"gamma": 0.5}))).unwrap();
    assert_eq!(op.suffix(), "gamma0.5");

    let op = Operation::parse(&OperationSpec::new("median", json!({"kernel_size": 3}))).unwrap();
    assert_eq!(op.suffix(), "median3");

    let op = Operation::parse(&OperationSpec::new("noise_salt_pepper", json!({"prob": 0.05})))
        .unwrap();
    assert_eq!(op.suffix(), "salt_pepper_prob0.05");
}

// ---------------------------------------------------------------------------
// execute_spec
// ---------------------------------------------------------------------------

#[test]
fn test_execute_default_gamma_is_identity() {
    let img = make_ramp(8, 8);
    let mut ctx = ExecContext::seeded(0);
    let out = execute_spec(&img, &OperationSpec::bare("gamma"), &mut ctx).unwrap();
    assert_eq!(img, out);
}

#[test]
fn test_execute_negative_via_spec() {
    let img = Image::gray_filled(4, 4, 10);
    let mut ctx = ExecContext::seeded(0);
    let out = execute_spec(&img, &OperationSpec::bare("negative"), &mut ctx).unwrap();
    for &v in out.data().iter() {
        assert_eq!(v, 245);
    }
}

#[test]
fn test_execute_noise_is_reproducible_per_seed() {
    let img = Image::gray_filled(16, 16, 128);
    let spec = OperationSpec::new("noise_gaussian", json!({"mean": 0.0, "sigma": 20.0}));

    let mut ctx_a = ExecContext::seeded(99);
    let mut ctx_b = ExecContext::seeded(99);
    let a = execute_spec(&img, &spec, &mut ctx_a).unwrap();
    let b = execute_spec(&img, &spec, &mut ctx_b).unwrap();
    assert_eq!(a, b);

    let mut ctx_c = ExecContext::seeded(100);
    let c = execute_spec(&img, &spec, &mut ctx_c).unwrap();
    assert_ne!(a, c, "different seeds should give different noise");
}

#[test]
fn test_execute_arithmetic_with_missing_file() {
    let img = make_ramp(8, 8);
    let spec = OperationSpec::new(
        "arithmetic",
        json!({"operation": "add", "image2_path": "/nonexistent/other.png"}),
    );
    let mut ctx = ExecContext::seeded(0);
    let err = execute_spec(&img, &spec, &mut ctx).unwrap_err();
    assert!(matches!(err, DarkroomError::MissingOperand(_)));
}

#[test]
fn test_every_operation_preserves_shape_and_sample_range() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(2024);
    let gray = Image::new(Array3::from_shape_fn((24, 24, 1), |_| rng.random())).unwrap();
    let color = Image::new(Array3::from_shape_fn((24, 24, 3), |_| rng.random())).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let gray_operand = dir.path().join("gray.png");
    let color_operand = dir.path().join("color.png");
    darkroom_core::io::save_image(&gray, &gray_operand).unwrap();
    darkroom_core::io::save_image(&color, &color_operand).unwrap();

    // Defaults plus one non-default parameter set per operation.
    let param_sets: Vec<(&str, Vec<serde_json::Value>)> = vec![
        ("gamma", vec![json!(null), json!({"gamma": 0.4}), json!({"gamma": 2.2})]),
        ("clahe", vec![json!(null), json!({"clip_limit": 4.0, "tile_grid_size": 3})]),
        ("equalize", vec![json!(null)]),
        ("log", vec![json!(null), json!({"c": 2.0})]),
        ("median", vec![json!(null), json!({"kernel_size": 5})]),
        ("gaussian", vec![json!(null), json!({"kernel_size": 7, "sigma": 2.0})]),
        ("unsharp", vec![json!(null), json!({"strength": 3.0})]),
        (
            "contrast_stretching",
            vec![json!(null), json!({"low_percentile": 10.0, "high_percentile": 90.0})],
        ),
        ("negative", vec![json!(null)]),
        ("noise_gaussian", vec![json!(null), json!({"mean": 10.0, "sigma": 40.0})]),
        ("noise_salt_pepper", vec![json!(null), json!({"prob": 0.3})]),
        ("sim_downsampling", vec![json!(null), json!({"factor": 0.3})]),
        ("sim_quantization", vec![json!(null), json!({"bits": 1})]),
    ];

    let mut ctx = ExecContext::seeded(7);
    for img in [&gray, &color] {
        let operand = if img.is_color() { &color_operand } else { &gray_operand };
        let mut specs: Vec<OperationSpec> = param_sets
            .iter()
            .flat_map(|(op, sets)| sets.iter().map(|p| OperationSpec::new(*op, p.clone())))
            .collect();
        for sub in ["add", "subtract", "multiply", "divide"] {
            specs.push(OperationSpec::new(
                "arithmetic",
                json!({"operation": sub, "image2_path": operand}),
            ));
        }

        for spec in &specs {
            let out = execute_spec(img, spec, &mut ctx)
                .unwrap_or_else(|e| panic!("{} failed on random input: {e}", spec.op));
            assert_eq!(out.data().dim(), img.data().dim(), "{} changed shape", spec.op);
            // Every sample must be a fixed point of clip-to-[0, 255].
            assert_eq!(
                Image::from_f32_clipped(out.to_f32()),
                out,
                "{} produced out-of-range samples",
                spec.op
            );
        }
    }
}

#[test]
fn test_execute_chain_matches_direct_calls() {
    use darkroom_core::ops::filter::median_filter;
    use darkroom_core::ops::point::gamma;

    let img = make_ramp(16, 16);
    let mut ctx = ExecContext::seeded(0);

    let via_specs = {
        let step1 = execute_spec(
            &img,
            &OperationSpec::new("median", json!({"kernel_size": 3})),
            &mut ctx,
        )
        .unwrap();
        execute_spec(
            &step1,
            &OperationSpec::new("gamma", json!({"gamma": 0.5})),
            &mut ctx,
        )
        .unwrap()
    };
    let direct = gamma(&median_filter(&img, 3), 0.5);
    assert_eq!(via_specs, direct);
}
