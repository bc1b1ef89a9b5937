extern crate nalgebra as na;

use na::{DMatrix, UnitQuaternion, Vector3};
use rand::{rngs::SmallRng, Rng, SeedableRng};

use diodem::numerics::gap_fill::{nan_interp, nan_interp_quat};
use diodem::numerics::interpolation::NaturalCubicSpline;
use diodem::resample::resample_signal;
use diodem::{hz_helper, resample, DiodemError, Interpolation, Rates, ResampleOptions, Signal, SignalKind, Tree};

fn options(vec_interp: Interpolation) -> ResampleOptions {
    ResampleOptions { quat_detect: true, vec_interp }
}

fn random_quaternions(n: usize, seed: u64) -> DMatrix<f64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut data = DMatrix::<f64>::zeros(n, 4);
    for i in 0..n {
        let q = rng.gen::<UnitQuaternion<f64>>();
        data[(i, 0)] = q.w;
        data[(i, 1)] = q.i;
        data[(i, 2)] = q.j;
        data[(i, 3)] = q.k;
    }
    data
}

fn z_rotation_signal(n: usize, step: f64) -> DMatrix<f64> {
    DMatrix::from_fn(n, 4, |r, c| {
        let half_angle = 0.5 * step * r as f64;
        match c {
            0 => half_angle.cos(),
            3 => half_angle.sin(),
            _ => 0.0
        }
    })
}

#[test]
fn output_length_follows_rate_ratio() {
    let cases = [(1000usize, 120.0, 100.0), (1000, 40.0, 100.0), (997, 100.0, 33.0), (121, 120.0, 100.0), (10, 10.0, 10.0)];
    for (n, hz_in, hz_out) in cases {
        let signal = Signal::vector(DMatrix::from_fn(n, 3, |r, c| (r * (c + 1)) as f64));
        for method in [Interpolation::Linear, Interpolation::Cubic] {
            let out = resample_signal(&signal, hz_in, hz_out, &options(method)).unwrap();
            let expected = n as f64 * hz_out / hz_in;
            assert!((out.len() as f64 - expected).abs() <= 1.0, "n={} {}->{}: got {}", n, hz_in, hz_out, out.len());
            assert_eq!(out.channels(), 3);
            assert!(!out.is_1d());
        }
    }
}

#[test]
fn upsampling_by_integer_factor_hits_exact_length() {
    let signal = Signal::vector(DMatrix::zeros(1000, 3));
    let out = resample_signal(&signal, 40.0, 100.0, &options(Interpolation::Linear)).unwrap();
    assert_eq!(out.len(), 2500);
}

#[test]
fn linear_interpolation_of_a_ramp_is_exact() {
    let signal = Signal::vector_1d((0..10).map(|i| i as f64).collect());
    let out = resample_signal(&signal, 10.0, 20.0, &options(Interpolation::Linear)).unwrap();

    assert_eq!(out.shape(), vec!(20));
    for k in 0..19 {
        assert!((out.data()[(k, 0)] - 0.5 * k as f64).abs() < 1e-12);
    }
    // past the last input sample the position is clamped
    assert!((out.data()[(19, 0)] - 9.0).abs() < 1e-12);
}

#[test]
fn cubic_on_one_dimensional_signal_keeps_shape() {
    let signal = Signal::vector_1d((0..50).map(|i| (0.1 * i as f64).sin()).collect());
    let out = resample_signal(&signal, 50.0, 100.0, &options(Interpolation::Cubic)).unwrap();

    assert!(out.is_1d());
    assert_eq!(out.shape(), vec!(100));
    // knots are reproduced
    for k in 0..50 {
        assert!((out.data()[(2 * k, 0)] - (0.1 * k as f64).sin()).abs() < 1e-12);
    }
}

#[test]
fn natural_spline_reproduces_straight_lines() {
    let spline = NaturalCubicSpline::new(na::DVector::from_vec(vec!(1.0, 3.0, 5.0, 7.0, 9.0)));
    for t in [0.0, 0.25, 1.5, 2.75, 4.0] {
        assert!((spline.evaluate(t) - (1.0 + 2.0 * t)).abs() < 1e-12);
    }
    // clamped outside the knots
    assert!((spline.evaluate(4.0000001) - 9.0).abs() < 1e-12);
    assert!((spline.evaluate(-1.0) - 1.0).abs() < 1e-12);
}

#[test]
fn natural_spline_has_zero_curvature_at_the_ends() {
    let y = na::DVector::from_vec(vec!(0.0, 1.0, 0.0, 1.0, 0.0, 1.0));
    let spline = NaturalCubicSpline::new(y);
    let h = 1e-4;
    let second_derivative = |t: f64| (spline.evaluate(t + h) - 2.0 * spline.evaluate(t) + spline.evaluate(t - h)) / (h * h);
    assert!(second_derivative(h).abs() < 1e-2);
    assert!(second_derivative(5.0 - h).abs() < 1e-2);
}

#[test]
fn orientation_output_is_unit_norm() {
    let signal = Signal::orientation(random_quaternions(240, 7)).unwrap();
    for (hz_in, hz_out) in [(120.0, 100.0), (120.0, 333.0), (120.0, 37.0)] {
        let out = resample_signal(&signal, hz_in, hz_out, &options(Interpolation::Cubic)).unwrap();
        assert_eq!(out.channels(), 4);
        assert!(out.is_orientation());
        for row in out.data().row_iter() {
            assert!((row.norm() - 1.0).abs() < 1e-9);
        }
    }
}

#[test]
fn quaternion_interpolation_follows_the_rotation() {
    let signal = Signal::orientation(z_rotation_signal(20, 0.2)).unwrap();
    let out = resample_signal(&signal, 10.0, 20.0, &options(Interpolation::Linear)).unwrap();

    for k in 0..38 {
        let half_angle = 0.5 * 0.1 * k as f64;
        assert!((out.data()[(k, 0)] - half_angle.cos()).abs() < 1e-9, "sample {}", k);
        assert!((out.data()[(k, 3)] - half_angle.sin()).abs() < 1e-9, "sample {}", k);
    }
}

#[test]
fn quaternion_interpolation_takes_the_short_way_around() {
    // the second sample is the same rotation with flipped sign
    let q = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.3);
    let data = DMatrix::from_row_slice(2, 4, &[q.w, q.i, q.j, q.k, -q.w, -q.i, -q.j, -q.k]);
    let signal = Signal::orientation(data).unwrap();
    let out = resample_signal(&signal, 1.0, 2.0, &options(Interpolation::Linear)).unwrap();

    let mid = out.sample(1);
    for (v, expected) in mid.iter().zip([q.w, q.i, q.j, q.k]) {
        assert!((v - expected).abs() < 1e-9);
    }
}

#[test]
fn quat_detect_off_interpolates_channel_wise() {
    let signal = Signal::orientation(z_rotation_signal(3, 2.0)).unwrap();
    let no_detect = ResampleOptions { quat_detect: false, vec_interp: Interpolation::Linear };
    let out = resample_signal(&signal, 1.0, 2.0, &no_detect).unwrap();

    assert_eq!(out.kind(), SignalKind::Orientation);
    let row = out.data().row(1);
    assert!((row[0] - 0.5 * (1.0 + 1f64.cos())).abs() < 1e-12);
    assert!(row.norm() < 1.0 - 1e-3);
}

#[test]
fn gaps_are_filled_before_interpolation() {
    let data = DMatrix::from_row_slice(5, 2, &[f64::NAN, 1.0, 1.0, f64::NAN, f64::NAN, 3.0, 3.0, f64::INFINITY, 4.0, f64::NAN]);
    let filled = nan_interp(&data);
    assert_eq!(filled.column(0).iter().copied().collect::<Vec<f64>>(), vec!(1.0, 1.0, 2.0, 3.0, 4.0));
    assert_eq!(filled.column(1).iter().copied().collect::<Vec<f64>>(), vec!(1.0, 2.0, 3.0, 3.0, 3.0));

    let signal = Signal::vector(data);
    let out = resample_signal(&signal, 100.0, 40.0, &options(Interpolation::Cubic)).unwrap();
    assert!(out.data().iter().all(|v| v.is_finite()));
}

#[test]
fn all_nan_channel_is_left_alone() {
    let data = DMatrix::from_row_slice(3, 2, &[f64::NAN, 1.0, f64::NAN, 2.0, f64::NAN, 3.0]);
    let filled = nan_interp(&data);
    assert!(filled.column(0).iter().all(|v| v.is_nan()));
    assert_eq!(filled.column(1).iter().copied().collect::<Vec<f64>>(), vec!(1.0, 2.0, 3.0));
}

#[test]
fn quaternion_gaps_are_bridged_on_the_sphere() {
    let mut data = z_rotation_signal(5, 0.4);
    for c in 0..4 {
        data[(2, c)] = f64::NAN;
    }
    let filled = nan_interp_quat(&data);
    let expected = z_rotation_signal(5, 0.4);
    for c in 0..4 {
        assert!((filled[(2, c)] - expected[(2, c)]).abs() < 1e-9);
    }
}

#[test]
fn resample_walks_the_whole_tree() {
    let segment = Tree::branch()
        .with("quat", Tree::Leaf(Signal::orientation(random_quaternions(120, 3)).unwrap()))
        .with("marker1", Tree::Leaf(Signal::vector(DMatrix::zeros(120, 3))))
        .with("imu_rigid", Tree::branch()
            .with("acc", Tree::Leaf(Signal::vector(DMatrix::zeros(40, 3))))
            .with("gyr", Tree::Leaf(Signal::vector(DMatrix::zeros(40, 3))))
            .with("mag", Tree::Leaf(Signal::vector(DMatrix::zeros(40, 3)))));
    let data = Tree::branch().with("seg1", segment);
    let hz_in = hz_helper(&["seg1"], &["imu_rigid"], &[1], 40.0, 120.0);

    let out = resample(&data, &Rates::Map(hz_in), &Rates::Scalar(100.0), &options(Interpolation::Cubic)).unwrap();

    assert!(out.same_structure(&data));
    assert_eq!(out.leaf_at("seg1/quat").unwrap().len(), 100);
    assert_eq!(out.leaf_at("seg1/marker1").unwrap().len(), 100);
    assert_eq!(out.leaf_at("seg1/imu_rigid/acc").unwrap().len(), 100);
}

#[test]
fn resample_rejects_mismatched_rate_map() {
    let data = Tree::branch().with("seg1", Tree::branch().with("marker1", Tree::Leaf(Signal::vector(DMatrix::zeros(10, 3)))));
    let hz_in = Tree::branch().with("seg1", Tree::branch().with("marker2", Tree::Leaf(120.0)));
    let result = resample(&data, &Rates::Map(hz_in), &Rates::Scalar(100.0), &ResampleOptions::default());
    assert!(matches!(result, Err(DiodemError::TreeStructureMismatch { .. })));
}

#[test]
fn unknown_interpolation_method_is_rejected() {
    match "quadratic".parse::<Interpolation>() {
        Err(DiodemError::UnsupportedInterpolationMethod(method)) => assert_eq!(method, "quadratic"),
        other => panic!("expected unsupported method, got {:?}", other)
    }
    assert_eq!("cubic".parse::<Interpolation>().unwrap(), Interpolation::Cubic);
    assert_eq!("linear".parse::<Interpolation>().unwrap(), Interpolation::Linear);
}

#[test]
fn malformed_shapes_are_rejected() {
    assert!(matches!(Signal::from_shape(SignalKind::Vector, &[2, 2, 2], vec!(0.0; 8)), Err(DiodemError::InvalidSignalShape { .. })));
    assert!(matches!(Signal::from_shape(SignalKind::Vector, &[3, 2], vec!(0.0; 5)), Err(DiodemError::InvalidSignalShape { .. })));
    assert!(matches!(Signal::from_shape(SignalKind::Orientation, &[3, 3], vec!(0.0; 9)), Err(DiodemError::InvalidSignalShape { .. })));
    assert!(matches!(Signal::orientation(DMatrix::zeros(3, 3)), Err(DiodemError::InvalidSignalShape { .. })));

    let flat = Signal::from_shape(SignalKind::Vector, &[4], vec!(1.0, 2.0, 3.0, 4.0)).unwrap();
    assert!(flat.is_1d());
    let two_d = Signal::from_shape(SignalKind::Vector, &[2, 2], vec!(1.0, 2.0, 3.0, 4.0)).unwrap();
    assert_eq!(two_d.sample(1), vec!(3.0, 4.0));
}

#[test]
fn detect_tags_four_channels_as_orientation() {
    assert_eq!(Signal::detect(DMatrix::zeros(2, 4)).kind(), SignalKind::Orientation);
    assert_eq!(Signal::detect(DMatrix::zeros(2, 3)).kind(), SignalKind::Vector);
}

#[test]
fn empty_signal_resamples_to_empty() {
    let signal = Signal::vector(DMatrix::zeros(0, 3));
    let out = resample_signal(&signal, 120.0, 100.0, &options(Interpolation::Cubic)).unwrap();
    assert!(out.is_empty());
    assert_eq!(out.channels(), 3);
}

#[test]
fn non_positive_rates_are_rejected() {
    let signal = Signal::vector(DMatrix::zeros(10, 3));
    for (hz_in, hz_out) in [(0.0, 100.0), (100.0, -1.0), (f64::NAN, 100.0)] {
        match resample_signal(&signal, hz_in, hz_out, &ResampleOptions::default()) {
            Err(DiodemError::InvalidSignalShape { shape, .. }) => assert_eq!(shape, vec!(10, 3)),
            other => panic!("{} Hz -> {} Hz: expected invalid shape, got {:?}", hz_in, hz_out, other)
        }
    }

    let data = Tree::branch().with("a", Tree::Leaf(signal));
    let hz_in = Rates::Map(Tree::branch().with("a", Tree::Leaf(0.0)));
    assert!(matches!(resample(&data, &hz_in, &Rates::Scalar(100.0), &ResampleOptions::default()), Err(DiodemError::InvalidSignalShape { .. })));
}
