use diodem::rates::RateMapSchema;
use diodem::{hz_helper, DiodemError, Rates, Tree};

#[test]
fn hz_helper_builds_one_rate_per_leaf() {
    let hz = hz_helper(&["seg1", "seg2"], &["imu_rigid", "imu_flex"], &[1, 2, 3, 4], 40.0, 120.0);

    assert_eq!(hz.keys(), vec!("seg1", "seg2"));
    assert_eq!(hz.get("seg1").unwrap().keys(), vec!("imu_flex", "imu_rigid", "marker1", "marker2", "marker3", "marker4", "quat"));
    // 2 imus x 3 groups + 4 markers + quat, per segment
    assert_eq!(hz.leaf_count(), 2 * (6 + 4 + 1));
    assert_eq!(hz.leaf_at("seg2/imu_flex/gyr"), Some(&40.0));
    assert_eq!(hz.leaf_at("seg2/marker3"), Some(&120.0));
    assert_eq!(hz.leaf_at("seg1/quat"), Some(&120.0));
}

#[test]
fn default_schema_matches_hz_helper() {
    let from_schema = RateMapSchema::default().build(&["seg3"]);
    let from_helper = hz_helper(&["seg3"], &["imu_rigid", "imu_flex"], &[1, 2, 3, 4], 40.0, 120.0);
    assert_eq!(from_schema, from_helper);
}

#[test]
fn scalar_rates_are_broadcast() {
    let shape = Tree::branch().with("a", Tree::Leaf(())).with("b", Tree::branch().with("c", Tree::Leaf(())));
    let hz = Rates::from(100.0).resolve(&shape).unwrap();
    assert_eq!(hz.leaves(), vec!(&100.0, &100.0));
    assert!(hz.same_structure(&shape));
}

#[test]
fn rate_maps_must_mirror_the_signal_tree() {
    let shape = Tree::branch().with("a", Tree::Leaf(()));
    let hz = Rates::from(Tree::branch().with("a", Tree::Leaf(40.0)).with("b", Tree::Leaf(100.0)));
    match hz.resolve(&shape) {
        Err(DiodemError::TreeStructureMismatch { path }) => assert_eq!(path, "b"),
        other => panic!("expected structure mismatch, got {:?}", other)
    }
}
