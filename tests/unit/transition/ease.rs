use super::*;

const ALL: [Ease; 3] = [Ease::Linear, Ease::InOutQuad, Ease::InOutCubic];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn in_out_cubic_is_symmetric_around_the_midpoint() {
    let e = Ease::InOutCubic;
    assert_eq!(e.apply(0.5), 0.5);
    assert!((e.apply(0.2) + e.apply(0.8) - 1.0).abs() < 1e-12);
    assert_eq!(e.apply(-1.0), 0.0);
    assert_eq!(e.apply(2.0), 1.0);
}
