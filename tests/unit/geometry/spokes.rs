use super::*;

fn config(count: i64) -> SpokeConfig {
    SpokeConfig {
        count,
        inner_radius: 40.0,
        outer_radius: 60.0,
        min_thickness: 2.0,
        max_thickness: 12.0,
        peak_angle: 0.0,
        stroke: Rgb8::new(0x33, 0x66, 0xff),
        inverted: false,
        angle_offset: 0.0,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn width_is_max_at_peak_and_min_at_peak_when_inverted() {
    assert!(approx(spoke_width(1.0, 1.0, 2.0, 12.0, false), 12.0));
    assert!(approx(spoke_width(1.0, 1.0, 2.0, 12.0, true), 2.0));
}

#[test]
fn width_halfway_round_is_the_midpoint() {
    let w = spoke_width(std::f64::consts::PI, 0.0, 2.0, 12.0, false);
    assert!(approx(w, 7.0), "{w}");
}

#[test]
fn negative_offsets_wrap_before_normalizing() {
    // A quarter turn behind the peak is three quarters of the way round.
    let behind = spoke_width(-TAU / 4.0, 0.0, 0.0, 4.0, true);
    assert!(approx(behind, 3.0), "{behind}");
    let ahead = spoke_width(3.0 * TAU / 4.0, 0.0, 0.0, 4.0, true);
    assert!(approx(behind, ahead));
}

#[test]
fn tiny_negative_offset_stays_in_range() {
    let w = spoke_width(-1e-18, 0.0, 2.0, 12.0, false);
    assert!((2.0..=12.0).contains(&w), "{w}");
}

#[test]
fn inversion_is_a_complement() {
    for i in 0..64 {
        let theta = -7.0 + i as f64 * 0.37;
        for peak in [0.0, 1.3, -2.0, 9.0] {
            let a = spoke_width(theta, peak, 3.0, 17.0, false);
            let b = spoke_width(theta, peak, 3.0, 17.0, true);
            assert!((a + b - 20.0).abs() < 1e-9, "theta={theta} peak={peak}");
        }
    }
}

#[test]
fn six_spokes_are_sixty_degrees_apart() {
    let spokes = build_spokes(&config(6));
    assert_eq!(spokes.len(), 6);

    for (i, s) in spokes.iter().enumerate() {
        let expected = (60.0 * i as f64).to_radians();
        assert!(approx(s.angle, expected), "spoke {i}: {}", s.angle);

        let r0 = s.line.p0.distance(CENTER);
        let r1 = s.line.p1.distance(CENTER);
        assert!(approx(r0, 40.0) && approx(r1, 60.0), "spoke {i}: {r0} {r1}");

        let dir = s.line.p1 - s.line.p0;
        assert!(approx(dir.y.atan2(dir.x).rem_euclid(TAU), expected.rem_euclid(TAU)));
    }

    // First spoke points along +x from the center.
    assert!(approx(spokes[0].line.p0.x, 240.0) && approx(spokes[0].line.p0.y, 200.0));
    assert!(approx(spokes[0].line.p1.x, 260.0));
}

#[test]
fn spokes_are_evenly_spaced_for_any_count() {
    for count in [1, 4, 7, 36, 120] {
        let mut cfg = config(count);
        cfg.angle_offset = 0.4;
        let spokes = build_spokes(&cfg);
        assert_eq!(spokes.len(), count as usize);
        assert!(approx(spokes[0].angle, 0.4));
        for pair in spokes.windows(2) {
            assert!(approx(pair[1].angle - pair[0].angle, TAU / count as f64));
        }
    }
}

#[test]
fn non_positive_count_yields_nothing() {
    assert!(build_spokes(&config(0)).is_empty());
    assert!(build_spokes(&config(-3)).is_empty());
}

#[test]
fn thickness_ramp_rotates_with_the_ring() {
    let mut cfg = config(4);
    cfg.angle_offset = 1.0;
    let spokes = build_spokes(&cfg);
    // The first spoke sits exactly on the shifted peak.
    assert!(approx(spokes[0].width, cfg.max_thickness));
    assert!(spokes.iter().all(|s| s.stroke == cfg.stroke));
}
