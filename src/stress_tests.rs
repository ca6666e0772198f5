/// Production-level stress testing for the tablet-mode stack.
///
/// Long monitor runs, long filter streams and sweeps over the raw reading
/// range, looking for drift, panics and miscounted transitions.

#[cfg(test)]
mod stress_tests {
    use std::f64::consts::PI;

    use crate::classifier::*;
    use crate::export::{filter_recording, CaptureRow, CAPTURE_SEPARATOR};
    use crate::pipeline::*;
    use crate::policy::DetectionPolicy;
    use crate::signal::*;
    use crate::source::*;
    use crate::types::*;
    use crate::vector::*;

    fn laptop() -> DualSample<i32> {
        DualSample::new(RawVector::new(0, 500, 300), RawVector::new(300, -500, -500))
    }

    fn tablet() -> DualSample<i32> {
        DualSample::new(RawVector::new(0, -10, 400), RawVector::new(300, -500, -500))
    }

    /// Deterministic pseudo-random readings in `[-range, range]`.
    struct Lcg(u64);

    impl Lcg {
        fn next_reading(&mut self, range: i32) -> i32 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let span = (2 * range + 1) as u64;
            ((self.0 >> 33) % span) as i32 - range
        }

        fn next_vector(&mut self, range: i32) -> RawVector {
            RawVector::new(
                self.next_reading(range),
                self.next_reading(range),
                self.next_reading(range),
            )
        }
    }

    // ============================================================================
    // CATEGORY 1: LONG MONITOR RUNS
    // ============================================================================

    /// 10 000 polls switching posture every 100 polls
    #[test]
    fn stress_monitor_ten_thousand_polls() {
        let samples = (0..10_000).map(|i| if (i / 100) % 2 == 0 { laptop() } else { tablet() });
        let mut monitor = TabletModeMonitor::new(
            ReplaySource::new(samples),
            AlwaysOpen,
            DetectionPolicy::default(),
        );

        let mut entered = 0;
        let mut left = 0;
        for _ in 0..10_000 {
            match monitor.poll().unwrap().event {
                MonitorEvent::EnteredTablet => entered += 1,
                MonitorEvent::LeftTablet => left += 1,
                MonitorEvent::Unchanged => {}
            }
        }

        assert_eq!(entered, 50);
        assert_eq!(left, 49);
        assert_eq!(monitor.transition_count(), 99);
        assert_eq!(monitor.poll_count(), 10_000);
        assert!(monitor.is_tablet(), "last block is tablet");
        assert!(monitor.poll().is_err(), "source must be exhausted");
    }

    /// Random readings never produce two events in a row of the same kind
    #[test]
    fn stress_monitor_events_alternate() {
        let mut rng = Lcg(7);
        let samples: Vec<DualSample<i32>> = (0..5_000)
            .map(|_| DualSample::new(rng.next_vector(1024), rng.next_vector(1024)))
            .collect();
        let policy = DetectionPolicy::new(&DetectorKind::ALL, false).unwrap();
        let mut monitor = TabletModeMonitor::new(ReplaySource::new(samples), AlwaysOpen, policy);

        let mut last_event = MonitorEvent::LeftTablet;
        for _ in 0..5_000 {
            let outcome = monitor.poll().unwrap();
            assert_eq!(outcome.is_tablet(), monitor.is_tablet());
            if outcome.event != MonitorEvent::Unchanged {
                assert_ne!(outcome.event, last_event, "events must alternate");
                last_event = outcome.event;
            }
        }
    }

    // ============================================================================
    // CATEGORY 2: LONG FILTER STREAMS
    // ============================================================================

    /// Constant input is an exact fixed point over 100 000 samples
    #[test]
    fn stress_filter_constant_stream_has_no_drift() {
        let mut filter = HighPassFilter::new();
        let reading = Vector3::new(-106.0, 15.0, -504.0);
        for _ in 0..100_000 {
            assert_eq!(filter.apply(reading), reading);
        }
        assert_eq!(filter.sample_count(), 100_000);
    }

    /// Output stays inside the range of the inputs seen so far
    #[test]
    fn stress_filter_bounded_by_input_range() {
        let mut rng = Lcg(42);
        for alpha in [0.01, 0.1, 0.5, 1.0] {
            let mut filter = HighPassFilter::with_config(FilterConfig::new(alpha).unwrap());
            for _ in 0..20_000 {
                let out = filter.apply(rng.next_vector(i32::MAX / 2).as_f64());
                for value in out.to_array() {
                    assert!(value.is_finite());
                    assert!(value.abs() <= (i32::MAX / 2) as f64 + 1e-3, "alpha {alpha}: {value}");
                }
            }
        }
    }

    /// Filtering a long recording keeps one output row per input row
    #[test]
    fn stress_filter_long_recording() {
        let mut rng = Lcg(3);
        let mut input = String::new();
        for i in 0..20_000 {
            let sample = DualSample::new(rng.next_vector(600), rng.next_vector(600));
            input.push_str(&CaptureRow::new(sample, i % 3 == 0).to_csv_line(CAPTURE_SEPARATOR));
            input.push('\n');
        }

        let rows = filter_recording(&input, false, FilterConfig::default(), ' ').unwrap();
        assert_eq!(rows.len(), 20_000);
        for (i, line) in rows.iter().enumerate() {
            let row = CaptureRow::parse(line, i + 1).unwrap();
            assert_eq!(row.is_tablet, i % 3 == 0, "label must pass through untouched");
            for value in row.sample.touchscreen.to_array() {
                assert!(value.abs() <= 600);
            }
        }
    }

    // ============================================================================
    // CATEGORY 3: SWEEPS OVER THE READING RANGE
    // ============================================================================

    /// Dispatch through `DetectorKind` matches the free functions everywhere
    #[test]
    fn stress_detector_dispatch_grid() {
        let steps: Vec<f64> = (-3..=3).map(|i| i as f64 * 350.0).collect();
        for &tx in &steps {
            for &ty in &steps {
                for &tz in &steps {
                    for &kx in &steps {
                        for &kz in &steps {
                            let ts = Vector3::new(tx, ty, tz);
                            let kb = Vector3::new(kx, -ty, kz);
                            assert_eq!(
                                DetectorKind::Threshold.is_tablet(&ts, &kb),
                                detect_tabletmode_thresholds(&kb, &ts)
                            );
                            assert_eq!(
                                DetectorKind::Threshold.is_tablet(&ts, &kb),
                                matching_rule(&kb, &ts).is_some()
                            );
                            assert_eq!(
                                DetectorKind::Folded.is_tablet(&ts, &kb),
                                detect_max_folded(&ts, &kb)
                            );
                            assert_eq!(
                                DetectorKind::Formula.is_tablet(&ts, &kb),
                                detect_tabletmode_formula(&kb, &ts)
                            );
                        }
                    }
                }
            }
        }
    }

    /// Angles between random readings stay in [0, π] and are symmetric
    #[test]
    fn stress_angle_between_random_vectors() {
        let mut rng = Lcg(11);
        for _ in 0..50_000 {
            let a = rng.next_vector(1024).as_f64();
            let b = rng.next_vector(1024).as_f64();
            match (angle_between(&a, &b), angle_between(&b, &a)) {
                (Ok(ab), Ok(ba)) => {
                    assert!((0.0..=PI).contains(&ab), "{ab}");
                    assert!((ab - ba).abs() < 1e-12);
                }
                (Err(_), Err(_)) => assert!(magnitude(&a) == 0.0 || magnitude(&b) == 0.0),
                _ => panic!("asymmetric failure for {a:?} {b:?}"),
            }
        }
    }

    /// Tilt angles of random readings are finite and within ±90°
    #[test]
    fn stress_tilt_angles_random_readings() {
        let mut rng = Lcg(5);
        for _ in 0..50_000 {
            let v = rng.next_vector(2048).as_f64();
            if let Ok(angles) = tilt_angles(&v) {
                for deg in angles.to_degrees().to_array() {
                    assert!(deg.is_finite() && deg.abs() <= 90.0, "{v:?}: {deg}");
                }
            }
        }
    }
}
