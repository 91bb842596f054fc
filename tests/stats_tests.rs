use dax_tick_analyzer::indicator::stats::{
    diff, max_present, mean, mean_present, quantile, sample_std, sample_std_present,
};

#[test]
fn diff_has_no_first_value() {
    assert_eq!(diff(&[1.0, 3.0, 2.0]), vec![None, Some(2.0), Some(-1.0)]);
    assert!(diff(&[]).is_empty());
}

#[test]
fn mean_skips_missing_values() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean_present(&[None, Some(1.0), Some(3.0)]), Some(2.0));
    assert_eq!(mean_present(&[None, None]), None);
    assert_eq!(max_present(&[None, Some(1.0), Some(-3.0)]), Some(1.0));
}

#[test]
fn sample_std_uses_n_minus_one() {
    let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    assert!((sample_std(&v).unwrap() - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    assert_eq!(sample_std(&[1.0]), None);
    assert_eq!(sample_std_present(&[None, Some(1.0)]), None);
}

#[test]
fn quantile_interpolates_linearly() {
    let v: Vec<Option<f64>> = [4.0, 1.0, 3.0, 2.0].iter().map(|x| Some(*x)).collect();
    assert!((quantile(&v, 0.5).unwrap() - 2.5).abs() < 1e-12);
    assert!((quantile(&v, 0.0).unwrap() - 1.0).abs() < 1e-12);
    assert!((quantile(&v, 1.0).unwrap() - 4.0).abs() < 1e-12);
    assert!((quantile(&v, 0.33).unwrap() - 1.99).abs() < 1e-12);
    assert_eq!(quantile(&[None], 0.5), None);
}
