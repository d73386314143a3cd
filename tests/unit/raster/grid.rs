use super::*;

#[test]
fn from_vec_validates_length() {
    assert!(Grid::from_vec(vec![1.0, 2.0, 3.0], 2, 2).is_err());
    let g = Grid::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
    assert_eq!(g.shape(), (2, 2));
    assert_eq!(g.get(1, 0), Some(&3.0));
    assert_eq!(g.get(2, 0), None);
    assert_eq!(g.get(0, 2), None);
}

#[test]
fn from_rows_rejects_ragged_input() {
    assert!(Grid::from_rows(vec![vec![1, 2], vec![3]]).is_err());
    let g = Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    assert_eq!(g.shape(), (2, 3));
    assert_eq!(g.data(), &[1, 2, 3, 4, 5, 6]);
}

#[test]
fn map_preserves_shape() {
    let g = Grid::from_rows(vec![vec![1.0, 5.0], vec![7.0, 2.0]]).unwrap();
    let m = g.map(|&v| v > 3.0);
    assert_eq!(m.shape(), g.shape());
    assert_eq!(m.count_true(), 2);
}

#[test]
fn finite_min_max_skips_nan() {
    let g = Grid::from_vec(vec![f64::NAN, 3.0, -1.0, 8.0], 2, 2).unwrap();
    assert_eq!(g.finite_min_max(), Some((-1.0, 8.0)));
    let all_nan = Grid::filled(1, 2, f64::NAN);
    assert_eq!(all_nan.finite_min_max(), None);
}

#[test]
fn resample_nearest_picks_cells_under_output_centers() {
    let g = Grid::from_fn(2, 6, |r, c| r * 10 + c);
    let down = g.resample_nearest(1, 3);
    assert_eq!(down.shape(), (1, 3));
    assert_eq!(down.data(), &[11, 13, 15]);

    let up = Grid::from_rows(vec![vec![true, false]]).unwrap().resample_nearest(2, 4);
    assert_eq!(up.data(), &[true, true, false, false, true, true, false, false]);

    assert_eq!(g.resample_nearest(2, 6), g);
}
