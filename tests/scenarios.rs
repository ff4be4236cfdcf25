// Copyright 2026 the Quadplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Literal end-to-end scenarios.

use quadplot::{Plot, Rect};

fn sort_squares<V: Copy>(mut squares: Vec<quadplot::Square<V>>) -> Vec<quadplot::Square<V>> {
    squares.sort_by(|a, b| (a.y, a.x).partial_cmp(&(b.y, b.x)).unwrap());
    squares
}

fn sort_runs<V: Copy>(mut runs: Vec<quadplot::Run<V>>) -> Vec<quadplot::Run<V>> {
    runs.sort_by(|a, b| (a.y, a.x0).partial_cmp(&(b.y, b.x0)).unwrap());
    runs
}

#[test]
fn s1_constant() {
    let mut plot = Plot::new_plot(|_: f64, _: f64| 2_i32);
    plot.compute(Rect::new(0.0, 0.0, 1.0, 1.0), 1.0, 1.0).unwrap();

    let squares = plot.squares(false);
    assert_eq!(squares.len(), 1);
    assert_eq!(squares[0].x, 0.5);
    assert_eq!(squares[0].y, 0.5);
    assert_eq!(squares[0].size, 1.0);
    assert_eq!(squares[0].value, 2);
}

#[test]
fn s2_uniform_4x4() {
    let mut plot = Plot::new_plot(|_: f64, _: f64| 0_i32);
    plot.compute(Rect::new(0.0, 0.0, 4.0, 4.0), 2.0, 1.0).unwrap();

    let squares = sort_squares(plot.squares(false));
    let centers: Vec<(f64, f64)> = squares.iter().map(|s| (s.x, s.y)).collect();
    assert_eq!(centers, vec![(1.0, 1.0), (3.0, 1.0), (1.0, 3.0), (3.0, 3.0)]);
    assert!(squares.iter().all(|s| s.size == 2.0 && s.value == 0));
}

#[test]
fn s3_diagonal_pixels() {
    let diagonal = |x: f64, y: f64| x == y && x < 2.0;
    let mut plot = Plot::new_plot(diagonal);
    plot.compute(Rect::new(0.0, 0.0, 4.0, 4.0), 2.0, 1.0).unwrap();

    assert_eq!(plot.squares(true).len(), 13);

    let squares = sort_squares(plot.squares(false));
    assert_eq!(squares.len(), 7);

    let size_one: Vec<_> = squares.iter().filter(|s| s.size == 1.0).collect();
    assert_eq!(size_one.len(), 4);
    let true_ones: Vec<(f64, f64)> = size_one.iter().filter(|s| s.value).map(|s| (s.x, s.y)).collect();
    let mut true_ones = true_ones;
    true_ones.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(true_ones, vec![(0.5, 0.5), (1.5, 1.5)]);

    let size_two: Vec<_> = squares.iter().filter(|s| s.size == 2.0).collect();
    assert_eq!(size_two.len(), 3);
    assert!(size_two.iter().all(|s| !s.value));
}

#[test]
fn s4_sub_pixel_feature_vanishes() {
    let spike = |x: f64, y: f64| x == 1.0 && y == 1.0;
    let mut plot = Plot::new_plot(spike);
    plot.compute(Rect::new(0.0, 0.0, 4.0, 2.0), 2.0, 1.0).unwrap();

    let squares = sort_squares(plot.squares(false));
    assert_eq!(squares.len(), 2);
    assert_eq!((squares[0].x, squares[0].y, squares[0].size, squares[0].value), (1.0, 1.0, 2.0, false));
    assert_eq!((squares[1].x, squares[1].y, squares[1].size, squares[1].value), (3.0, 1.0, 2.0, false));
}

#[test]
fn s5_shrink_preserves_refined_detail() {
    let diagonal = |x: f64, y: f64| y < x - 2.0;

    let mut incremental = Plot::new_plot(diagonal);
    incremental.compute(Rect::new(0.0, 0.0, 5.0, 4.0), 2.0, 1.0).unwrap();
    incremental.compute(Rect::new(0.0, 0.0, 4.0, 4.0), 2.0, 1.0).unwrap();

    let mut fresh = Plot::new_plot(diagonal);
    fresh.compute(Rect::new(0.0, 0.0, 4.0, 4.0), 1.0, 1.0).unwrap();

    assert_eq!(sort_runs(incremental.runs()), sort_runs(fresh.runs()));
}

#[test]
fn s6_row_runs() {
    let band = |x: f64, y: f64| x > 1.0 && x < 3.0 && y < 1.0;
    let mut plot = Plot::new_plot(band);
    plot.compute(Rect::new(0.0, 0.0, 4.0, 2.0), 1.0, 1.0).unwrap();

    let runs = sort_runs(plot.runs());
    assert_eq!(
        runs,
        vec![
            quadplot::Run { x0: 0.0, x1: 1.0, y: 0.5, value: false },
            quadplot::Run { x0: 1.0, x1: 3.0, y: 0.5, value: true },
            quadplot::Run { x0: 3.0, x1: 4.0, y: 0.5, value: false },
            quadplot::Run { x0: 0.0, x1: 4.0, y: 1.5, value: false },
        ]
    );
}
