use super::*;

// =============================================================
// Construction
// =============================================================

#[test]
fn new_grid_is_all_background() {
    let grid = Grid::new(3, 2);
    assert_eq!(grid.width(), 4);
    assert_eq!(grid.height(), 3);
    assert!(grid.cells().all(|(_, _, code)| code == ColorCode::BACKGROUND));
}

#[test]
fn from_snapshot_pads_short_rows() {
    let grid = Grid::from_snapshot(vec![
        vec![ColorCode::RED],
        vec![ColorCode::WHITE, ColorCode::WHITE, ColorCode::BLUE],
    ])
    .expect("within limits");
    assert_eq!(grid.max_x(), 2);
    assert_eq!(grid.max_y(), 1);
    assert_eq!(grid.get_cell(0, 0), ColorCode::RED);
    assert_eq!(grid.get_cell(2, 0), ColorCode::BACKGROUND);
    assert_eq!(grid.get_cell(2, 1), ColorCode::BLUE);
}

#[test]
fn from_empty_snapshot_is_single_cell() {
    let grid = Grid::from_snapshot(Vec::new()).expect("within limits");
    assert_eq!((grid.width(), grid.height()), (1, 1));
}

#[test]
fn from_snapshot_refuses_oversized_sides() {
    // One wide row plus many empty rows would pad out to width x height cells.
    let mut wide_then_empty = vec![vec![ColorCode::RED; MAX_GRID_SIDE + 1]];
    wide_then_empty.extend(std::iter::repeat_n(Vec::new(), 10));
    assert_eq!(Grid::from_snapshot(wide_then_empty), None);

    let tall = vec![Vec::new(); MAX_GRID_SIDE + 1];
    assert_eq!(Grid::from_snapshot(tall), None);

    let edge = vec![vec![ColorCode::BLUE; MAX_GRID_SIDE]; 2];
    let grid = Grid::from_snapshot(edge).expect("exactly at the limit");
    assert_eq!(grid.width(), MAX_GRID_SIDE);
}

#[test]
fn new_and_resize_clamp_bounds() {
    let mut grid = Grid::new(usize::MAX - 1, 5);
    assert_eq!((grid.max_x(), grid.max_y()), (MAX_GRID_SIDE - 1, 5));

    grid.resize(2, 1_000_000);
    assert_eq!((grid.max_x(), grid.max_y()), (2, MAX_GRID_SIDE - 1));
    assert_eq!(grid.cells().count(), 3 * MAX_GRID_SIDE);
}

// =============================================================
// set_cell / get_cell
// =============================================================

#[test]
fn set_then_get_returns_code_for_every_in_bounds_cell() {
    let mut grid = Grid::new(4, 3);
    for y in 0..=3_i64 {
        for x in 0..=4_i64 {
            assert!(grid.set_cell(x, y, ColorCode::BLUE));
            let (ux, uy) = (usize::try_from(x).expect("x"), usize::try_from(y).expect("y"));
            assert_eq!(grid.get_cell(ux, uy), ColorCode::BLUE);
        }
    }
}

#[test]
fn set_cell_out_of_bounds_returns_false_and_leaves_grid_unchanged() {
    let mut grid = Grid::new(4, 3);
    grid.set_cell(1, 1, ColorCode::RED);
    let before = grid.clone();
    for (x, y) in [(-1, 0), (0, -1), (5, 0), (0, 4), (-1, 5), (i64::MAX, 0), (i64::MIN, i64::MIN)] {
        assert!(!grid.set_cell(x, y, ColorCode::BLUE), "({x}, {y}) should be rejected");
    }
    assert_eq!(grid, before);
}

#[test]
fn get_cell_out_of_bounds_is_background() {
    let grid = Grid::new(1, 1);
    assert_eq!(grid.get_cell(7, 7), ColorCode::BACKGROUND);
}

// =============================================================
// resize
// =============================================================

#[test]
fn resize_preserves_overlap_and_backfills_new_cells() {
    let mut grid = Grid::new(3, 3);
    for y in 0..=3 {
        for x in 0..=3 {
            let code = if (x + y) % 2 == 0 { ColorCode::RED } else { ColorCode::BLUE };
            grid.set(x, y, code);
        }
    }
    let before = grid.clone();

    grid.resize(5, 2);
    assert_eq!((grid.max_x(), grid.max_y()), (5, 2));
    for (x, y, code) in grid.cells() {
        if x <= 3 && y <= 2 {
            assert_eq!(code, before.get_cell(x, y), "overlap cell ({x}, {y})");
        } else {
            assert_eq!(code, ColorCode::BACKGROUND, "new cell ({x}, {y})");
        }
    }
}

#[test]
fn resize_shrink_drops_cells_outside_new_bounds() {
    let mut grid = Grid::new(3, 3);
    grid.set(3, 3, ColorCode::RED);
    grid.resize(1, 1);
    assert!(!grid.set(3, 3, ColorCode::RED));
    grid.resize(3, 3);
    assert_eq!(grid.get_cell(3, 3), ColorCode::BACKGROUND);
}

// =============================================================
// cells / snapshot
// =============================================================

#[test]
fn cells_traverse_row_major_and_restart() {
    let mut grid = Grid::new(1, 1);
    let order: Vec<(usize, usize)> = grid.cells().map(|(x, y, _)| (x, y)).collect();
    assert_eq!(order, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);

    grid.set(1, 1, ColorCode::RED);
    let last = grid.cells().last().expect("cell");
    assert_eq!(last, (1, 1, ColorCode::RED));
}

#[test]
fn snapshot_matches_rows() {
    let mut grid = Grid::new(1, 0);
    grid.set(1, 0, ColorCode::BLUE);
    assert_eq!(grid.snapshot(), vec![vec![ColorCode::WHITE, ColorCode::BLUE]]);
    assert_eq!(Grid::from_snapshot(grid.snapshot()), Some(grid));
}
