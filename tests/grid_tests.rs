//! Grid tests - detection, removal, settling and move counting

use match3::core::{Grid, GridConfig, GridError};
use match3::types::{Position, PowerUp};

fn config(colors: u8) -> GridConfig {
    GridConfig::new(0, 0, colors).with_seed(7)
}

fn all_positions(grid: &Grid) -> Vec<Position> {
    (0..grid.height())
        .flat_map(|row| (0..grid.width()).map(move |col| Position::new(row, col)))
        .collect()
}

const SCENARIO: [[u8; 8]; 8] = [
    [3, 4, 2, 4, 4, 3, 4, 1],
    [2, 5, 0, 2, 4, 5, 5, 1],
    [5, 2, 4, 4, 0, 5, 5, 4],
    [2, 2, 0, 0, 3, 3, 0, 2],
    [0, 3, 1, 0, 0, 3, 3, 0],
    [0, 4, 4, 3, 0, 4, 2, 4],
    [2, 4, 1, 0, 2, 0, 0, 4],
    [4, 0, 1, 3, 2, 4, 2, 1],
];

#[test]
fn test_new_grid_is_full_and_match_free() {
    for seed in 1..=40 {
        let grid = Grid::new(GridConfig::default().with_seed(seed)).unwrap();
        assert!(grid.is_full(), "seed {} left an empty cell", seed);
        assert!(!grid.has_run(), "seed {} starts with a run", seed);
    }
}

#[test]
fn test_same_seed_same_board() {
    let a = Grid::new(GridConfig::default().with_seed(99)).unwrap();
    let b = Grid::new(GridConfig::default().with_seed(99)).unwrap();
    assert_eq!(a.color_rows(), b.color_rows());
}

#[test]
fn test_invalid_config_is_rejected() {
    assert!(matches!(
        Grid::new(GridConfig::new(2, 2, 6)),
        Err(GridError::InvalidConfig(_))
    ));
    assert!(Grid::new(GridConfig::new(8, 8, 2)).is_err());
}

#[test]
fn test_token_at_out_of_range() {
    let grid = Grid::new(GridConfig::default()).unwrap();
    assert!(matches!(
        grid.token_at(Position::new(8, 3)),
        Err(GridError::InvalidPosition { .. })
    ));
    assert!(grid.token_at(Position::new(7, 7)).unwrap().is_some());
}

#[test]
fn test_find_matches_detects_a_three_run() {
    let mut grid = Grid::from_layout(config(9), &[[1u8, 2, 3], [0, 0, 0], [4, 5, 6]]).unwrap();
    let matches = grid
        .find_matches(&[Position::new(1, 1)], None)
        .unwrap()
        .expect("row 1 is a run");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].len(), 3);
    assert!(matches[0].promoted.is_none());
    for col in 0..3 {
        assert!(matches[0].contains(Position::new(1, col)));
    }
}

#[test]
fn test_find_matches_returns_none_without_runs() {
    let mut grid = Grid::new(GridConfig::default().with_seed(3)).unwrap();
    let seeds = all_positions(&grid);
    assert_eq!(grid.find_matches(&seeds, None).unwrap(), None);
    assert!(grid.pending_matches().is_empty());
}

#[test]
fn test_find_matches_rejects_bad_seed() {
    let mut grid = Grid::new(GridConfig::default()).unwrap();
    assert!(grid.find_matches(&[Position::new(0, 9)], None).is_err());
    assert!(grid
        .find_matches(&[Position::new(0, 0)], Some(Position::new(9, 0)))
        .is_err());
}

#[test]
fn test_four_run_promotes_last_moved_token() {
    let mut grid = Grid::from_layout(config(5), &[[0u8, 0, 0, 0, 1], [2, 3, 4, 2, 3]]).unwrap();
    let moved = Position::new(0, 3);
    let matches = grid.find_matches(&[moved], Some(moved)).unwrap().unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].len(), 3);
    assert_eq!(matches[0].original_len(), 4);
    let survivor = matches[0].promoted.expect("4-run keeps the moved token");
    assert_eq!(survivor.position(), moved);
    assert_eq!(survivor.power_up, PowerUp::RowColClear);

    let requests = grid.remove_matches(Some(moved));
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].position, moved);
    assert_eq!(requests[0].kind, PowerUp::RowColClear);
    assert_eq!(requests[0].color, 0);

    let power_up = grid.token_at(moved).unwrap().unwrap();
    assert_eq!(power_up.power_up, PowerUp::RowColClear);
    assert_ne!(power_up.id, survivor.id);
    assert_eq!(grid.occupied(), 7);
}

#[test]
fn test_five_run_creates_color_clear() {
    let mut grid = Grid::from_layout(config(5), &[[0u8, 0, 0, 0, 0], [1, 2, 3, 1, 2]]).unwrap();
    let moved = Position::new(0, 4);
    let matches = grid.find_matches(&[moved], Some(moved)).unwrap().unwrap();

    assert_eq!(matches[0].len(), 4);
    assert_eq!(matches[0].promoted.map(|t| t.power_up), Some(PowerUp::ColorClear));

    let requests = grid.remove_matches(Some(moved));
    assert_eq!(requests[0].kind, PowerUp::ColorClear);
    assert_eq!(grid.occupied(), 6);
}

#[test]
fn test_three_run_never_promotes() {
    let mut grid = Grid::from_layout(config(9), &[[1u8, 2, 3], [0, 0, 0], [4, 5, 6]]).unwrap();
    let moved = Position::new(1, 2);
    let matches = grid.find_matches(&[moved], Some(moved)).unwrap().unwrap();
    assert!(matches[0].promoted.is_none());
    assert!(grid.remove_matches(Some(moved)).is_empty());
    assert_eq!(grid.occupied(), 6);
}

#[test]
fn test_remove_settle_keeps_board_full() {
    let mut grid = Grid::from_layout(config(6), &SCENARIO).unwrap();
    let (from, to) = (Position::new(3, 3), Position::new(3, 4));
    grid.swap(from, to).unwrap();

    let matches = grid.find_matches(&[to, from], Some(to)).unwrap().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].original_len(), 4);
    for row in 2..=5 {
        assert!(matches[0].contains(Position::new(row, 4)));
    }

    let requests = grid.remove_matches(Some(to));
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, PowerUp::RowColClear);
    assert_eq!(grid.occupied(), 64 - 3);

    let falls = grid.settle_and_refill();
    assert!(grid.is_full());
    assert_eq!(falls.iter().filter(|f| f.spawned).count(), 3);
    assert!(falls.iter().all(|f| f.token.col == 4));

    let power_up = falls
        .iter()
        .find(|f| f.token.power_up.is_some())
        .expect("power-up falls into the gap");
    assert_eq!(power_up.from_row, 3);
    assert_eq!(power_up.target_row, 5);

    for (idx, cell) in grid.cells().iter().enumerate() {
        let token = cell.unwrap();
        assert_eq!(token.position(), Position::new(idx / 8, idx % 8));
    }
}

#[test]
fn test_clear_cells_checks_every_position_first() {
    let mut grid = Grid::new(GridConfig::default()).unwrap();
    let err = grid
        .clear_cells(&[Position::new(0, 0), Position::new(8, 8)])
        .unwrap_err();
    assert!(matches!(err, GridError::InvalidPosition { .. }));
    assert!(grid.is_full());

    let cleared = grid
        .clear_cells(&[Position::new(0, 0), Position::new(0, 0), Position::new(1, 0)])
        .unwrap();
    assert_eq!(cleared.len(), 2);
    assert_eq!(grid.occupied(), 62);
}

#[test]
fn test_row_col_clear_hits_row_and_column() {
    let grid = Grid::new(GridConfig::default().with_seed(11)).unwrap();
    let mut token = grid.token_at(Position::new(3, 4)).unwrap().unwrap();
    token.power_up = PowerUp::RowColClear;

    let hit = grid.activate_power_up(&token).unwrap();
    assert_eq!(hit.len(), 7 + 7);
    assert!(hit.iter().all(|t| (t.row == 3) ^ (t.col == 4)));
}

#[test]
fn test_color_clear_hits_same_color() {
    let grid = Grid::new(GridConfig::default().with_seed(12)).unwrap();
    let mut token = grid.token_at(Position::new(0, 0)).unwrap().unwrap();
    token.power_up = PowerUp::ColorClear;

    let same_color = grid
        .cells()
        .iter()
        .flatten()
        .filter(|t| t.color == token.color)
        .count();
    let hit = grid.activate_power_up(&token).unwrap();
    assert_eq!(hit.len(), same_color - 1);
    assert!(hit.iter().all(|t| t.color == token.color));
}

#[test]
fn test_plain_token_hits_nothing() {
    let grid = Grid::new(GridConfig::default()).unwrap();
    let token = grid.token_at(Position::new(2, 2)).unwrap().unwrap();
    assert!(grid.activate_power_up(&token).unwrap().is_empty());
}

#[test]
fn test_count_possible_matches_single_move() {
    let layout = [[3u8, 0, 3, 2], [0, 0, 3, 1], [3, 1, 2, 0], [3, 3, 0, 1]];
    let mut grid = Grid::from_layout(config(4), &layout).unwrap();

    assert_eq!(
        grid.possible_swaps(),
        vec![(Position::new(0, 0), Position::new(1, 0))]
    );
    assert_eq!(grid.count_possible_matches(), 1);
    assert_eq!(grid.regenerations(), 0);

    // Trial swaps leave the board as it was.
    let rows: Vec<Vec<Option<u8>>> = layout
        .iter()
        .map(|r| r.iter().map(|&c| Some(c)).collect())
        .collect();
    assert_eq!(grid.color_rows(), rows);
}

#[test]
fn test_stuck_board_is_regenerated() {
    let layout = [[1u8, 1, 0, 0], [1, 3, 0, 2], [2, 2, 1, 1], [0, 0, 3, 3]];
    let mut grid = Grid::from_layout(config(4), &layout).unwrap();
    assert!(grid.possible_swaps().is_empty());

    let count = grid.count_possible_matches();
    assert!(count > 0);
    assert!(grid.regenerations() >= 1);
    assert!(grid.is_full());
    assert!(!grid.has_run());
}

#[test]
fn test_reset_does_not_count_as_regeneration() {
    let mut grid = Grid::new(GridConfig::default().with_seed(5)).unwrap();
    let before = grid.color_rows();
    grid.reset();
    assert_eq!(grid.regenerations(), 0);
    assert!(grid.is_full());
    assert_ne!(grid.color_rows(), before);
}

#[test]
fn test_set_visible_only_touches_one_token() {
    let mut grid = Grid::new(GridConfig::default()).unwrap();
    let at = Position::new(4, 4);
    grid.set_visible(at, false).unwrap();
    assert!(!grid.token_at(at).unwrap().unwrap().visible);
    assert_eq!(grid.cells().iter().flatten().filter(|t| !t.visible).count(), 1);

    grid.swap(at, Position::new(4, 5)).unwrap();
    assert!(!grid.token_at(Position::new(4, 5)).unwrap().unwrap().visible);
    assert!(grid.set_visible(Position::new(9, 9), true).is_err());
}

#[test]
fn test_only_match_with_last_moved_can_promote() {
    let layout = [[2u8, 3, 4, 2, 3], [1, 1, 0, 1, 2], [0, 0, 1, 3, 4], [3, 4, 2, 4, 2]];
    let mut grid = Grid::from_layout(config(5), &layout).unwrap();
    let (from, to) = (Position::new(1, 2), Position::new(2, 2));
    grid.swap(from, to).unwrap();

    let matches = grid.find_matches(&[to, from], Some(to)).unwrap().unwrap();
    let sizes: Vec<usize> = matches.iter().map(|m| m.original_len()).collect();
    assert_eq!(sizes, vec![3, 4]);
    assert!(matches[0].contains(to));
    assert!(matches.iter().all(|m| m.promoted.is_none()));

    // The row-1 run of 4 does not hold the moved token, so it clears normally.
    assert!(grid.remove_matches(Some(to)).is_empty());
    assert_eq!(grid.occupied(), 20 - 7);
    assert!(grid.cells().iter().flatten().all(|t| !t.is_power_up()));
}
