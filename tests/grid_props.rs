use proptest::prelude::*;
use sheetfix::Grid;

proptest! {
    #[test]
    fn write_then_read_returns_value(row in 0usize..500, col in 0usize..200, value in "[^\\x00]{0,12}") {
        let mut grid = Grid::new();
        grid.write_cell(row, col, &value);
        prop_assert_eq!(grid.read_cell(row, col), value);
        prop_assert!(grid.row_count() > row);
        prop_assert!(grid.rows()[row].len() > col);
    }

    #[test]
    fn writes_do_not_disturb_other_cells(
        writes in proptest::collection::vec((0usize..40, 0usize..20, "[a-z0-9]{1,6}"), 1..30)
    ) {
        let mut grid = Grid::new();
        let mut expected = std::collections::HashMap::new();
        for (r, c, v) in &writes {
            grid.write_cell(*r, *c, v);
            expected.insert((*r, *c), v.clone());
        }
        for ((r, c), v) in &expected {
            prop_assert_eq!(&grid.read_cell(*r, *c), v);
        }
        let max_row = writes.iter().map(|w| w.0).max().unwrap();
        prop_assert_eq!(grid.row_count(), max_row + 1);
    }
}
