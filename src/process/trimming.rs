use crate::process::raw_table::RawTable;

/// Positions of columns holding at least one non-empty value, ascending.
/// A missing field (short row) counts as empty.
pub fn non_empty_columns(table: &RawTable) -> Vec<usize> {
    (0..table.num_columns())
        .filter(|&c| {
            table
                .rows
                .iter()
                .any(|row| row.get(c).is_some_and(|f| !f.is_empty()))
        })
        .collect()
}

/// Project `table` onto the columns at `keep`, in that order.
/// Missing fields come back empty.
pub fn select_columns(table: &RawTable, keep: &[usize]) -> RawTable {
    RawTable {
        columns: keep.iter().map(|&c| table.columns[c].clone()).collect(),
        rows: table
            .rows
            .iter()
            .map(|row| {
                keep.iter()
                    .map(|&c| row.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect(),
    }
}

/// Remove every column whose value is empty in every row.
///
/// Surviving columns keep their order and names, so a dropped column leaves
/// a gap in positional names ("0", "2", ...). A table with no rows has no
/// non-empty values and comes back with no columns.
pub fn drop_empty_columns(table: &RawTable) -> RawTable {
    let keep = non_empty_columns(table);
    if keep.len() == table.num_columns() {
        return table.clone();
    }
    select_columns(table, &keep)
}

/// Remove every row whose fields are all empty.
pub fn drop_empty_rows(table: &RawTable) -> RawTable {
    RawTable {
        columns: table.columns.clone(),
        rows: table
            .rows
            .iter()
            .filter(|row| row.iter().any(|f| !f.is_empty()))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::raw_table::rows_from;

    #[test]
    fn drops_only_the_blank_column() {
        let table = RawTable::from_rows(rows_from(&[
            ["s1", "101", "", "-9"],
            ["s2", "-9", "", "103"],
            ["s3", "105", "", ""],
        ]));

        let out = drop_empty_columns(&table);

        assert_eq!(out.columns, vec!["0", "1", "3"]);
        assert_eq!(
            out.rows,
            rows_from(&[["s1", "101", "-9"], ["s2", "-9", "103"], ["s3", "105", ""]])
        );
    }

    #[test]
    fn padded_trailing_columns_are_dropped() {
        let table = RawTable::from_rows(vec![
            vec!["s1".into(), "1".into()],
            vec!["s2".into(), "2".into(), "".into(), "".into()],
        ]);
        let out = drop_empty_columns(&table);
        assert_eq!(out.columns, vec!["0", "1"]);
    }

    #[test]
    fn no_rows_means_no_columns_survive() {
        let table = RawTable::with_columns(vec!["a".into(), "b".into()], Vec::new()).unwrap();
        assert_eq!(drop_empty_columns(&table).num_columns(), 0);
    }

    #[test]
    fn ragged_rows_built_by_hand_do_not_panic() {
        // fields are public, so the padding invariant can be bypassed
        let table = RawTable {
            columns: vec!["0".into(), "1".into(), "2".into()],
            rows: vec![
                vec!["s1".into()],
                vec!["s2".into(), "".into(), "7".into()],
            ],
        };

        let out = drop_empty_columns(&table);

        assert_eq!(out.columns, vec!["0", "2"]);
        assert_eq!(out.rows, rows_from(&[["s1", ""], ["s2", "7"]]));
    }

    #[test]
    fn drops_rows_that_are_entirely_blank() {
        let table = RawTable::from_rows(rows_from(&[
            ["s1", "-9"],
            ["", ""],
            ["s2", ""],
            ["", ""],
        ]));

        let out = drop_empty_rows(&table);

        assert_eq!(out.columns, table.columns);
        assert_eq!(out.rows, rows_from(&[["s1", "-9"], ["s2", ""]]));
    }

    #[test]
    fn sentinel_rows_are_not_blank() {
        let table = RawTable::from_rows(rows_from(&[["s1", "-9", "-9"]]));
        assert_eq!(drop_empty_rows(&table), table);
    }
}
