use faces_core::repeat;
use faces_testing::{client_id, HobbitTable};
use proptest::prelude::*;

proptest! {
    #[test]
    fn child_client_ids_depend_only_on_the_current_row(moves in proptest::collection::vec(proptest::option::of(0usize..5), 1..12)) {
        let mut table = HobbitTable::new();
        for row in moves {
            repeat::set_row_index(&mut table.ctx, table.data, row).unwrap();
            let expected = match row {
                Some(row) => format!("form:data:{row}:name"),
                None => "form:data:name".to_string(),
            };
            prop_assert_eq!(client_id(&table.ctx, table.name), expected);
        }
    }

    #[test]
    fn row_values_follow_the_cursor(row in 0usize..5) {
        let mut table = HobbitTable::new();
        repeat::set_row_index(&mut table.ctx, table.data, Some(row)).unwrap();
        let name = table.ctx.evaluate("#{hobbit.name}").unwrap();
        prop_assert_eq!(name.as_str(), Some(HobbitTable::NAMES[row]));
    }
}
