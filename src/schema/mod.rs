pub mod habitat;
pub mod range;
pub mod types;

pub use habitat::HABITAT;
pub use range::RANGE;
pub use types::{derived, Column, Dataset, TableSchema};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn layouts_match_input_widths() {
        assert_eq!(RANGE.width(), 11);
        assert_eq!(HABITAT.width(), 17);
        assert_eq!(RANGE.columns[RANGE.sentinel_index].name, RANGE.sentinel);
        assert_eq!(HABITAT.columns[HABITAT.sentinel_index].name, HABITAT.sentinel);
        assert_eq!(RANGE.columns[RANGE.unique_code_index].placeholder, Some("str_UC"));
        assert_eq!(HABITAT.columns[HABITAT.pub_date_index].placeholder, Some("pub_Date"));
    }

    #[test]
    fn placeholder_sets_are_unique() {
        for dataset in Dataset::ALL {
            let keys = dataset.schema().placeholders();
            let unique: HashSet<_> = keys.iter().collect();
            assert_eq!(unique.len(), keys.len(), "{} has duplicates", dataset);
        }
        assert_eq!(RANGE.placeholders().len(), 15);
        assert_eq!(HABITAT.placeholders().len(), 21);
        assert!(!HABITAT.placeholders().contains(&derived::EDITORS));
    }

    #[test]
    fn dataset_names_round_trip() {
        assert_eq!(Dataset::from_str(" Range "), Some(Dataset::Range));
        assert_eq!(Dataset::from_str("hab"), Some(Dataset::Habitat));
        assert_eq!(Dataset::from_str("fish"), None);
        assert_eq!(Dataset::Habitat.to_string(), "habitat");
    }
}
