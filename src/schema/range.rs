use super::types::{Column, Dataset, TableSchema};

const COLUMNS: [Column; 11] = [
    Column::new("sbItem", "sb_Item"),
    Column::new("strUC", "str_UC"),
    Column::new("comName", "com_Name"),
    Column::new("sciName", "sci_Name"),
    Column::new("doiPath", "doi_Path"),
    Column::new("sbPath", "sb_Path"),
    Column::derived_only("editName"),
    Column::new("revName", "rev_Name"),
    Column::new("startDate", "start_Date"),
    Column::new("endDate", "end_Date"),
    Column::new("pubDate", "pub_Date"),
];

pub static RANGE: TableSchema = TableSchema {
    dataset: Dataset::Range,
    columns: &COLUMNS,
    sentinel_index: 1,
    sentinel: "strUC",
    unique_code_index: 1,
    pub_date_index: 10,
    editors_index: Some(6),
    default_subdir: "rng",
    default_suffix: "_CONUS_Range_2001v1.xml",
};
