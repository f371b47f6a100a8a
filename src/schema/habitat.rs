use super::types::{Column, Dataset, TableSchema};

const COLUMNS: [Column; 17] = [
    Column::new("GAP_code", "str_UC"),
    Column::new("comName", "com_Name"),
    Column::new("sciName", "sci_Name"),
    Column::new("startDate", "start_Date"),
    Column::new("endDate", "end_Date"),
    Column::new("pubDate", "pub_Date"),
    Column::new("placeKeys", "place_Keys"),
    Column::new("themeKeys", "themeKeys"),
    Column::new("editName", "edit_Name"),
    Column::new("revName", "rev_Name"),
    Column::new("nsElcode", "ns_Elcode"),
    Column::new("tsnCode", "tsn_Code"),
    Column::new("nsGlobal", "ns_Global"),
    Column::new("inDataStr", "in_DataStr"),
    Column::new("ipCode", "ip_Code"),
    Column::new("doiPath", "doi_Path"),
    Column::new("sbPath", "sb_Path"),
];

// The editor column goes through raw; habitat templates have no prose slot.
pub static HABITAT: TableSchema = TableSchema {
    dataset: Dataset::Habitat,
    columns: &COLUMNS,
    sentinel_index: 0,
    sentinel: "GAP_code",
    unique_code_index: 0,
    pub_date_index: 5,
    editors_index: None,
    default_subdir: "hab",
    default_suffix: "_CONUS_HabMap_2001v1.xml",
};
