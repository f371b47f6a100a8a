use chrono::{Local, NaiveDate};

/// Leading four-digit year of a publication date such as `"2018-07-13"`.
pub fn publication_year(s: &str) -> Option<&str> {
    let year = s.get(0..4)?;
    year.bytes().all(|b| b.is_ascii_digit()).then_some(year)
}

/// `YYYY-MM-DD` rendering used for the run date placeholder.
pub fn format_run_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_run_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_is_first_four_characters() {
        assert_eq!(publication_year("2018-07-13"), Some("2018"));
        assert_eq!(publication_year("2018/07/13 00:00:00"), Some("2018"));
        assert_eq!(publication_year(" 2001"), None);
        assert_eq!(publication_year("2001"), Some("2001"));
        assert_eq!(publication_year("201"), None);
        assert_eq!(publication_year("July 2018"), None);
        assert_eq!(publication_year("20é8"), None);
    }

    #[test]
    fn run_date_is_iso() {
        let d = NaiveDate::from_ymd_opt(2018, 7, 3).unwrap();
        assert_eq!(format_run_date(d), "2018-07-03");
        assert_eq!(parse_run_date("2018-07-03"), Some(d));
        assert_eq!(parse_run_date("07/03/2018"), None);
    }
}
