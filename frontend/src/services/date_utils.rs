use chrono::NaiveDate;
use js_sys::Date;

/// Today's date in the browser's local time zone
pub fn today() -> NaiveDate {
    let now = Date::new_0();
    let year = now.get_full_year() as i32;
    let month = now.get_month() + 1; // JavaScript months are 0-indexed
    let day = now.get_date();
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// `YYYY-MM-DD`, the format of `<input type="date">` and the API
pub fn to_input_value(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a date input's value; empty or malformed values give `None`
pub fn from_input_value(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Milliseconds since the epoch, used to keep exported file names unique
pub fn timestamp_millis() -> u64 {
    Date::now() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_value_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 7).unwrap();
        assert_eq!(to_input_value(date), "2025-02-07");
        assert_eq!(from_input_value(" 2025-02-07 "), Some(date));
        assert_eq!(from_input_value(""), None);
        assert_eq!(from_input_value("2025-13-01"), None);
    }
}

#[cfg(test)]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_today_is_after_2024() {
        assert!(today() > NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(timestamp_millis() > 0);
    }
}
