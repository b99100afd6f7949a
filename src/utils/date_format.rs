use time::{Date, Duration, PrimitiveDateTime, macros::format_description};

// QuickBooks sends transaction dates as plain ISO dates (yyyy-MM-dd)
pub fn parse_qb_date(date_str: &str) -> Result<Date, String> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(date_str, &format).map_err(|e| format!("Failed to parse date '{date_str}': {e}"))
}

/// Display form of a transaction date, `dd/MM/yyyy`.
#[must_use]
pub fn pretty_date(date: Date) -> String {
    format!(
        "{:02}/{:02}/{:04}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

/// Local date-time as the query language expects it, `yyyy-MM-ddTHH:mm:ss` without offset.
#[must_use]
pub fn query_datetime(datetime: PrimitiveDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        datetime.year(),
        u8::from(datetime.month()),
        datetime.day(),
        datetime.hour(),
        datetime.minute(),
        datetime.second()
    )
}

#[must_use]
pub fn beginning_of_month(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

#[must_use]
pub fn end_of_month(date: Date) -> Date {
    let mut last = date;
    loop {
        match last.next_day() {
            Some(next) if next.month() == date.month() => last = next,
            _ => return last,
        }
    }
}
