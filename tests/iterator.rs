use chrono::{DateTime, Datelike, Utc, Weekday};
use on_calendar::{Result, Schedule};

#[test]
fn iterator() -> Result<()> {
    let schedule = Schedule::new("Mon..Fri *-*-* 09:00:00 Europe/Kyiv")?;
    let now = Utc::now();

    // Get the next 10 working days mornings starting from now
    let series = schedule.iter(&now).take(10).collect::<Result<Vec<_>>>()?;
    series.iter().for_each(|t| println!("next: {t}"));

    assert_eq!(series.len(), 10);
    assert!(series
        .iter()
        .all(|t| !matches!(t.weekday(), Weekday::Sat | Weekday::Sun)));

    Ok(())
}

#[test]
fn iterator_ends() -> Result<()> {
    let schedule = Schedule::new("2030-01..03-01 UTC")?;
    let reference = DateTime::parse_from_rfc3339("2025-06-01T00:00:00Z").unwrap();

    let months: Vec<u32> = schedule
        .iter(&reference)
        .map(|t| t.map(|t| t.month()))
        .collect::<Result<_>>()?;
    assert_eq!(months, vec![1, 2, 3]);

    Ok(())
}
