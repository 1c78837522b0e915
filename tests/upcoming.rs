use chrono::{DateTime, Utc};
use on_calendar::{Result, Schedule};

#[test]
fn upcoming() -> Result<()> {
    let schedule = Schedule::new("daily")?;
    let now = Utc::now();

    // Get the next occurrence starting from now
    let next = schedule.upcoming(&now)?.unwrap();
    println!("next: {next}");
    assert!(next > now);

    Ok(())
}

#[test]
fn upcoming_in_schedule_timezone() -> Result<()> {
    let schedule = Schedule::new("*-*-* 12:00 America/New_York")?;
    let reference = DateTime::parse_from_rfc3339("2025-07-01T12:00:00+00:00").unwrap();

    let next = schedule.upcoming(&reference)?.unwrap();
    assert_eq!(next.to_rfc3339(), "2025-07-01T12:00:00-04:00");
    assert_eq!(next.with_timezone(&Utc).to_rfc3339(), "2025-07-01T16:00:00+00:00");

    Ok(())
}

#[test]
fn no_upcoming() -> Result<()> {
    let schedule = Schedule::new("2000-01-01 UTC")?;
    assert_eq!(schedule.upcoming(&Utc::now())?, None);

    Ok(())
}
