//! Validation utilities for the risk forecast platform
//!
//! Bounds mirror the NASA POWER daily record, which starts in 1981.

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub const MIN_YEAR: i32 = 1981;
pub const MAX_YEAR: i32 = 2050;
pub const MAX_SYNC_YEARS: u32 = 10;

// ============================================================================
// Calendar Validations
// ============================================================================

/// Validate year is inside the supported record
pub fn validate_year(year: i32) -> Result<(), &'static str> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err("Year must be between 1981 and 2050");
    }
    Ok(())
}

/// Validate month number (1-12)
pub fn validate_month(month: u32) -> Result<(), &'static str> {
    if !(1..=12).contains(&month) {
        return Err("Month must be between 1 and 12");
    }
    Ok(())
}

/// Validate an inclusive date range
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), &'static str> {
    if start > end {
        return Err("Start date must not be after end date");
    }
    Ok(())
}

/// Validate how many years of history a sync may request
pub fn validate_sync_years(years: u32) -> Result<(), &'static str> {
    if years == 0 || years > MAX_SYNC_YEARS {
        return Err("Years must be between 1 and 10");
    }
    Ok(())
}

/// Parse a comma-separated list of years, e.g. "2022, 2023,2024"
pub fn parse_year_list(input: &str) -> Result<Vec<i32>, &'static str> {
    if input.trim().is_empty() {
        return Err("Please provide years parameter (e.g., ?years=2022,2023,2024)");
    }

    let mut years = input
        .split(',')
        .map(|part| part.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| "Invalid year format. Please provide comma-separated years.")?;

    years.sort_unstable();
    years.dedup();
    Ok(years)
}

// ============================================================================
// Geographic Validations
// ============================================================================

/// Validate GPS coordinates are within valid ranges
pub fn validate_gps_coordinates(latitude: Decimal, longitude: Decimal) -> Result<(), &'static str> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}
