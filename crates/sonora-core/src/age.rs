//! Calendar age resolution.

use jiff::civil::Date;

/// Whole years elapsed between `birth_date` and `reference_date`.
///
/// Returns `None` when the birth date is unknown. A birthday that has not yet
/// occurred in the reference year does not count, so the day before a first
/// birthday is still age 0. A reference date earlier than the birth date
/// yields a negative age; callers that only deal with exam dates after birth
/// never see one.
pub fn age_on(birth_date: Option<Date>, reference_date: Date) -> Option<i32> {
    let birth = birth_date?;
    let mut years = i32::from(reference_date.year()) - i32::from(birth.year());
    if (reference_date.month(), reference_date.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    Some(years)
}
