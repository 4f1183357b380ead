//! Fixed-width decimal fields (date components).

/// Digits of a year component.
pub const YEAR_WIDTH: usize = 4;
/// Digits of a month or day component.
pub const MONTH_DAY_WIDTH: usize = 2;

/// A digit run that does not fit its field.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("`{digits}` does not fit in a {width}-digit field")]
pub struct NumericOverflow {
    pub digits: String,
    pub width: usize,
}

/// Decode `digits` as an unsigned decimal of at most `width` digits.
///
/// Fails on an empty run, a run longer than `width`, a non-digit byte, or a
/// value that overflows `u32`.
pub fn decode_fixed_width(digits: &str, width: usize) -> Result<u32, NumericOverflow> {
    let overflow = || NumericOverflow {
        digits: digits.to_owned(),
        width,
    };
    if digits.is_empty() || digits.len() > width {
        return Err(overflow());
    }
    digits
        .bytes()
        .try_fold(0u32, |acc, b| {
            if !b.is_ascii_digit() {
                return None;
            }
            acc.checked_mul(10)?.checked_add(u32::from(b - b'0'))
        })
        .ok_or_else(overflow)
}

/// Year, month and day of a date lexeme such as `2024-01-31` or `2024/1/5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateParts {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

/// Split a date lexeme on `-` or `/` and decode each component.
///
/// Range checks (month 1-12 and so on) are left to the builder.
pub fn decode_date(lexeme: &str) -> Result<DateParts, NumericOverflow> {
    let mut parts = lexeme.split(|c: char| c == '-' || c == '/');
    let mut next = |width| decode_fixed_width(parts.next().unwrap_or_default(), width);
    let year = next(YEAR_WIDTH)?;
    let month = next(MONTH_DAY_WIDTH)?;
    let day = next(MONTH_DAY_WIDTH)?;
    Ok(DateParts { year, month, day })
}
