use std::fmt;

/// Amounts are whole currency units stored as signed integers. There is no
/// sub-unit precision anywhere in the ledger.
pub type Units = i64;

/// Parse a whole-unit amount from user input.
/// Example: "50" -> 50, "-25" -> -25. Decimal input is rejected.
pub fn parse_units(input: &str) -> Result<Units, ParseUnitsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseUnitsError::InvalidFormat);
    }

    let units: i64 = digits.parse().map_err(|_| ParseUnitsError::OutOfRange)?;
    Ok(if negative { -units } else { units })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseUnitsError {
    InvalidFormat,
    OutOfRange,
}

impl fmt::Display for ParseUnitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseUnitsError::InvalidFormat => {
                write!(f, "invalid amount, expected a whole number")
            }
            ParseUnitsError::OutOfRange => write!(f, "amount out of range"),
        }
    }
}

impl std::error::Error for ParseUnitsError {}
