//! Cleaning of currency-formatted numbers and approval dates.

use super::DataError;

/// Parse a currency-formatted amount such as `"$1,234.50"`.
///
/// Surrounding whitespace, `$` and `,` are removed before parsing. Anything
/// left that is not a finite number is an error; blanks are never read as zero.
pub fn parse_currency(raw: &str) -> Result<f64, DataError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ','))
        .collect();

    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(DataError::MalformedNumber {
            value: raw.to_string(),
        }),
    }
}

/// Extract the year from an approval-date string.
///
/// The year is the first run of exactly four ASCII digits, so ISO dates
/// (`2009-03-15`), US dates (`03/15/2009`) and long-form dates
/// (`March 15, 2009`) all resolve.
pub fn parse_year(raw: &str) -> Result<i32, DataError> {
    let bytes = raw.as_bytes();
    let mut start = 0;

    while start < bytes.len() {
        if !bytes[start].is_ascii_digit() {
            start += 1;
            continue;
        }

        let end = bytes[start..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(bytes.len(), |offset| start + offset);

        if end - start == 4 {
            // Four ASCII digits always fit in an i32.
            if let Ok(year) = raw[start..end].parse() {
                return Ok(year);
            }
        }
        start = end;
    }

    Err(DataError::MalformedDate {
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency_formats() {
        assert_eq!(parse_currency("$1,234").unwrap(), 1234.0);
        assert_eq!(parse_currency(" $12,345,678.90 ").unwrap(), 12_345_678.90);
        assert_eq!(parse_currency("500").unwrap(), 500.0);
        assert_eq!(parse_currency("$ 75").unwrap(), 75.0);
    }

    #[test]
    fn test_parse_currency_rejects_garbage() {
        for raw in ["", "$", "n/a", "1.2.3", "$12abc", "..", "inf"] {
            match parse_currency(raw) {
                Err(DataError::MalformedNumber { value }) => assert_eq!(value, raw),
                other => panic!("expected MalformedNumber for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_year_formats() {
        assert_eq!(parse_year("2009-03-15").unwrap(), 2009);
        assert_eq!(parse_year("03/15/2011").unwrap(), 2011);
        assert_eq!(parse_year("March 15, 2012").unwrap(), 2012);
        assert_eq!(parse_year("2014").unwrap(), 2014);
    }

    #[test]
    fn test_parse_year_skips_longer_digit_runs() {
        assert_eq!(parse_year("ref 123456 approved 2015-01-01").unwrap(), 2015);
    }

    #[test]
    fn test_parse_year_missing() {
        assert!(matches!(
            parse_year("15/03/09"),
            Err(DataError::MalformedDate { .. })
        ));
        assert!(matches!(parse_year(""), Err(DataError::MalformedDate { .. })));
    }
}
