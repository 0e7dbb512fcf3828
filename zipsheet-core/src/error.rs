use thiserror::Error;

/// The postal code in the input cell could not be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("No postal code entered in {cell}")]
    Empty { cell: String },

    #[error("'{value}' in {cell} is not a 5-digit US postal code")]
    Invalid { cell: String, value: String },
}

/// A remote lookup (geocoding or forecast) failed.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Failed to reach {service}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} request failed with status {status}: {body}")]
    Status { service: &'static str, status: u16, body: String },

    #[error("Failed to parse {service} JSON")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} response is missing '{field}'")]
    MissingField { service: &'static str, field: String },

    #[error("{service} response has an invalid '{field}': {value}")]
    InvalidField { service: &'static str, field: String, value: String },

    #[error("{service} series '{field}' has {actual} entries, expected {expected}")]
    MisalignedSeries { service: &'static str, field: String, expected: usize, actual: usize },

    #[error("No places found for postal code {postal_code}")]
    NoPlaces { postal_code: String },
}

/// A sheet or cell address could not be resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SheetError {
    #[error("Workbook has no sheet named '{0}'")]
    MissingSheet(String),

    #[error("'{0}' is not a valid A1 cell reference")]
    InvalidCellRef(String),

    #[error("Row {row} is out of range for sheet '{sheet}' ({rows} rows)")]
    RowOutOfRange { sheet: String, row: usize, rows: usize },
}

/// Anything that aborts a refresh.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }

    #[test]
    fn refresh_error_is_transparent() {
        let err = RefreshError::from(LookupError::NoPlaces { postal_code: "00000".into() });
        assert_eq!(err.to_string(), "No places found for postal code 00000");
    }
}
