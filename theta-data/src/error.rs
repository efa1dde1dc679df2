use thiserror::Error;

/// All errors generated in `theta-data`.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DataError {
    #[error("invalid right '{0}': right must be either 'C' or 'P'")]
    InvalidRight(String),

    #[error("invalid ivl {0}: ivl must be between 100 and 3600000 milliseconds")]
    InvalidInterval(String),

    #[error("invalid venue '{0}': venue must be either 'nqb' or 'utp_cta'")]
    InvalidVenue(String),

    #[error("invalid {param} '{value}': dates must be formatted as YYYYMMDD")]
    InvalidDate { param: &'static str, value: String },

    #[error("invalid terminal url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("missing required query parameter: {0}")]
    MissingParam(&'static str),

    #[error(
        "\
        malformed table: row {row} has {actual} values but the header declares \
        {expected} columns\
    "
    )]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("SocketError: {0}")]
    Socket(String),

    #[error("failed to decode event frame: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("CSV error: {0}")]
    Csv(String),
}

impl DataError {
    /// Determine if an error should be logged and converted into an absent result rather than
    /// returned to the caller.
    ///
    /// Only malformed dates are recoverable. Every other validation error is a caller mistake.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_recoverable(&self) -> bool {
        match self {
            DataError::InvalidDate { .. } => true,
            _ => false,
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<csv::Error> for DataError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_is_recoverable() {
        struct TestCase {
            input: DataError,
            expected: bool,
        }

        let tests = vec![
            TestCase {
                // TC0: malformed date is recoverable
                input: DataError::InvalidDate {
                    param: "start_date",
                    value: "2024-01-01".to_string(),
                },
                expected: true,
            },
            TestCase {
                // TC1: invalid right is not recoverable
                input: DataError::InvalidRight("c".to_string()),
                expected: false,
            },
            TestCase {
                // TC2: out of range interval is not recoverable
                input: DataError::InvalidInterval("99".to_string()),
                expected: false,
            },
            TestCase {
                // TC3: invalid venue is not recoverable
                input: DataError::InvalidVenue("arca".to_string()),
                expected: false,
            },
            TestCase {
                // TC4: row width mismatch is a data-integrity error
                input: DataError::RowWidth {
                    row: 0,
                    expected: 2,
                    actual: 1,
                },
                expected: false,
            },
            TestCase {
                // TC5: socket errors terminate the stream
                input: DataError::Socket("event stream ended".to_string()),
                expected: false,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = test.input.is_recoverable();
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_data_error_messages_name_the_constraint() {
        assert_eq!(
            DataError::InvalidRight("X".to_string()).to_string(),
            "invalid right 'X': right must be either 'C' or 'P'"
        );
        assert_eq!(
            DataError::InvalidInterval("3600001".to_string()).to_string(),
            "invalid ivl 3600001: ivl must be between 100 and 3600000 milliseconds"
        );
        assert_eq!(
            DataError::RowWidth {
                row: 3,
                expected: 2,
                actual: 1
            }
            .to_string(),
            "malformed table: row 3 has 1 values but the header declares 2 columns"
        );
    }
}
