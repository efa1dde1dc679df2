use crate::{
    error::DataError,
    query::{ParamValue, Query, QueryOptions},
    validate::{valid_date, valid_interval, valid_right, valid_venue},
};
use tracing::debug;

/// Validation rule attached to an [`Endpoint`].
///
/// Rules only inspect their parameter if it is present in the assembled [`Query`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Rule {
    /// `right` must be `C` or `P`.
    Right,
    /// `ivl` must be within `100..=3_600_000`.
    Interval,
    /// `ivl` must be `0` or within `100..=3_600_000`.
    IntervalOrZero,
    /// `start_date` and `end_date` must both be `YYYYMMDD`. Failing this is recoverable.
    DateRange,
    /// `venue` must be `nqb` or `utp_cta`.
    Venue,
}

impl Rule {
    pub fn check(&self, query: &Query) -> Result<(), DataError> {
        match self {
            Rule::Right => match query.get("right") {
                Some(value) => {
                    let right = value.to_string();
                    if valid_right(&right) {
                        Ok(())
                    } else {
                        Err(DataError::InvalidRight(right))
                    }
                }
                None => Ok(()),
            },
            Rule::Interval | Rule::IntervalOrZero => match query.get("ivl") {
                Some(value) => {
                    let ivl = value
                        .as_int()
                        .or_else(|| value.as_str().and_then(|ivl| ivl.parse().ok()));

                    match ivl {
                        Some(0) if *self == Rule::IntervalOrZero => Ok(()),
                        Some(ivl) if valid_interval(ivl) => Ok(()),
                        _ => Err(DataError::InvalidInterval(value.to_string())),
                    }
                }
                None => Ok(()),
            },
            Rule::DateRange => ["start_date", "end_date"].into_iter().try_for_each(|param| {
                match query.get(param).map(ToString::to_string) {
                    Some(date) if !valid_date(&date) => Err(DataError::InvalidDate {
                        param,
                        value: date,
                    }),
                    _ => Ok(()),
                }
            }),
            Rule::Venue => match query.get("venue") {
                Some(value) => {
                    let venue = value.to_string();
                    if valid_venue(&venue) {
                        Ok(())
                    } else {
                        Err(DataError::InvalidVenue(venue))
                    }
                }
                None => Ok(()),
            },
        }
    }
}

/// Optional query parameter accepted by an [`Endpoint`], with the value sent when the caller
/// does not supply one.
#[derive(Clone, PartialEq, Debug)]
pub struct OptionalParam {
    pub name: &'static str,
    pub default: Option<ParamValue>,
}

impl OptionalParam {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            default: None,
        }
    }

    pub const fn with_default(name: &'static str, default: ParamValue) -> Self {
        Self {
            name,
            default: Some(default),
        }
    }
}

/// Static description of one terminal endpoint.
#[derive(Clone, PartialEq, Debug)]
pub struct Endpoint {
    /// Request path appended to the terminal base url, eg/ `/v2/hist/stock/eod`.
    pub path: &'static str,
    /// Label used to name exported CSV files, unique across the catalog.
    pub category: &'static str,
    /// Parameters that must be present once the query is assembled.
    pub required: &'static [&'static str],
    /// Parameters forwarded from [`QueryOptions`], with optional defaults.
    pub optional: &'static [OptionalParam],
    /// Checked in order, so hard failures should precede [`Rule::DateRange`].
    pub rules: &'static [Rule],
}

impl Endpoint {
    /// True if this endpoint declares the parameter `name`.
    pub fn accepts(&self, name: &str) -> bool {
        self.required.iter().any(|required| *required == name)
            || self.optional.iter().any(|param| param.name == name)
    }

    /// Build the final [`Query`] from the request key, the caller's options and the declared
    /// defaults.
    ///
    /// Key parameters take precedence over options with the same name. Options this endpoint
    /// does not declare are dropped.
    pub fn assemble(&self, key: Query, options: &QueryOptions) -> Result<Query, DataError> {
        let mut query = key;

        for (name, value) in options.as_query().iter() {
            if query.contains(name) {
                continue;
            }

            if self.optional.iter().any(|param| param.name == name) {
                query.insert(name, value.clone());
            } else {
                debug!(
                    path = self.path,
                    param = name,
                    "endpoint does not accept query parameter, dropping"
                );
            }
        }

        for param in self.optional {
            if let Some(default) = &param.default
                && !query.contains(param.name)
            {
                query.insert(param.name, default.clone());
            }
        }

        match self.required.iter().find(|name| !query.contains(name)) {
            Some(missing) => Err(DataError::MissingParam(*missing)),
            None => Ok(query),
        }
    }

    /// Apply every [`Rule`] of this endpoint to an assembled [`Query`].
    pub fn validate(&self, query: &Query) -> Result<(), DataError> {
        self.rules.iter().try_for_each(|rule| rule.check(query))
    }
}
