//! Command handlers for the `theta-data` binary.
//!
//! Argument groups shared by several command paths live here.

pub mod options;
pub mod stocks;
pub mod stream;

use clap::Args;
use std::path::PathBuf;
use theta_data::catalog::{DateRange, OptionChain, OptionContract};

/// Where a returned table goes.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Also export the table to `{output_dir}/{category}_{identifier}.csv`
    #[arg(long, global = true)]
    pub write_csv: bool,

    /// Save the table to this file instead of printing it
    #[arg(long, global = true)]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// First date, YYYYMMDD
    pub start_date: String,

    /// Last date, YYYYMMDD
    pub end_date: String,
}

impl RangeArgs {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date.as_str(), self.end_date.as_str())
    }
}

#[derive(Args, Debug, Clone)]
pub struct ContractArgs {
    /// Option root, eg/ AAPL
    pub root: String,

    /// Expiration, YYYYMMDD
    pub exp: String,

    /// Strike in 1/10ths of a cent, eg/ 170000 for $170.00
    pub strike: u32,

    /// C or P
    pub right: String,
}

impl ContractArgs {
    pub fn contract(&self) -> OptionContract {
        OptionContract::new(
            self.root.as_str(),
            self.exp.as_str(),
            self.strike,
            self.right.as_str(),
        )
    }
}

#[derive(Args, Debug, Clone)]
pub struct ChainArgs {
    /// Option root, eg/ AAPL
    pub root: String,

    /// Expiration, YYYYMMDD
    pub exp: String,
}

impl ChainArgs {
    pub fn chain(&self) -> OptionChain {
        OptionChain::new(self.root.as_str(), self.exp.as_str())
    }
}
