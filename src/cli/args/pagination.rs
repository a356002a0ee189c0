//! Pagination argument types for CLI commands

use clap::Args;

use crate::client::PageParams;
use crate::client::pagination::DEFAULT_PAGE_SIZE;

/// Limit/offset arguments for directory listings.
#[derive(Args, Debug, Default, Clone)]
pub struct PaginationArgs {
    /// Maximum results to return (defaults to one grid page)
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Number of results to skip
    #[arg(long)]
    pub offset: Option<usize>,

    /// Keep fetching until the directory is exhausted
    #[arg(long, conflicts_with = "offset")]
    pub all: bool,
}

impl PaginationArgs {
    /// Convert CLI args to API pagination params.
    pub fn to_params(&self) -> PageParams {
        PageParams::new(
            self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_SIZE),
            self.offset.unwrap_or(0),
        )
    }
}
