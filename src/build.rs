//! Exports [`build_plan`] and [`build`] which stitch together the high-level
//! steps of planning the site: querying the enabled sources
//! ([`crate::source`]), aggregating their content ([`crate::aggregate`]),
//! planning pages ([`crate::plan`]), and writing the plan ([`crate::write`]).

use crate::aggregate::{aggregate, Error as AggregateError};
use crate::config::Config;
use crate::contentful::Contentful;
use crate::local::Local;
use crate::page::Page;
use crate::plan::{plan_pages, Error as PlanError};
use crate::source::{query_or_empty, SourceContent};
use crate::write::{write_plan_file, Error as WriteError};
use std::convert::Infallible;
use std::fmt;
use tracing::info;

/// Queries, aggregates, and plans all pages for a [`Config`].
pub fn build_plan(config: &Config) -> Result<Vec<Page>> {
    let theme = &config.theme;
    info!(base_path = %theme.base_path, "Planning articles");
    if theme.authors_page {
        info!(authors_path = %theme.authors_path, "Planning author pages");
    }

    let local = match theme.sources.local {
        true => query_or_empty(
            &Local::new(&config.posts_directory, &config.authors_directory),
            theme,
        ),
        false => SourceContent::default(),
    };
    let contentful = match theme.sources.contentful {
        true => query_or_empty(&Contentful::new(&config.contentful_export), theme),
        false => SourceContent::default(),
    };

    let content = aggregate(local, contentful)?;
    let mut pages: Vec<Page> = Vec::new();
    plan_pages(theme, &content, &mut pages)?;
    Ok(pages)
}

/// Plans all pages for a [`Config`] and writes the plan to `config.output`.
/// Returns the number of planned pages.
pub fn build(config: &Config) -> Result<usize> {
    let pages = build_plan(config)?;
    write_plan_file(&pages, &config.output)?;
    info!(pages = pages.len(), output = %config.output.display(), "Wrote page plan");
    Ok(pages.len())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a plan.
#[derive(Debug)]
pub enum Error {
    /// Returned when the sources yield no articles or no authors.
    Aggregate(AggregateError),

    /// Returned for errors during planning.
    Plan(PlanError<Infallible>),

    /// Returned for errors writing the plan.
    Write(WriteError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Aggregate(err) => err.fmt(f),
            Error::Plan(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Aggregate(err) => Some(err),
            Error::Plan(err) => Some(err),
            Error::Write(err) => Some(err),
        }
    }
}

impl From<AggregateError> for Error {
    fn from(err: AggregateError) -> Error {
        Error::Aggregate(err)
    }
}

impl From<PlanError<Infallible>> for Error {
    fn from(err: PlanError<Infallible>) -> Error {
        Error::Plan(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}
