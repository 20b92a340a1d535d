//! Writes planned [`Page`]s to disk as a YAML document of the shape
//! `{ pages: [ { path, component, context } ] }` for the renderer to consume.

use crate::page::Page;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct Plan<'a> {
    pages: &'a [Page],
}

/// Serializes `pages` as YAML into `w`.
pub fn write_plan<W: Write>(pages: &[Page], w: W) -> Result<()> {
    serde_yaml::to_writer(w, &Plan { pages })?;
    Ok(())
}

/// Writes `pages` to the file at `path`, creating its parent directories.
pub fn write_plan_file(pages: &[Page], path: &Path) -> Result<()> {
    let annotate = |err: io::Error| Error::Io {
        path: path.to_owned(),
        err,
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(annotate)?;
    }
    let mut file = File::create(path).map_err(annotate)?;
    write_plan(pages, &mut file)?;
    file.flush().map_err(annotate)
}

/// The result of a fallible plan-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error writing the plan.
#[derive(Debug)]
pub enum Error {
    /// An error serializing the plan.
    Serialize(serde_yaml::Error),

    /// An error writing the output file.
    Io { path: PathBuf, err: io::Error },
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator when serializing.
    fn from(err: serde_yaml::Error) -> Error {
        Error::Serialize(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Serialize(err) => write!(f, "Serializing page plan: {}", err),
            Error::Io { path, err } => {
                write!(f, "Writing page plan '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Serialize(err) => Some(err),
            Error::Io { path: _, err } => Some(err),
        }
    }
}
