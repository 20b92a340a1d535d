//! The local content source. Articles are markdown files with YAML
//! frontmatter and authors are YAML lists, both read from the file system.

use crate::source::{Edge, Source};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::error;
use walkdir::WalkDir;

const ARTICLE_EXTENSIONS: &[&str] = &["md", "mdx"];
const AUTHOR_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// An article as written in a local file's frontmatter. `id` and `body` are
/// filled in from the file itself.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawArticle {
    #[serde(skip)]
    pub id: String,

    pub title: String,

    pub author: String,

    pub date: String,

    /// Overrides the title as the source of the article's slug.
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub secret: bool,

    #[serde(default)]
    pub excerpt: String,

    #[serde(default)]
    pub canonical_url: Option<String>,

    #[serde(default)]
    pub hero: Option<String>,

    #[serde(default)]
    pub subscription: bool,

    #[serde(skip)]
    pub body: String,
}

/// An author entry from a local authors file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawAuthor {
    pub name: String,

    #[serde(default)]
    pub bio: String,

    #[serde(default)]
    pub avatar: Option<String>,

    #[serde(default)]
    pub featured: bool,
}

/// Queries content from local directories.
pub struct Local<'a> {
    /// Searched recursively for `.md` and `.mdx` article files.
    pub posts_directory: &'a Path,

    /// Searched (non-recursively) for `.yml` and `.yaml` author files.
    pub authors_directory: &'a Path,
}

impl<'a> Local<'a> {
    pub fn new(posts_directory: &'a Path, authors_directory: &'a Path) -> Local<'a> {
        Local {
            posts_directory,
            authors_directory,
        }
    }

    fn parse_article(&self, relative_path: &Path) -> Result<RawArticle> {
        match self._parse_article(relative_path) {
            Ok(article) => Ok(article),
            Err(e) => Err(Error::Annotated(
                format!("parsing article `{}`", relative_path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_article(&self, relative_path: &Path) -> Result<RawArticle> {
        let contents = read(&self.posts_directory.join(relative_path))?;
        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(&contents)?;
        let mut article: RawArticle = serde_yaml::from_str(&contents[yaml_start..yaml_stop])?;
        article.id = relative_path
            .with_extension("")
            .to_string_lossy()
            .replace('\\', "/");
        article.body = contents[body_start..].trim().to_owned();
        Ok(article)
    }

    fn parse_authors(&self, path: &Path) -> Result<Vec<RawAuthor>> {
        let contents = read(path)?;
        serde_yaml::from_str(&contents).map_err(|e| {
            Error::Annotated(
                format!("parsing authors `{}`", path.display()),
                Box::new(Error::DeserializeYaml(e)),
            )
        })
    }
}

impl Source for Local<'_> {
    type Article = RawArticle;
    type Author = RawAuthor;
    type Error = Error;

    fn name(&self) -> &str {
        "local"
    }

    /// Unreadable or malformed authors files are logged and skipped.
    fn query_authors(&self) -> Result<Vec<Edge<RawAuthor>>> {
        let mut authors = Vec::new();
        for path in files(self.authors_directory, 1, AUTHOR_EXTENSIONS)? {
            match self.parse_authors(&path) {
                Ok(parsed) => authors.extend(parsed.into_iter().map(Edge::from)),
                Err(err) => error!(source = "local", "Skipping authors: {}", err),
            }
        }
        Ok(authors)
    }

    /// Unreadable or malformed article files are logged and skipped.
    fn query_articles(&self) -> Result<Vec<Edge<RawArticle>>> {
        let mut articles = Vec::new();
        for path in files(self.posts_directory, usize::MAX, ARTICLE_EXTENSIONS)? {
            // `files` only yields descendants of `posts_directory`
            let relative_path = path.strip_prefix(self.posts_directory).unwrap_or(&path);
            match self.parse_article(relative_path) {
                Ok(article) => articles.push(Edge::from(article)),
                Err(err) => error!(source = "local", "Skipping article: {}", err),
            }
        }
        Ok(articles)
    }
}

/// Returns the files under `dir` (up to `max_depth` levels deep) whose
/// extension is one of `extensions`, in file-name order.
fn files(dir: &Path, max_depth: usize, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for result in WalkDir::new(dir)
        .max_depth(max_depth)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = result?;
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| extensions.contains(&ext));
        if entry.file_type().is_file() && matches {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

fn read(path: &Path) -> Result<String> {
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;
    Ok(contents)
}

/// The closing fence must be a line of its own; `---` inside a frontmatter
/// value doesn't end the frontmatter.
fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
    const FENCE: &str = "---";
    if !input.starts_with(FENCE) {
        return Err(Error::FrontmatterMissingStartFence);
    }
    let rest = &input[FENCE.len()..];
    for (offset, _) in rest.match_indices("\n---") {
        let yaml_stop = FENCE.len() + offset + 1;
        let body_start = yaml_stop + FENCE.len();
        let after = &input[body_start..];
        if after.is_empty() || after.starts_with('\n') || after.starts_with("\r\n") {
            return Ok((FENCE.len(), yaml_stop, body_start));
        }
    }
    Err(Error::FrontmatterMissingEndFence)
}

/// Represents the result of a local query.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error querying local content.
#[derive(Debug)]
pub enum Error {
    /// Returned when an article file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when an article file is missing its terminal frontmatter
    /// fence.
    FrontmatterMissingEndFence,

    /// Returned when frontmatter or an authors file isn't valid YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for errors walking content directories.
    WalkDir(walkdir::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Article must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
