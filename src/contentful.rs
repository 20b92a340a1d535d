//! The Contentful content source. Reads a Contentful GraphQL response that was
//! exported to disk (JSON or YAML) and yields its edges.

use crate::source::{Edge, Source};
use serde::Deserialize;
use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A named reference, as Contentful links articles to their authors.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawName {
    pub name: String,
}

/// An asset reference.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawImage {
    pub url: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub id: String,

    pub title: String,

    pub slug: String,

    #[serde(default)]
    pub author: Vec<RawName>,

    /// Either `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub date: String,

    #[serde(default)]
    pub secret: bool,

    #[serde(default)]
    pub excerpt: String,

    #[serde(default)]
    pub canonical_url: Option<String>,

    #[serde(default)]
    pub hero: Option<RawImage>,

    #[serde(default)]
    pub subscription: bool,

    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawAuthor {
    pub name: String,

    pub slug: String,

    #[serde(default)]
    pub bio: String,

    #[serde(default)]
    pub avatar: Option<RawImage>,

    #[serde(default)]
    pub featured: bool,
}

#[derive(Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Connection { edges: Vec::new() }
    }
}

#[derive(Deserialize)]
struct Data {
    #[serde(default)]
    articles: Connection<RawArticle>,

    #[serde(default)]
    authors: Connection<RawAuthor>,
}

#[derive(Deserialize)]
struct Response {
    data: Data,
}

/// Queries content from an exported Contentful response document of the
/// shape `{ data: { articles: { edges }, authors: { edges } } }`. The export
/// is read once, on the first successful query.
pub struct Contentful<'a> {
    pub export: &'a Path,
    data: RefCell<Option<Data>>,
}

impl<'a> Contentful<'a> {
    pub fn new(export: &'a Path) -> Contentful<'a> {
        Contentful {
            export,
            data: RefCell::new(None),
        }
    }

    fn read(&self) -> Result<Data> {
        let file = File::open(self.export).map_err(|err| Error::Open {
            path: self.export.to_owned(),
            err,
        })?;
        let response: Response = serde_yaml::from_reader(file)?;
        Ok(response.data)
    }

    fn with_data<T>(&self, f: impl FnOnce(&Data) -> T) -> Result<T> {
        if let Some(data) = self.data.borrow().as_ref() {
            return Ok(f(data));
        }
        let data = self.read()?;
        let result = f(&data);
        *self.data.borrow_mut() = Some(data);
        Ok(result)
    }
}

impl Source for Contentful<'_> {
    type Article = RawArticle;
    type Author = RawAuthor;
    type Error = Error;

    fn name(&self) -> &str {
        "contentful"
    }

    fn query_authors(&self) -> Result<Vec<Edge<RawAuthor>>> {
        self.with_data(|data| data.authors.edges.clone())
    }

    fn query_articles(&self) -> Result<Vec<Edge<RawArticle>>> {
        self.with_data(|data| data.articles.edges.clone())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading the Contentful export.
#[derive(Debug)]
pub enum Error {
    /// Returned when the export file can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the export doesn't match the expected response shape.
    Deserialize(serde_yaml::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open { path, err } => {
                write!(f, "Opening Contentful export '{}': {}", path.display(), err)
            }
            Error::Deserialize(err) => write!(f, "Reading Contentful export: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { path: _, err } => Some(err),
            Error::Deserialize(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::Deserialize(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    const EXPORT: &str = r#"{
  "data": {
    "articles": {
      "edges": [
        {
          "node": {
            "id": "5c1f",
            "title": "Understanding the Gatsby lifecycle",
            "slug": "understanding-the-gatsby-lifecycle",
            "author": [{ "name": "Dennis Brotzky" }, { "name": "Thiago Costa" }],
            "date": "2019-04-30T00:00:00.000Z",
            "canonicalUrl": "https://example.org/lifecycle",
            "hero": { "url": "//images.example.org/hero.jpg" }
          }
        }
      ]
    },
    "authors": {
      "edges": [
        { "node": { "name": "Dennis Brotzky", "slug": "dennis-brotzky", "featured": true } }
      ]
    }
  }
}"#;

    #[test]
    fn test_query() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let export = dir.path().join("contentful.json");
        fs::write(&export, EXPORT)?;
        let contentful = Contentful::new(&export);

        let articles = contentful.query_articles()?;
        assert_eq!(1, articles.len());
        let article = &articles[0].node;
        assert_eq!("5c1f", article.id);
        assert_eq!(
            vec!["Dennis Brotzky", "Thiago Costa"],
            article.author.iter().map(|a| a.name.as_str()).collect::<Vec<_>>()
        );
        assert_eq!(
            Some(String::from("https://example.org/lifecycle")),
            article.canonical_url
        );
        assert!(!article.secret);
        assert_eq!(None, article.body);

        let authors = contentful.query_authors()?;
        assert_eq!(
            vec![Edge::from(RawAuthor {
                name: String::from("Dennis Brotzky"),
                slug: String::from("dennis-brotzky"),
                bio: String::new(),
                avatar: None,
                featured: true,
            })],
            authors
        );
        Ok(())
    }

    #[test]
    fn test_export_read_once() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let export = dir.path().join("contentful.json");
        fs::write(&export, EXPORT)?;
        let contentful = Contentful::new(&export);

        assert_eq!(1, contentful.query_authors()?.len());
        fs::remove_file(&export)?;
        assert_eq!(1, contentful.query_articles()?.len());
        assert_eq!(1, contentful.query_authors()?.len());
        Ok(())
    }

    #[test]
    fn test_missing_connection() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let export = dir.path().join("contentful.yaml");
        fs::write(&export, "data:\n  authors:\n    edges: []\n")?;

        assert!(Contentful::new(&export).query_articles()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_export() {
        let err = Contentful::new(Path::new("/nonexistent/contentful.json"))
            .query_authors()
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Opening Contentful export '/nonexistent/contentful.json'"));
    }
}
