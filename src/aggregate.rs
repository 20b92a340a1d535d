//! Merges the content of all sources into a single [`Content`].

use crate::model::{Article, Author};
use crate::source::SourceContent;
use std::collections::HashMap;
use std::fmt;

/// All articles (newest first) and all distinct authors.
#[derive(Clone, Debug, PartialEq)]
pub struct Content {
    pub articles: Vec<Article>,
    pub authors: Vec<Author>,
}

impl Content {
    /// The articles which may appear on listing pages, newest first.
    pub fn public(&self) -> Vec<&Article> {
        self.articles.iter().filter(|a| !a.secret).collect()
    }
}

/// Merges local and Contentful content. Articles are sorted by date, newest
/// first. Authors are deduplicated by name with local authors taking
/// precedence over Contentful authors of the same name.
pub fn aggregate(local: SourceContent, contentful: SourceContent) -> Result<Content> {
    let mut articles = local.articles;
    articles.extend(contentful.articles);
    articles.sort_by(|a, b| b.date_for_seo.cmp(&a.date_for_seo));

    let authors = unique_by_name(contentful.authors.into_iter().chain(local.authors));

    if articles.is_empty() || authors.is_empty() {
        return Err(Error::NoContent {
            articles: articles.len(),
            authors: authors.len(),
        });
    }
    Ok(Content { articles, authors })
}

/// Keeps one author per name: the last one seen, at the position where the
/// name first appeared.
fn unique_by_name(authors: impl Iterator<Item = Author>) -> Vec<Author> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Author> = Vec::new();
    for author in authors {
        match positions.get(&author.name) {
            Some(&i) => unique[i] = author,
            None => {
                positions.insert(author.name.clone(), unique.len());
                unique.push(author);
            }
        }
    }
    unique
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Returned when the sources produced no articles or no authors.
    NoContent { articles: usize, authors: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NoContent { articles, authors } => write!(
                f,
                "You must have at least one author and one article (found {} \
                 articles and {} authors). Check that your content sources are \
                 enabled and that their directories or exports contain content.",
                articles, authors
            ),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::fixtures::{article, author, secret};
    use std::collections::HashSet;

    #[test]
    fn test_sorts_newest_first() -> Result<()> {
        let content = aggregate(
            SourceContent {
                articles: vec![article("A", "Jane", 1), article("C", "Jane", 3)],
                authors: vec![author("Jane")],
            },
            SourceContent {
                articles: vec![article("B", "Jane", 2), article("D", "Jane", 4)],
                authors: Vec::new(),
            },
        )?;
        let titles: Vec<&str> = content.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(vec!["D", "C", "B", "A"], titles);
        Ok(())
    }

    #[test]
    fn test_public_excludes_secrets() -> Result<()> {
        let content = aggregate(
            SourceContent {
                articles: vec![
                    article("A", "Jane", 1),
                    secret(article("B", "Jane", 2)),
                    article("C", "Jane", 3),
                ],
                authors: vec![author("Jane")],
            },
            SourceContent::default(),
        )?;
        assert_eq!(3, content.articles.len());
        let public: Vec<&str> = content.public().iter().map(|a| a.title.as_str()).collect();
        assert_eq!(vec!["C", "A"], public);
        Ok(())
    }

    #[test]
    fn test_authors_unique_last_wins() -> Result<()> {
        let mut local_jane = author("Jane");
        local_jane.bio = String::from("local");
        let mut contentful_jane = author("Jane");
        contentful_jane.bio = String::from("contentful");

        let content = aggregate(
            SourceContent {
                articles: vec![article("A", "Jane", 1)],
                authors: vec![author("John"), local_jane.clone(), author("jane")],
            },
            SourceContent {
                articles: Vec::new(),
                authors: vec![contentful_jane, author("Ann"), author("Ann")],
            },
        )?;

        let names: Vec<&str> = content.authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(vec!["Jane", "Ann", "John", "jane"], names);
        assert_eq!(local_jane, content.authors[0]);

        let distinct: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), distinct.len());
        Ok(())
    }

    #[test]
    fn test_no_authors_is_fatal() {
        let result = aggregate(
            SourceContent {
                articles: vec![article("A", "Jane", 1)],
                authors: Vec::new(),
            },
            SourceContent::default(),
        );
        match result {
            Err(Error::NoContent { articles, authors }) => {
                assert_eq!(1, articles);
                assert_eq!(0, authors);
            }
            Ok(_) => panic!("wanted NoContent"),
        }
    }

    #[test]
    fn test_no_articles_is_fatal() {
        let result = aggregate(
            SourceContent {
                articles: Vec::new(),
                authors: vec![author("Jane")],
            },
            SourceContent::default(),
        );
        assert!(matches!(result, Err(Error::NoContent { articles: 0, authors: 1 })));
    }
}
