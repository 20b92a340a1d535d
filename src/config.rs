//! Loads the project configuration (`plume.yaml`) into a [`Config`]. The
//! theme options which drive normalization and planning live in
//! [`ThemeOptions`].

use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

const PROJECT_FILE: &str = "plume.yaml";

#[derive(Deserialize)]
struct PageLength(usize);
impl Default for PageLength {
    fn default() -> Self {
        PageLength(6)
    }
}

#[derive(Deserialize)]
struct BasePath(String);
impl Default for BasePath {
    fn default() -> Self {
        BasePath(String::from("/"))
    }
}

#[derive(Deserialize)]
struct AuthorsPath(String);
impl Default for AuthorsPath {
    fn default() -> Self {
        AuthorsPath(String::from("/authors"))
    }
}

#[derive(Deserialize)]
struct Enabled(bool);
impl Default for Enabled {
    fn default() -> Self {
        Enabled(true)
    }
}

/// Selects which content sources are queried. Local content is queried
/// unless explicitly disabled.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Sources {
    #[serde(default = "enabled")]
    pub local: bool,

    #[serde(default)]
    pub contentful: bool,
}

fn enabled() -> bool {
    true
}

impl Default for Sources {
    fn default() -> Self {
        Sources {
            local: true,
            contentful: false,
        }
    }
}

/// The template (component) referenced by each kind of planned page. Any
/// template left out of the project file keeps its default.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Templates {
    pub articles: String,
    pub article: String,
    pub author: String,
}

impl Default for Templates {
    fn default() -> Self {
        Templates {
            articles: String::from("templates/articles.html"),
            article: String::from("templates/article.html"),
            author: String::from("templates/author.html"),
        }
    }
}

/// Options controlling how articles and authors are turned into pages.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeOptions {
    /// The path under which the article listing and articles live.
    pub base_path: String,

    /// The path under which author pages live.
    pub authors_path: String,

    /// Whether to plan a listing page per author.
    pub authors_page: bool,

    /// The number of articles per listing page.
    pub page_length: usize,

    pub sources: Sources,

    /// The mailchimp list identifier handed to article pages, if any.
    pub mailchimp: Option<String>,

    /// The absolute URL of the site, without a trailing slash. Used to build
    /// article permalinks.
    pub site_url: String,

    pub templates: Templates,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        ThemeOptions {
            base_path: BasePath::default().0,
            authors_path: AuthorsPath::default().0,
            authors_page: true,
            page_length: PageLength::default().0,
            sources: Sources::default(),
            mailchimp: None,
            site_url: String::new(),
            templates: Templates::default(),
        }
    }
}

#[derive(Deserialize)]
struct Project {
    #[serde(default)]
    site_url: String,

    #[serde(default)]
    base_path: BasePath,

    #[serde(default)]
    authors_path: AuthorsPath,

    #[serde(default)]
    authors_page: Enabled,

    #[serde(default)]
    page_length: PageLength,

    #[serde(default)]
    sources: Sources,

    #[serde(default)]
    mailchimp: Option<String>,

    #[serde(default)]
    templates: Templates,

    #[serde(default)]
    posts_directory: Option<PathBuf>,

    #[serde(default)]
    authors_directory: Option<PathBuf>,

    #[serde(default)]
    contentful_export: Option<PathBuf>,
}

/// The complete build configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub theme: ThemeOptions,

    /// The directory holding local article files.
    pub posts_directory: PathBuf,

    /// The directory holding local author files.
    pub authors_directory: PathBuf,

    /// The exported Contentful GraphQL response.
    pub contentful_export: PathBuf,

    /// The file the page plan is written to.
    pub output: PathBuf,
}

impl Config {
    /// Searches `dir` and its ancestors for a `plume.yaml` file and loads it.
    /// If `output` is `None`, the plan is written to `public/pages.yaml`
    /// beside the project file.
    pub fn from_directory(dir: &Path, output: Option<&Path>) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.is_file() {
            return Config::from_project_file(&path, output);
        }
        match dir.parent() {
            Some(parent) => Config::from_directory(parent, output),
            None => Err(Error::ProjectNotFound),
        }
    }

    /// Loads the project file at `path`. Relative paths inside the file are
    /// resolved against the file's directory.
    pub fn from_project_file(path: &Path, output: Option<&Path>) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project: Project = serde_yaml::from_reader(file)?;
        let root = match path.parent() {
            Some(root) => root,
            None => return Err(Error::NoParentDirectory(path.to_owned())),
        };
        let resolve = |p: Option<PathBuf>, default: &str| match p {
            Some(p) => root.join(p),
            None => root.join(default),
        };

        Ok(Config {
            theme: ThemeOptions {
                base_path: project.base_path.0,
                authors_path: project.authors_path.0,
                authors_page: project.authors_page.0,
                page_length: project.page_length.0,
                sources: project.sources,
                mailchimp: project.mailchimp.filter(|m| !m.is_empty()),
                site_url: project.site_url.trim_end_matches('/').to_owned(),
                templates: project.templates,
            },
            posts_directory: resolve(project.posts_directory, "content/posts"),
            authors_directory: resolve(project.authors_directory, "content/authors"),
            contentful_export: resolve(project.contentful_export, "contentful.json"),
            output: match output {
                Some(output) => output.to_owned(),
                None => root.join("public").join("pages.yaml"),
            },
        })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the project configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when no `plume.yaml` exists in the directory or any of its
    /// ancestors.
    ProjectNotFound,

    /// Returned when the project file can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the project file path has no parent directory.
    NoParentDirectory(PathBuf),

    /// Returned when the project file isn't valid YAML or doesn't match the
    /// expected structure.
    DeserializeYaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ProjectNotFound => write!(
                f,
                "Could not find `{}` in any parent directory",
                PROJECT_FILE
            ),
            Error::Open { path, err } => {
                write!(f, "Opening project file '{}': {}", path.display(), err)
            }
            Error::NoParentDirectory(path) => write!(
                f,
                "Can't get parent directory for project file '{}'",
                path.display()
            ),
            Error::DeserializeYaml(err) => write!(f, "Loading configuration: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ProjectNotFound => None,
            Error::Open { path: _, err } => Some(err),
            Error::NoParentDirectory(_) => None,
            Error::DeserializeYaml(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator when deserializing the project file.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(PROJECT_FILE), "site_url: https://example.com/\n")?;

        let config = Config::from_directory(dir.path(), None)?;
        assert_eq!(
            ThemeOptions {
                site_url: String::from("https://example.com"),
                ..ThemeOptions::default()
            },
            config.theme
        );
        assert_eq!(dir.path().join("content/posts"), config.posts_directory);
        assert_eq!(dir.path().join("content/authors"), config.authors_directory);
        assert_eq!(dir.path().join("public/pages.yaml"), config.output);
        Ok(())
    }

    #[test]
    fn test_overrides() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join(PROJECT_FILE),
            "base_path: /blog\n\
             authors_page: false\n\
             page_length: 2\n\
             sources:\n  contentful: true\n\
             mailchimp: abc123\n\
             contentful_export: export/contentful.yaml\n",
        )?;

        let config = Config::from_project_file(&dir.path().join(PROJECT_FILE), None)?;
        assert_eq!("/blog", config.theme.base_path);
        assert_eq!("/authors", config.theme.authors_path);
        assert!(!config.theme.authors_page);
        assert_eq!(2, config.theme.page_length);
        assert_eq!(
            Sources {
                local: true,
                contentful: true
            },
            config.theme.sources
        );
        assert_eq!(Some(String::from("abc123")), config.theme.mailchimp);
        assert_eq!(
            dir.path().join("export/contentful.yaml"),
            config.contentful_export
        );
        Ok(())
    }

    #[test]
    fn test_partial_templates() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join(PROJECT_FILE),
            "templates:\n  article: layouts/post.html\n",
        )?;

        let config = Config::from_directory(dir.path(), None)?;
        assert_eq!(
            Templates {
                article: String::from("layouts/post.html"),
                ..Templates::default()
            },
            config.theme.templates
        );
        Ok(())
    }

    #[test]
    fn test_searches_parent_directories() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("content/posts");
        fs::create_dir_all(&nested)?;
        fs::write(dir.path().join(PROJECT_FILE), "page_length: 3\n")?;

        let config = Config::from_directory(&nested, Some(Path::new("/tmp/plan.yaml")))?;
        assert_eq!(3, config.theme.page_length);
        assert_eq!(PathBuf::from("/tmp/plan.yaml"), config.output);
        Ok(())
    }
}
