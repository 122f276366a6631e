use thiserror::Error;

#[derive(Error, Debug)]
pub enum TortoiseError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Couldn't find a snippet with id {0}")]
    SnippetNotFound(u32),

    #[error("Snippet {0} has nothing to type")]
    BlankSnippet(u32),

    #[error("Couldn't find a category with id {0}")]
    CategoryNotFound(u32),

    #[error("Snippet library has no snippets to offer")]
    EmptyLibrary,
}

pub type Result<T> = std::result::Result<T, TortoiseError>;
