use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("node element is missing an `id` attribute")]
    MissingId,
    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),
    #[error("node `{id}` has unknown type `{kind}`")]
    UnknownKind { id: String, kind: String },
    #[error("node `{id}` requires the `{attribute}` attribute")]
    MissingAttribute { id: String, attribute: &'static str },
    #[error("invalid number `{value}` for attribute `{attribute}`")]
    InvalidNumber { attribute: String, value: String },
    #[error("node `{node}` is wired to undeclared node `{peer}`")]
    UnknownPeer { node: String, peer: String },
    #[error("no node named `{0}`")]
    UnknownNode(String),
    #[error("no control named `{0}`")]
    UnknownControl(String),
    #[error("no canvas named `{0}`")]
    UnknownCanvas(String),
    #[error("malformed markup: {0}")]
    Markup(#[from] quick_xml::Error),
}

pub type Result<T> = std::result::Result<T, PanelError>;
