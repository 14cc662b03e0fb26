use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("not connected to device")]
    NotConnectedToDevice,

    #[error("failed initialization : {0}")]
    FailedInitialization(String),

    #[error("transport failure : {0}")]
    TransportFailure(String),

    #[error("apply failure : {0}")]
    ApplyFailure(String),

    #[error("failure to parse content : {0}")]
    FailureToParseContent(String),

    #[error("failure to write snapshot : {0}")]
    SnapshotWriteFailure(String),

    #[error("wrong locator for this session : {0}")]
    WrongLocatorFlavor(String),
}
