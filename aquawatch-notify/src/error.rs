use thiserror::Error;

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification with id {0} not found")]
    NotFound(u64),
}
