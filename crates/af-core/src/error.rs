use thiserror::Error;

pub type AfResult<T> = Result<T, AfError>;

/// Failures of the shared numeric helpers.
#[derive(Error, Debug)]
pub enum AfError {
    #[error("Interpolation table is empty")]
    EmptyTable,

    #[error("Interpolation table columns differ in length (x={x_len}, y={y_len})")]
    TableShape { x_len: usize, y_len: usize },
}
