use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("extern vector `{0}` has no bound and no initializer to size it from")]
    UnsizedVector(String),
    #[error("case label outside any switch reached the emitter (should have been caught by the semantic pass)")]
    CaseOutsideSwitch,
    #[error("vector bound did not fold to a constant during codegen")]
    NonConstantBound,
}

pub type GenResult<T> = Result<T, GenError>;
