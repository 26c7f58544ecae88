//! Remove use case - teardown of the whole deploy root

mod use_case;

pub use use_case::RemoveUseCase;
