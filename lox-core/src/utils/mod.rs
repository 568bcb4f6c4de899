pub mod diagnostic;
pub mod src_span;
pub mod error;
pub mod warning;
pub mod output;
pub mod stack;

pub mod prelude {
    pub use super::{
        diagnostic::*,
        src_span::*,
        error::*,
        warning::*,
        output::*,
        stack::*
    };
}
