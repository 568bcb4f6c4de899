use crate::environment::prelude::Value;

/// How a statement finished.
///
/// `Return` unwinds to the nearest function call and `Break` to the nearest
/// loop; every statement that runs nested statements hands these back up.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Flow {
    #[default]
    Normal,
    Return(Value),
    Break,
}

impl Flow {
    pub fn is_normal(&self) -> bool {
        matches!(self, Flow::Normal)
    }
}
