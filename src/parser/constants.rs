/// A constant-pool entry of a function prototype
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Nil,
    Boolean(bool),
    Number(f64),
    /// `None` when the chunk stores a zero-length (absent) string
    String(Option<String>),
}

impl Constant {
    pub fn type_name(&self) -> &'static str {
        match self {
            Constant::Nil => "nil",
            Constant::Boolean(_) => "boolean",
            Constant::Number(_) => "number",
            Constant::String(_) => "string",
        }
    }
}
