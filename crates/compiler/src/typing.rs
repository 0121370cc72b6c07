//! Static types of IR expressions and the assignability rule.

use neo_core::ContractParameterType as T;

/// Static type of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprType {
    /// The `null` literal, assignable to every non-primitive type.
    Null,
    Typed(T),
}

impl ExprType {
    pub fn is_void(self) -> bool {
        self == ExprType::Typed(T::Void)
    }

    /// Whether a value of this type may flow into a slot declared as `target`.
    pub fn assignable_to(self, target: T) -> bool {
        match self {
            ExprType::Null => target != T::Void && !target.is_primitive(),
            ExprType::Typed(actual) => target.accepts(actual),
        }
    }
}

impl From<T> for ExprType {
    fn from(value: T) -> Self {
        ExprType::Typed(value)
    }
}

impl std::fmt::Display for ExprType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprType::Null => f.write_str("Null"),
            ExprType::Typed(ty) => write!(f, "{ty}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignability() {
        assert!(ExprType::Typed(T::Integer).assignable_to(T::Integer));
        assert!(ExprType::Typed(T::Integer).assignable_to(T::Any));
        assert!(ExprType::Typed(T::Any).assignable_to(T::Hash160));
        assert!(!ExprType::Typed(T::String).assignable_to(T::Integer));
        assert!(ExprType::Null.assignable_to(T::Hash160));
        assert!(ExprType::Null.assignable_to(T::Any));
        assert!(!ExprType::Null.assignable_to(T::Integer));
        assert!(!ExprType::Null.assignable_to(T::Boolean));
        assert!(!ExprType::Typed(T::Void).assignable_to(T::Any));
    }
}
