//! Contract IR consumed by the compiler.
//!
//! A front end lowers source text into these types; they also deserialize
//! from JSON, which is what the `neo-nef compile` command reads.

pub use neo_core::{ContractParameterType, UInt160};
use neo_vm::CallFlags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl ContractSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_url: None,
            methods: Vec::new(),
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ContractParameterType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default = "void")]
    pub return_type: ContractParameterType,
    #[serde(default)]
    pub body: Vec<Statement>,
}

fn void() -> ContractParameterType {
    ContractParameterType::Void
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, return_type: ContractParameterType) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type,
            body: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: ContractParameterType) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn statement(mut self, statement: Statement) -> Self {
        self.body.push(statement);
        self
    }

    pub fn call(self, expr: Expr) -> Self {
        self.statement(Statement::Expr(expr))
    }

    pub fn returning(self, expr: Expr) -> Self {
        self.statement(Statement::Return(Some(expr)))
    }

    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    pub fn param_types(&self) -> Vec<ContractParameterType> {
        self.params.iter().map(|p| p.ty).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    Expr(Expr),
    Return(Option<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Int(i64),
    Bool(bool),
    Str(String),
    Bytes(#[serde(with = "hex_bytes")] Vec<u8>),
    Hash160(UInt160),
    Null,
    /// Reference to a parameter of the enclosing method, by name.
    Arg(String),
    Call(CallExpr),
}

impl Expr {
    pub fn native(interface: &str, method: &str, args: Vec<Expr>) -> Self {
        Expr::Call(CallExpr {
            target: Callee::Native {
                interface: interface.to_string(),
                method: method.to_string(),
            },
            args,
            call_flags: None,
        })
    }

    pub fn local(method: &str, args: Vec<Expr>) -> Self {
        Expr::Call(CallExpr {
            target: Callee::Local {
                method: method.to_string(),
            },
            args,
            call_flags: None,
        })
    }

    pub fn arg(name: &str) -> Self {
        Expr::Arg(name.to_string())
    }

    /// Overrides the token flags of a call expression; other expressions are unchanged.
    pub fn with_flags(mut self, flags: CallFlags) -> Self {
        if let Expr::Call(call) = &mut self {
            call.call_flags = Some(flags);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallExpr {
    pub target: Callee,
    #[serde(default)]
    pub args: Vec<Expr>,
    /// Explicit token flags; the declared default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_flags: Option<CallFlags>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Callee {
    Native { interface: String, method: String },
    Local { method: String },
}

impl std::fmt::Display for Callee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Callee::Native { interface, method } => write!(f, "{interface}.{method}"),
            Callee::Local { method } => f.write_str(method),
        }
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        let digits = text.strip_prefix("0x").unwrap_or(&text);
        hex::decode(digits).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_ir() {
        let text = r#"{
            "name": "Demo",
            "source_url": "https://example.org/demo",
            "methods": [{
                "name": "balance",
                "params": [{ "name": "account", "type": "Hash160" }],
                "return_type": "Integer",
                "body": [
                    { "return": { "call": {
                        "target": { "native": { "interface": "GasToken", "method": "balanceOf" } },
                        "args": [ { "arg": "account" } ]
                    } } }
                ]
            }, {
                "name": "touch",
                "body": [
                    { "expr": { "call": {
                        "target": { "native": { "interface": "NeoToken", "method": "transfer" } },
                        "args": [
                            { "hash160": "0xd2a4cff31913016155e38e474a2c06d08be276cf" },
                            { "bytes": "0x0102" },
                            { "int": 1 },
                            "null"
                        ],
                        "call_flags": 15
                    } } }
                ]
            }]
        }"#;
        let source = ContractSource::from_json(text).unwrap();
        let balance = source.method("balance").unwrap();
        assert_eq!(balance.param_types(), vec![ContractParameterType::Hash160]);
        assert_eq!(
            balance.body[0],
            Statement::Return(Some(Expr::native(
                "GasToken",
                "balanceOf",
                vec![Expr::arg("account")]
            )))
        );

        let touch = source.method("touch").unwrap();
        assert_eq!(touch.return_type, ContractParameterType::Void);
        let Statement::Expr(Expr::Call(call)) = &touch.body[0] else {
            panic!("expected call statement");
        };
        assert_eq!(call.call_flags, Some(CallFlags::ALL));
        assert_eq!(call.args[1], Expr::Bytes(vec![1, 2]));
        assert_eq!(call.args[3], Expr::Null);
    }
}
