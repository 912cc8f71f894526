use std::collections::HashMap;

use serde::Deserialize;

/// The number of arguments a registered function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FunctionSignature {
    pub min_args: usize,
    pub max_args: Option<usize>,
}

impl FunctionSignature {
    pub fn exact(n: usize) -> Self {
        FunctionSignature {
            min_args: n,
            max_args: Some(n),
        }
    }

    pub fn variadic(min_args: usize) -> Self {
        FunctionSignature {
            min_args,
            max_args: None,
        }
    }

    pub fn accepts(&self, n: usize) -> bool {
        n >= self.min_args && self.max_args.map_or(true, |max| n <= max)
    }
}

/// Parser configuration.
///
/// An `Env` is handed to [`Parser::new`](crate::Parser::new) explicitly. It
/// can also be loaded from JSON, where every field is optional:
///
/// ```
/// use field_path::Env;
///
/// let env = Env::from_json(r#"{"max_index": 1024}"#).unwrap();
/// assert_eq!(env.max_index, 1024);
/// assert!(env.functions.contains_key("lower"));
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Env {
    pub max_index: u64,
    pub permissive_functions: bool,
    pub functions: HashMap<String, FunctionSignature>,
}

impl Default for Env {
    fn default() -> Self {
        Env::standard()
    }
}

impl Env {
    pub fn standard() -> Self {
        let mut functions = HashMap::new();

        for name in ["abs", "ceil", "floor", "sqrt", "length", "lower", "upper", "trim"] {
            functions.insert(name.to_owned(), FunctionSignature::exact(1));
        }
        for name in ["mod", "power", "round"] {
            functions.insert(name.to_owned(), FunctionSignature::exact(2));
        }
        functions.insert("substr".to_owned(), FunctionSignature::variadic(2));
        functions.insert("concat".to_owned(), FunctionSignature::variadic(1));
        functions.insert("coalesce".to_owned(), FunctionSignature::variadic(1));
        functions.insert("now".to_owned(), FunctionSignature::exact(0));

        Env {
            max_index: usize::MAX as u64,
            permissive_functions: false,
            functions,
        }
    }

    /// The standard environment, but unknown functions are accepted with
    /// any number of arguments.
    pub fn permissive() -> Self {
        Env {
            permissive_functions: true,
            ..Env::standard()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn add_function(&mut self, name: &str, signature: FunctionSignature) {
        self.functions.insert(name.to_ascii_lowercase(), signature);
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.get(&name.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_arity() {
        assert!(FunctionSignature::exact(1).accepts(1));
        assert!(!FunctionSignature::exact(1).accepts(2));
        assert!(FunctionSignature::variadic(1).accepts(5));
        assert!(!FunctionSignature::variadic(1).accepts(0));
    }

    #[test]
    fn json_overrides_defaults() {
        let env = Env::from_json(
            r#"{"permissive_functions": true, "functions": {"f": {"min_args": 0, "max_args": null}}}"#,
        )
        .unwrap();
        assert!(env.permissive_functions);
        assert_eq!(env.max_index, usize::MAX as u64);
        assert_eq!(env.function("F"), Some(&FunctionSignature::variadic(0)));
        assert!(env.function("lower").is_none());
    }
}
