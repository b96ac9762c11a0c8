//! Attribute definitions — the values that get injected.
//!
//! A [`Definition`] is exactly one of three kinds, chosen explicitly by the
//! caller: an instance method, a computed read-only property, or a constant.
//! Methods and properties wrap a [`Callable`], which carries its declared
//! parameter count so the registry can enforce the property-arity
//! precondition before any mutation happens.

use std::fmt;
use std::sync::Arc;

/// The dynamic value currency for constants, method arguments, and results.
pub type Value = serde_json::Value;

/// Errors raised when an injected attribute is invoked or read.
///
/// Distinct from [`InjectError`](crate::InjectError): these surface at call
/// time on the consumer side, never during injection itself.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("no attribute named '{name}'")]
    UnknownAttribute { name: String },

    #[error("attribute '{name}' is not a method")]
    NotAMethod { name: String },

    #[error("attribute '{name}' is not a property or constant")]
    NotAProperty { name: String },

    #[error("missing argument at position {index}")]
    MissingArgument { index: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

type CallFn<T> = dyn Fn(&T, &[Value]) -> Result<Value, CallError> + Send + Sync;

/// A callable attribute body: the instance plus positional [`Value`]
/// arguments, producing a [`Value`].
///
/// `params` is declared metadata, the instance included — the moral
/// equivalent of callable introspection in a dynamic host. The registry
/// reads it for the `as_property` check; `invoke` itself does not enforce
/// it, argument validation belongs to the body.
pub struct Callable<T> {
    func: Arc<CallFn<T>>,
    params: usize,
}

impl<T> Callable<T> {
    /// Wrap a function body with its declared parameter count.
    pub fn new<F>(params: usize, func: F) -> Self
    where
        F: Fn(&T, &[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            params,
        }
    }

    /// Declared parameter count, instance included.
    pub fn params(&self) -> usize {
        self.params
    }

    /// Invoke the body against an instance.
    pub fn invoke(&self, instance: &T, args: &[Value]) -> Result<Value, CallError> {
        (self.func)(instance, args)
    }
}

impl<T> Clone for Callable<T> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            params: self.params,
        }
    }
}

impl<T> fmt::Debug for Callable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// One attribute definition, polymorphic over the three injectable kinds.
pub enum Definition<T> {
    /// A callable bound as an instance method.
    Method(Callable<T>),
    /// A computed read-only property backed by a one-parameter callable.
    Property(Callable<T>),
    /// A class-level constant value.
    Constant(Value),
}

impl<T> Definition<T> {
    /// An instance method with the given declared parameter count
    /// (instance included).
    pub fn method<F>(params: usize, func: F) -> Self
    where
        F: Fn(&T, &[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self::Method(Callable::new(params, func))
    }

    /// A computed property. Arity is one by construction.
    pub fn property<F>(func: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        Self::Property(Callable::new(1, move |instance, _args| Ok(func(instance))))
    }

    /// A constant value.
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    /// Human-readable kind tag, for logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Method(_) => "method",
            Self::Property(_) => "property",
            Self::Constant(_) => "constant",
        }
    }
}

impl<T> Clone for Definition<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Method(c) => Self::Method(c.clone()),
            Self::Property(c) => Self::Property(c.clone()),
            Self::Constant(v) => Self::Constant(v.clone()),
        }
    }
}

impl<T> fmt::Debug for Definition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(c) => f.debug_tuple("Method").field(&c.params).finish(),
            Self::Property(c) => f.debug_tuple("Property").field(&c.params).finish(),
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_invokes_with_instance_and_args() {
        let def: Definition<i64> = Definition::method(2, |n, args| {
            let rhs = args
                .first()
                .and_then(Value::as_i64)
                .ok_or(CallError::MissingArgument { index: 0 })?;
            Ok(json!(n + rhs))
        });
        let Definition::Method(callable) = def else {
            panic!("expected a method");
        };
        assert_eq!(callable.params(), 2);
        assert_eq!(callable.invoke(&40, &[json!(2)]).unwrap(), json!(42));
    }

    #[test]
    fn property_has_arity_one() {
        let def: Definition<String> = Definition::property(|s: &String| json!(s.len()));
        let Definition::Property(callable) = def else {
            panic!("expected a property");
        };
        assert_eq!(callable.params(), 1);
        assert_eq!(
            callable.invoke(&"abc".to_string(), &[]).unwrap(),
            json!(3)
        );
    }

    #[test]
    fn kind_tags() {
        assert_eq!(Definition::<()>::constant("x").kind(), "constant");
        assert_eq!(
            Definition::<()>::method(1, |_, _| Ok(Value::Null)).kind(),
            "method"
        );
    }
}
