//! Function registry: every accessor as a named query or mutation endpoint
//!
//! Calls are dispatched by path (`"projects:getAll"`). Arguments are checked
//! against the declared [`Validator`] before the handler runs, so a handler
//! never sees a malformed argument record.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Mutex;

use crate::content;
use crate::error::{Error, Result};
use crate::schema::Validator;
use crate::store::{DocumentStore, MutationCtx, QueryCtx};

/// Read-only or read-write endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Query,
    Mutation,
}

impl FunctionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionKind::Query => "query",
            FunctionKind::Mutation => "mutation",
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type QueryHandler = Box<dyn Fn(&QueryCtx<'_>, Value) -> Result<Value> + Send + Sync>;
type MutationHandler = Box<dyn Fn(&MutationCtx<'_>, Value) -> Result<Value> + Send + Sync>;

enum Handler {
    Query(QueryHandler),
    Mutation(MutationHandler),
}

struct Function {
    args: Validator,
    handler: Handler,
}

impl Function {
    fn kind(&self) -> FunctionKind {
        match self.handler {
            Handler::Query(_) => FunctionKind::Query,
            Handler::Mutation(_) => FunctionKind::Mutation,
        }
    }
}

/// Table of named endpoints
///
/// Mutations called through the registry run one at a time, so a handler's
/// reads and writes are not interleaved with another mutation's.
#[derive(Default)]
pub struct Registry {
    functions: BTreeMap<String, Function>,
    mutations: Mutex<()>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every portfolio accessor
    pub fn portfolio() -> Self {
        let mut registry = Self::new();
        content::projects::register(&mut registry);
        content::neon::register(&mut registry);
        content::photography::register(&mut registry);
        content::pixel_gallery::register(&mut registry);
        content::testing_data::register(&mut registry);
        content::blog::register(&mut registry);
        content::page_content::register(&mut registry);
        registry
    }

    /// Register a read-only endpoint
    pub fn query<A, R, F>(&mut self, path: &str, args: Validator, handler: F)
    where
        A: DeserializeOwned,
        R: Serialize,
        F: Fn(&QueryCtx<'_>, A) -> Result<R> + Send + Sync + 'static,
    {
        let handler: QueryHandler = Box::new(move |ctx: &QueryCtx<'_>, raw: Value| {
            let args: A = serde_json::from_value(raw)?;
            Ok(serde_json::to_value(handler(ctx, args)?)?)
        });
        self.functions.insert(
            path.to_string(),
            Function {
                args,
                handler: Handler::Query(handler),
            },
        );
    }

    /// Register a read-write endpoint
    pub fn mutation<A, R, F>(&mut self, path: &str, args: Validator, handler: F)
    where
        A: DeserializeOwned,
        R: Serialize,
        F: Fn(&MutationCtx<'_>, A) -> Result<R> + Send + Sync + 'static,
    {
        let handler: MutationHandler = Box::new(move |ctx: &MutationCtx<'_>, raw: Value| {
            let args: A = serde_json::from_value(raw)?;
            Ok(serde_json::to_value(handler(ctx, args)?)?)
        });
        self.functions.insert(
            path.to_string(),
            Function {
                args,
                handler: Handler::Mutation(handler),
            },
        );
    }

    /// Registered paths with their kinds, sorted by path
    pub fn functions(&self) -> impl Iterator<Item = (&str, FunctionKind)> {
        self.functions.iter().map(|(p, f)| (p.as_str(), f.kind()))
    }

    pub fn kind_of(&self, path: &str) -> Option<FunctionKind> {
        self.functions.get(path).map(Function::kind)
    }

    /// Validate `args` and run the endpoint at `path`
    ///
    /// `kind` names the entry point used; a mutation cannot be invoked as a
    /// query or the other way round. `null` arguments mean `{}`.
    pub fn call(
        &self,
        db: &dyn DocumentStore,
        kind: FunctionKind,
        path: &str,
        args: Value,
    ) -> Result<Value> {
        let function = self
            .functions
            .get(path)
            .ok_or_else(|| Error::UnknownFunction(path.to_string()))?;

        if function.kind() != kind {
            return Err(Error::WrongFunctionKind {
                path: path.to_string(),
                expected: kind.as_str(),
                actual: function.kind().as_str(),
            });
        }

        let args = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args
        };
        if let Err(e) = function.args.validate(&args, "args") {
            tracing::warn!("Rejected {} {}: {}", kind, path, e);
            return Err(e.into());
        }

        tracing::debug!("Running {} {}", kind, path);
        match &function.handler {
            Handler::Query(handler) => handler(&QueryCtx::new(db), args),
            Handler::Mutation(handler) => {
                // A poisoned lock guards no data; keep serving
                let _serial = self
                    .mutations
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                handler(&MutationCtx::new(db), args)
            }
        }
    }
}
