use std::{
    any::Any,
    collections::HashMap,
    rc::Rc,
};

use serde::Serialize;

use crate::{
    error::{Error, ResolutionError, Result},
    invoke::{Args, ClassDescriptor, Thunk},
    outcome::TestResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MethodInfo {
    pub visibility: Visibility,
    pub is_static: bool,
}

type InstanceFn<T> = Rc<dyn Fn(&mut T, &Args) -> TestResult>;
type StaticFn = Rc<dyn Fn(&Args) -> TestResult>;

enum Body<T> {
    Instance(InstanceFn<T>),
    Static(StaticFn),
}

struct Method<T> {
    visibility: Visibility,
    body: Body<T>,
}

enum Constructor<T> {
    NoArgs(Rc<dyn Fn() -> T>),
    Requires(Vec<String>),
}

/// Description of a type whose methods can be invoked by name.
pub struct Class<T> {
    name: String,
    constructor: Option<Constructor<T>>,
    methods: HashMap<String, Method<T>>,
}

impl<T: 'static> Class<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: None,
            methods: HashMap::new(),
        }
    }

    /// The type can be built without arguments using `build`.
    pub fn default_constructor(self, build: impl Fn() -> T + 'static) -> Self {
        Self {
            constructor: Some(Constructor::NoArgs(Rc::new(build))),
            ..self
        }
    }

    /// The type's constructor needs these parameters, so it is never built automatically.
    pub fn constructor_requires<S: Into<String>>(self, params: impl IntoIterator<Item = S>) -> Self {
        Self {
            constructor: Some(Constructor::Requires(
                params.into_iter().map(Into::into).collect(),
            )),
            ..self
        }
    }

    pub fn method<F, R>(mut self, name: impl Into<String>, visibility: Visibility, f: F) -> Self
    where
        F: Fn(&mut T, &Args) -> R + 'static,
        R: Into<TestResult>,
    {
        let body = Body::Instance(Rc::new(move |this: &mut T, args: &Args| f(this, args).into()));
        self.methods.insert(name.into(), Method { visibility, body });
        self
    }

    pub fn static_method<F, R>(
        mut self,
        name: impl Into<String>,
        visibility: Visibility,
        f: F,
    ) -> Self
    where
        F: Fn(&Args) -> R + 'static,
        R: Into<TestResult>,
    {
        let body = Body::Static(Rc::new(move |args: &Args| f(args).into()));
        self.methods.insert(name.into(), Method { visibility, body });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn no_args_constructor(&self) -> Result<Rc<dyn Fn() -> T>> {
        match &self.constructor {
            Some(Constructor::NoArgs(build)) => Ok(Rc::clone(build)),
            Some(Constructor::Requires(params)) => Err(Error::Construction {
                class: self.name.clone(),
                reason: format!("constructor requires {}", params.join(", ")),
            }),
            None => Err(Error::Construction {
                class: self.name.clone(),
                reason: String::from("no constructor registered"),
            }),
        }
    }
}

enum Receiver<T> {
    Live(Box<dyn Any>, &'static str),
    Build(Rc<dyn Fn() -> T>),
}

impl<T: 'static> ClassDescriptor for Class<T> {
    fn method_info(&self, method: &str) -> Option<MethodInfo> {
        self.methods.get(method).map(|m| MethodInfo {
            visibility: m.visibility,
            is_static: matches!(m.body, Body::Static(_)),
        })
    }

    fn bind(
        &self,
        instance: Option<(Box<dyn Any>, &'static str)>,
        method: &str,
        args: Args,
    ) -> Result<Thunk> {
        // A bare class name needs a usable constructor before the method is even looked up.
        let receiver = match instance {
            Some((value, type_name)) => Receiver::Live(value, type_name),
            None => Receiver::Build(self.no_args_constructor()?),
        };

        let found = self
            .methods
            .get(method)
            .ok_or_else(|| ResolutionError::UnknownMethod {
                class: self.name.clone(),
                method: method.to_string(),
            })?;

        let mut this: T = match receiver {
            Receiver::Live(value, type_name) => {
                *value
                    .downcast::<T>()
                    .map_err(|_| ResolutionError::ReceiverMismatch {
                        class: self.name.clone(),
                        found: type_name,
                    })?
            }
            Receiver::Build(build) => build(),
        };

        match &found.body {
            Body::Static(f) => {
                tracing::trace!("dropping {} instance for static {method}", self.name);
                drop(this);
                let f = Rc::clone(f);
                Ok(Box::new(move || f(&args)))
            }
            Body::Instance(f) => {
                let f = Rc::clone(f);
                Ok(Box::new(move || f(&mut this, &args)))
            }
        }
    }
}
