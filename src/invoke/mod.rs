//! Invoking methods of types under test by name.
//!
//! Rust cannot look up methods at runtime or step around privacy, so a type under test
//! opts in by describing itself with a [`Class`]: its name, how to build it without
//! arguments (if it can be), and the methods that may be called by name. The closures in a
//! `Class` are usually written in the type's own `#[cfg(test)]` module, where private items
//! are in reach; the recorded [`Visibility`] is informational and never enforced.
//!
//! ```ignore
//! pilot.register_class(
//!     Class::<Greeter>::new("Greeter")
//!         .default_constructor(Greeter::default)
//!         .method("secret", Visibility::Private, |this, _| this.secret()),
//! );
//! pilot.run_class_method(None, MethodCall::class("Greeter::secret"), "private method")?;
//! ```
//!
//! Resolving a [`MethodCall`] happens before the call is made, so resolution problems are
//! harness errors and never end up as a captured outcome.

mod args;
pub use args::*;

mod class;
pub use class::*;

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt::Debug,
    rc::Rc,
};

use crate::{
    error::{Error, ResolutionError, Result},
    outcome::TestResult,
};

/// A resolved call, ready to run exactly once.
pub type Thunk = Box<dyn FnOnce() -> TestResult>;

/// What to call a method on.
pub enum Target {
    /// A class name, or the compact `"Class::method"` form.
    Class(String),
    /// A live instance. Its type must belong to a registered class.
    Instance {
        value: Box<dyn Any>,
        type_name: &'static str,
    },
}

impl Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Class(name) => f.debug_tuple("Class").field(name).finish(),
            Target::Instance { type_name, .. } => {
                f.debug_struct("Instance").field("type_name", type_name).finish()
            }
        }
    }
}

/// A request to invoke a method through the [`ClassRegistry`].
#[derive(Debug)]
pub struct MethodCall {
    pub target: Target,
    pub method: Option<String>,
    pub args: Args,
}

impl MethodCall {
    /// Call on a class by name. `reference` may carry the method as `"Class::method"`.
    pub fn class(reference: impl Into<String>) -> Self {
        Self {
            target: Target::Class(reference.into()),
            method: None,
            args: Args::none(),
        }
    }

    /// Call on a live instance instead of letting the invoker build one.
    pub fn on<T: Any>(instance: T) -> Self {
        Self {
            target: Target::Instance {
                value: Box::new(instance),
                type_name: std::any::type_name::<T>(),
            },
            method: None,
            args: Args::none(),
        }
    }

    pub fn method(self, method: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            ..self
        }
    }

    pub fn args(self, args: Args) -> Self {
        Self { args, ..self }
    }
}

/// How a class is reached by the registry, independent of its Rust type.
pub(crate) trait ClassDescriptor {
    fn method_info(&self, method: &str) -> Option<MethodInfo>;

    /// Build the thunk for `method`, constructing an instance when none was supplied.
    fn bind(
        &self,
        instance: Option<(Box<dyn Any>, &'static str)>,
        method: &str,
        args: Args,
    ) -> Result<Thunk>;
}

/// Every class the pilot can invoke methods on.
#[derive(Default)]
pub struct ClassRegistry {
    classes: HashMap<String, Rc<dyn ClassDescriptor>>,
    by_type: HashMap<TypeId, String>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `class`, replacing any class of the same name.
    pub fn register<T: 'static>(&mut self, class: Class<T>) {
        let name = class.name().to_string();
        tracing::debug!("registering class {name}");
        self.by_type.insert(TypeId::of::<T>(), name.clone());
        self.classes.insert(name, Rc::new(class));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn method_info(&self, class: &str, method: &str) -> Option<MethodInfo> {
        self.classes.get(class)?.method_info(method)
    }

    /// Resolve `call` into a thunk without running it.
    pub fn prepare(&self, call: MethodCall) -> Result<Thunk> {
        let MethodCall {
            target,
            method,
            args,
        } = call;

        match target {
            Target::Class(reference) => {
                let (class_name, method) = self.split_reference(&reference, method)?;
                let class = self
                    .classes
                    .get(class_name)
                    .ok_or_else(|| ResolutionError::UnknownClass(class_name.to_string()))?;
                class.bind(None, &method, args)
            }
            Target::Instance { value, type_name } => {
                let method = non_empty(method)?;
                let class = self
                    .by_type
                    .get(&(*value).type_id())
                    .and_then(|name| self.classes.get(name))
                    .ok_or(ResolutionError::UnregisteredType(type_name))?;
                class.bind(Some((value, type_name)), &method, args)
            }
        }
    }

    /// Split a class reference into class name and method name.
    ///
    /// A registered name is taken as is, otherwise the last `::` separates the compact
    /// `"Class::method"` form.
    fn split_reference<'r>(
        &self,
        reference: &'r str,
        method: Option<String>,
    ) -> Result<(&'r str, String)> {
        let (class, compact) = match (self.contains(reference), reference.rsplit_once("::")) {
            (false, Some((class, method))) => (class, Some(method)),
            _ => (reference, None),
        };

        let method = match (compact, method) {
            (Some(compact), None) => Some(compact.to_string()),
            (Some(compact), Some(explicit)) if compact == explicit => Some(explicit),
            (Some(compact), Some(explicit)) => {
                return Err(Error::InvalidInvocation(format!(
                    "{reference} names method {compact} but {explicit} was requested"
                )));
            }
            (None, method) => method,
        };

        Ok((class, non_empty(method)?))
    }
}

impl Debug for ClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.classes.keys().collect();
        names.sort_unstable();
        f.debug_tuple("ClassRegistry").field(&names).finish()
    }
}

fn non_empty(method: Option<String>) -> Result<String> {
    match method {
        Some(method) if !method.trim().is_empty() => Ok(method),
        _ => Err(Error::InvalidInvocation(String::from(
            "a method name is required",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::outcome::Outcome;

    #[derive(Default)]
    struct Counter {
        count: u64,
    }

    impl Counter {
        fn bump(&mut self, by: u64) -> u64 {
            self.count += by;
            self.count
        }

        fn unit() -> &'static str {
            "items"
        }
    }

    struct Account {
        owner: String,
    }

    fn registry() -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        registry.register(
            Class::<Counter>::new("Counter")
                .default_constructor(Counter::default)
                .method("bump", Visibility::Private, |this, args| {
                    let by = args.get(0, "by").and_then(|v| v.as_u64()).unwrap_or(1);
                    this.bump(by)
                })
                .static_method("unit", Visibility::Protected, |_| Counter::unit()),
        );
        registry.register(
            Class::<Account>::new("Account")
                .constructor_requires(["owner"])
                .method("owner", Visibility::Public, |this, _| this.owner.clone()),
        );
        registry
    }

    fn run(thunk: Thunk) -> Outcome {
        thunk().into()
    }

    #[test]
    fn compact_form_builds_an_instance() {
        let thunk = registry()
            .prepare(MethodCall::class("Counter::bump").args(Args::positional([json!(3)])))
            .unwrap();
        assert_eq!(run(thunk).value(), Some(&json!(3)));
    }

    #[test]
    fn named_arguments_reach_the_method() {
        let thunk = registry()
            .prepare(
                MethodCall::class("Counter")
                    .method("bump")
                    .args(Args::named([("by", json!(5))])),
            )
            .unwrap();
        assert_eq!(run(thunk).value(), Some(&json!(5)));
    }

    #[test]
    fn live_instances_keep_their_state() {
        let thunk = registry()
            .prepare(MethodCall::on(Counter { count: 10 }).method("bump"))
            .unwrap();
        assert_eq!(run(thunk).value(), Some(&json!(11)));
    }

    #[test]
    fn static_methods_work_on_instances_too() {
        let thunk = registry()
            .prepare(MethodCall::on(Counter::default()).method("unit"))
            .unwrap();
        assert_eq!(run(thunk).value(), Some(&json!("items")));
    }

    #[test]
    fn required_constructor_parameters_block_construction() {
        let err = registry()
            .prepare(MethodCall::class("Account::owner"))
            .err().unwrap();
        assert!(matches!(err, Error::Construction { class, .. } if class == "Account"));

        let thunk = registry()
            .prepare(
                MethodCall::on(Account {
                    owner: "ada".into(),
                })
                .method("owner"),
            )
            .unwrap();
        assert_eq!(run(thunk).value(), Some(&json!("ada")));
    }

    #[test]
    fn method_names_are_required() {
        let registry = registry();
        for call in [
            MethodCall::class("Counter"),
            MethodCall::class("Counter::"),
            MethodCall::class("Counter").method(""),
            MethodCall::on(Counter::default()),
        ] {
            assert!(matches!(
                registry.prepare(call),
                Err(Error::InvalidInvocation(_))
            ));
        }

        assert!(matches!(
            registry.prepare(MethodCall::class("Counter::bump").method("unit")),
            Err(Error::InvalidInvocation(_))
        ));
    }

    #[test]
    fn resolution_errors() {
        let registry = registry();
        assert!(matches!(
            registry.prepare(MethodCall::class("Nope::bump")),
            Err(Error::Resolution(ResolutionError::UnknownClass(name))) if name == "Nope"
        ));
        assert!(matches!(
            registry.prepare(MethodCall::class("Counter::reset")),
            Err(Error::Resolution(ResolutionError::UnknownMethod { method, .. })) if method == "reset"
        ));
        assert!(matches!(
            registry.prepare(MethodCall::on(42u8).method("bump")),
            Err(Error::Resolution(ResolutionError::UnregisteredType("u8")))
        ));
    }

    #[test]
    fn replaced_classes_reject_old_instances() {
        let mut registry = registry();
        registry.register(
            Class::<Account>::new("Counter")
                .constructor_requires(["owner"])
                .method("owner", Visibility::Public, |this, _| this.owner.clone()),
        );

        assert!(matches!(
            registry.prepare(MethodCall::on(Counter::default()).method("owner")),
            Err(Error::Resolution(ResolutionError::ReceiverMismatch { class, found }))
                if class == "Counter" && found.ends_with("Counter")
        ));
    }

    #[test]
    fn method_info_exposes_visibility() {
        let registry = registry();
        assert_eq!(
            registry.method_info("Counter", "bump"),
            Some(MethodInfo {
                visibility: Visibility::Private,
                is_static: false
            })
        );
        assert_eq!(
            registry.method_info("Counter", "unit"),
            Some(MethodInfo {
                visibility: Visibility::Protected,
                is_static: true
            })
        );
        assert_eq!(registry.method_info("Counter", "nope"), None);
    }
}
