// src/targets/registry.rs

use std::collections::BTreeMap;
use std::fmt;

use tracing::{error, info};

use crate::errors::{PybuildError, Result};
use crate::targets::action::RunAction;

/// Position of the target name in the invocation tokens. Index 0 is the
/// program name.
const TARGET_ARG_INDEX: usize = 1;

/// Which target a successful [`Registry::dispatch`] ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub target: String,
    /// True when no name was given and the only registered target was used.
    pub defaulted: bool,
}

/// Named build targets.
///
/// Target names are unique; registering a name twice keeps the later action.
#[derive(Default)]
pub struct Registry {
    targets: BTreeMap<String, Box<dyn RunAction>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            targets: BTreeMap::new(),
        }
    }

    /// Bind `name` to `action`, replacing any earlier binding.
    pub fn register<N, A>(&mut self, name: N, action: A)
    where
        N: Into<String>,
        A: RunAction + 'static,
    {
        self.targets.insert(name.into(), Box::new(action));
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Resolve a target from invocation tokens and invoke it.
    ///
    /// `args[1]`, if present, names the target; everything else is ignored.
    /// Without a name the single registered target runs as the default.
    ///
    /// At most one action is invoked. Usage errors are logged here and
    /// returned; nothing is invoked in that case.
    pub fn dispatch<S: AsRef<str>>(&self, args: &[S]) -> Result<Dispatched> {
        let resolved = self.resolve(args);
        let (name, defaulted) = match resolved {
            Ok(found) => found,
            Err(err) => {
                error!("{err}");
                return Err(err);
            }
        };

        if defaulted {
            info!(name, "no target supplied; defaulting to the only target");
        }

        let action = &self.targets[name];
        action.invoke();

        Ok(Dispatched {
            target: name.to_string(),
            defaulted,
        })
    }

    fn resolve<S: AsRef<str>>(&self, args: &[S]) -> Result<(&str, bool)> {
        let Some(requested) = args.get(TARGET_ARG_INDEX).map(AsRef::as_ref) else {
            let mut names = self.targets.keys();
            return match (names.next(), names.next()) {
                (Some(only), None) => Ok((only.as_str(), true)),
                (Some(_), Some(_)) => Err(PybuildError::AmbiguousTarget {
                    count: self.targets.len(),
                }),
                (None, _) => Err(PybuildError::NoTargets),
            };
        };

        match self.targets.get_key_value(requested) {
            Some((name, _)) => Ok((name.as_str(), false)),
            None => Err(PybuildError::UnknownTarget(requested.to_string())),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("targets", &self.targets.keys().collect::<Vec<_>>())
            .finish()
    }
}
