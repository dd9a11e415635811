// src/targets/action.rs

/// A build action bound to a target name.
///
/// Actions take nothing and return nothing. Reporting progress, and exiting
/// the process on failure, is up to the action itself.
pub trait RunAction {
    fn invoke(&self);
}

impl<F> RunAction for F
where
    F: Fn(),
{
    fn invoke(&self) {
        self()
    }
}
