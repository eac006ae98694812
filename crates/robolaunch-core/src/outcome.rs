//! Subcommand return values and their process exit codes

/// What a subcommand's `run` hands back to the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    /// Nothing to report; success
    #[default]
    Unit,
    /// `true` is success, `false` is failure
    Bool(bool),
    /// Propagated verbatim as the process exit code
    Code(i32),
}

impl Outcome {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Unit | Self::Bool(true) => 0,
            Self::Bool(false) => 1,
            Self::Code(code) => code,
        }
    }
}

impl From<()> for Outcome {
    fn from((): ()) -> Self {
        Self::Unit
    }
}

impl From<bool> for Outcome {
    fn from(ok: bool) -> Self {
        Self::Bool(ok)
    }
}

impl From<i32> for Outcome {
    fn from(code: i32) -> Self {
        Self::Code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_normalization() {
        assert_eq!(Outcome::from(()).exit_code(), 0);
        assert_eq!(Outcome::from(true).exit_code(), 0);
        assert_eq!(Outcome::from(false).exit_code(), 1);
        assert_eq!(Outcome::from(0).exit_code(), 0);
        assert_eq!(Outcome::from(42).exit_code(), 42);
        assert_eq!(Outcome::from(-3).exit_code(), -3);
    }
}
