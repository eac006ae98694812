//! Declared parameters of a subcommand's `run`
//!
//! A subcommand states up front which contextual values it needs and which of
//! its own registered options it wants passed through. The dispatcher binds
//! exactly these, nothing more.

use std::str::FromStr;

use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Well-known values the launcher can supply on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ContextKey {
    /// The parsed options object itself
    Options,
    /// The robot class from the user's main file (loaded lazily)
    RobotClass,
    /// Path of the user's main file; may not exist unless `RobotClass` is also requested
    MainFile,
    /// Directory containing the main file
    ProjectPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    PositionalOrKeyword,
    KeywordOnly,
    /// Not bindable by name; rejected at dispatch
    PositionalOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    Context(ContextKey),
    Option { name: String, kind: ParamKind },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Parameter>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a signature from plain parameter names.
    ///
    /// The reserved names `options`, `robot_class`, `main_file` and
    /// `project_path` become context parameters; every other name is an
    /// option parameter.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        names
            .into_iter()
            .fold(Self::new(), |sig, name| match ContextKey::from_str(name) {
                Ok(key) => sig.context(key),
                Err(_) => sig.option(name),
            })
    }

    pub fn context(mut self, key: ContextKey) -> Self {
        self.params.push(Parameter::Context(key));
        self
    }

    pub fn option(self, name: impl Into<String>) -> Self {
        self.param(name, ParamKind::PositionalOrKeyword)
    }

    pub fn keyword_only(self, name: impl Into<String>) -> Self {
        self.param(name, ParamKind::KeywordOnly)
    }

    pub fn positional_only(self, name: impl Into<String>) -> Self {
        self.param(name, ParamKind::PositionalOnly)
    }

    fn param(mut self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.params.push(Parameter::Option {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn needs(&self, key: ContextKey) -> bool {
        self.params.contains(&Parameter::Context(key))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_reserved_names_round_trip_through_strum() {
        for key in ContextKey::iter() {
            assert_eq!(ContextKey::from_str(key.as_ref()).ok(), Some(key));
        }
        assert_eq!(ContextKey::RobotClass.as_ref(), "robot_class");
        assert_eq!(ContextKey::ProjectPath.to_string(), "project_path");
    }

    #[test]
    fn test_from_names_splits_context_and_options() {
        let sig = Signature::from_names(["options", "robot_class", "port", "main_file"]);

        assert!(sig.needs(ContextKey::Options));
        assert!(sig.needs(ContextKey::RobotClass));
        assert!(sig.needs(ContextKey::MainFile));
        assert!(!sig.needs(ContextKey::ProjectPath));
        assert!(sig.params().contains(&Parameter::Option {
            name: "port".to_string(),
            kind: ParamKind::PositionalOrKeyword,
        }));
    }

    #[test]
    fn test_builder_keeps_declaration_order() {
        let sig = Signature::new()
            .keyword_only("json")
            .context(ContextKey::MainFile)
            .positional_only("x");

        assert_eq!(sig.params().len(), 3);
        assert!(matches!(
            &sig.params()[2],
            Parameter::Option { kind: ParamKind::PositionalOnly, .. }
        ));
    }
}
