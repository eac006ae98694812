//! Binding declared parameters and invoking the selected subcommand
//!
//! Each parameter of a subcommand's [`Signature`] is resolved on its own:
//! context parameters come from the [`InvocationContext`] (the robot class is
//! loaded lazily, at most once), option parameters come from the options the
//! subcommand registered. Anything else is a defect in the subcommand.

use std::{collections::BTreeMap, path::Path};

use crate::{
    context::InvocationContext,
    loader::RobotClass,
    options::{OptionValue, ParsedOptions},
    registry::Subcommand,
    signature::{ContextKey, ParamKind, Parameter, Signature},
    Error, Result,
};

/// Arguments resolved for one call of [`Subcommand::run`].
#[derive(Debug, Default)]
pub struct BoundArgs<'a> {
    options: Option<&'a ParsedOptions>,
    robot_class: Option<&'a RobotClass>,
    main_file: Option<&'a Path>,
    project_path: Option<&'a Path>,
    values: BTreeMap<String, OptionValue>,
}

impl<'a> BoundArgs<'a> {
    pub fn options(&self) -> Result<&'a ParsedOptions> {
        self.options.ok_or_else(|| undeclared(ContextKey::Options))
    }

    pub fn robot_class(&self) -> Result<&'a RobotClass> {
        self.robot_class.ok_or_else(|| undeclared(ContextKey::RobotClass))
    }

    pub fn main_file(&self) -> Result<&'a Path> {
        self.main_file.ok_or_else(|| undeclared(ContextKey::MainFile))
    }

    pub fn project_path(&self) -> Result<&'a Path> {
        self.project_path
            .ok_or_else(|| undeclared(ContextKey::ProjectPath))
    }

    pub fn value(&self, name: &str) -> Result<&OptionValue> {
        self.values
            .get(name)
            .ok_or_else(|| Error::internal(format!("'{name}' was not declared in the signature")))
    }

    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.value(name)? {
            OptionValue::Flag(on) => Ok(*on),
            other => Err(wrong_kind(name, "flag", other)),
        }
    }

    pub fn text(&self, name: &str) -> Result<Option<&str>> {
        match self.value(name)? {
            OptionValue::Text(text) => Ok(text.as_deref()),
            other => Err(wrong_kind(name, "value", other)),
        }
    }

    pub fn list(&self, name: &str) -> Result<&[String]> {
        match self.value(name)? {
            OptionValue::List(items) => Ok(items),
            other => Err(wrong_kind(name, "list", other)),
        }
    }

    pub fn has(&self, key: ContextKey) -> bool {
        match key {
            ContextKey::Options => self.options.is_some(),
            ContextKey::RobotClass => self.robot_class.is_some(),
            ContextKey::MainFile => self.main_file.is_some(),
            ContextKey::ProjectPath => self.project_path.is_some(),
        }
    }
}

fn undeclared(key: ContextKey) -> Error {
    Error::internal(format!("'{key}' was not declared in the signature"))
}

fn wrong_kind(name: &str, expected: &str, found: &OptionValue) -> Error {
    Error::internal(format!("option '{name}' is not a {expected}: {found:?}"))
}

/// Resolve every parameter of `signature` against `ctx`.
///
/// The signature is validated before anything is resolved, so a defective
/// subcommand never triggers loading of the user's module.
pub fn bind<'a>(signature: &Signature, ctx: &'a InvocationContext) -> Result<BoundArgs<'a>> {
    if signature.params().iter().any(|param| {
        matches!(
            param,
            Parameter::Option {
                kind: ParamKind::PositionalOnly,
                ..
            }
        )
    }) {
        return Err(Error::internal(
            "subcommands may only have keyword or normal arguments",
        ));
    }

    let mut args = BoundArgs::default();

    for param in signature.params() {
        match param {
            Parameter::Context(ContextKey::Options) => args.options = Some(ctx.options()),
            Parameter::Context(ContextKey::RobotClass) => {
                args.robot_class = Some(ctx.robot_class()?);
            }
            Parameter::Context(ContextKey::MainFile) => args.main_file = Some(ctx.main_file()),
            Parameter::Context(ContextKey::ProjectPath) => {
                args.project_path = Some(ctx.project_path());
            }
            Parameter::Option { name, .. } => {
                let value = ctx.options().get(name).ok_or_else(|| {
                    Error::internal(format!(
                        "subcommand '{}' requested option '{name}' which it never registered",
                        ctx.options().command()
                    ))
                })?;
                args.values.insert(name.clone(), value.clone());
            }
        }
    }

    Ok(args)
}

/// Bind arguments for `handler`, run it once, and return the exit code.
pub fn dispatch(handler: &dyn Subcommand, ctx: &InvocationContext) -> anyhow::Result<i32> {
    let signature = handler.signature();
    let args = bind(&signature, ctx)?;

    tracing::debug!(
        command = ctx.options().command(),
        params = signature.params().len(),
        "dispatching subcommand"
    );

    let outcome = handler.run(&args)?;
    Ok(outcome.exit_code())
}
