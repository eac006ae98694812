//! Values the launcher can hand to a subcommand on request

use std::{
    cell::OnceCell,
    path::{Path, PathBuf},
};

use crate::{
    loader::{RobotClass, RobotLoader},
    options::ParsedOptions,
    LoadError,
};

pub struct InvocationContext {
    options: ParsedOptions,
    main_file: PathBuf,
    loader: Box<dyn RobotLoader>,
    robot_class: OnceCell<RobotClass>,
}

impl InvocationContext {
    pub fn new(options: ParsedOptions, loader: Box<dyn RobotLoader>) -> Self {
        let main_file = options.global().main_file.clone();
        Self {
            options,
            main_file,
            loader,
            robot_class: OnceCell::new(),
        }
    }

    pub const fn options(&self) -> &ParsedOptions {
        &self.options
    }

    pub fn main_file(&self) -> &Path {
        &self.main_file
    }

    pub fn project_path(&self) -> &Path {
        self.main_file.parent().unwrap_or_else(|| Path::new("."))
    }

    /// The user's robot class, loaded on first request.
    ///
    /// A failed load is not cached; the launcher treats it as fatal anyway.
    pub fn robot_class(&self) -> Result<&RobotClass, LoadError> {
        if let Some(class) = self.robot_class.get() {
            return Ok(class);
        }
        tracing::debug!(main_file = %self.main_file.display(), "loading robot class");
        let class = self.loader.load(&self.main_file)?;
        Ok(self.robot_class.get_or_init(|| class))
    }
}
