//! The template trees shipped with the binary, and loading of user overrides.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{TemplateError, TemplateResult};
use crate::tree::TemplateTree;

macro_rules! bundled {
    ($tree:literal: $($file:literal),+ $(,)?) => {
        TemplateTree::from_entries([
            $(($file, &include_bytes!(concat!("../templates/", $tree, "/", $file))[..]),)+
        ])
    };
}

/// Sub-directory names of a template directory, one per tree.
pub const REPO_DIR: &str = "repo";
pub const GLOBAL_DIR: &str = "global";
pub const ACCOUNT_DIR: &str = "account";
pub const ENV_DIR: &str = "env";
pub const COMPONENT_DIR: &str = "component";
pub const MODULE_DIR: &str = "module";
pub const MODULE_INVOCATION_DIR: &str = "module-invocation";

/// Every tree the scaffolder applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    pub repo: TemplateTree,
    pub global: TemplateTree,
    pub account: TemplateTree,
    pub env: TemplateTree,
    pub component: TemplateTree,
    pub module: TemplateTree,
    /// Holds `main.tf.tmpl` and `outputs.tf.tmpl`, rendered per invocation.
    pub module_invocation: TemplateTree,
}

impl TemplateSet {
    /// The trees compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            repo: bundled!("repo": ".gitignore", "Makefile.tmpl", "README.md.create"),
            global: bundled!(
                "global": "Makefile.tmpl",
                "README.md.tmpl",
                "main.tf.touch",
                "outputs.tf.touch",
                "terrace.tf.tmpl",
            ),
            account: bundled!(
                "account": "Makefile.tmpl",
                "README.md.tmpl",
                "main.tf.touch",
                "outputs.tf.touch",
                "terrace.tf.tmpl",
            ),
            env: bundled!("env": "Makefile.tmpl"),
            component: bundled!(
                "component": "Makefile.tmpl",
                "README.md.tmpl",
                "main.tf.touch",
                "outputs.tf.touch",
                "terrace.tf.tmpl",
            ),
            module: bundled!(
                "module": "README.md.tmpl",
                "main.tf.touch",
                "outputs.tf.touch",
                "variables.tf.touch",
            ),
            module_invocation: bundled!(
                "module-invocation": "main.tf.tmpl",
                "outputs.tf.tmpl",
            ),
        }
    }

    /// Load trees from `root`, which must exist. Each missing sub-directory
    /// falls back to the corresponding built-in tree.
    pub fn load(root: &Path) -> TemplateResult<Self> {
        if !root.is_dir() {
            return Err(TemplateError::NotFound(root.display().to_string()));
        }

        let builtin = Self::builtin();
        Ok(Self {
            repo: load_tree(root, REPO_DIR, builtin.repo)?,
            global: load_tree(root, GLOBAL_DIR, builtin.global)?,
            account: load_tree(root, ACCOUNT_DIR, builtin.account)?,
            env: load_tree(root, ENV_DIR, builtin.env)?,
            component: load_tree(root, COMPONENT_DIR, builtin.component)?,
            module: load_tree(root, MODULE_DIR, builtin.module)?,
            module_invocation: load_tree(root, MODULE_INVOCATION_DIR, builtin.module_invocation)?,
        })
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn load_tree(root: &Path, name: &str, fallback: TemplateTree) -> TemplateResult<TemplateTree> {
    let dir: PathBuf = root.join(name);
    if dir.is_dir() {
        let tree = TemplateTree::from_dir(&dir)?;
        info!("Loaded {} template(s) for {} from {:?}", tree.len(), name, dir);
        Ok(tree)
    } else {
        debug!("No {} templates in {:?}, using built-in tree", name, root);
        Ok(fallback)
    }
}
