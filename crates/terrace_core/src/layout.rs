//! Where each scope lives in the generated repository.

use std::path::PathBuf;

/// Directory holding every generated terraform root.
pub const ROOT_DIR: &str = "terraform";

pub fn global_dir() -> PathBuf {
    PathBuf::from(ROOT_DIR).join("global")
}

pub fn account_dir(name: &str) -> PathBuf {
    PathBuf::from(ROOT_DIR).join("accounts").join(name)
}

pub fn env_dir(env: &str) -> PathBuf {
    PathBuf::from(ROOT_DIR).join("envs").join(env)
}

pub fn component_dir(env: &str, component: &str) -> PathBuf {
    env_dir(env).join(component)
}

pub fn module_dir(name: &str) -> PathBuf {
    PathBuf::from(ROOT_DIR).join("modules").join(name)
}
