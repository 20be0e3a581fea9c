//! `using`'s filesystem half: path resolution, load-stack cycle detection,
//! and building a loaded module's public table.
//!
//! Grounded on `evaluator.go`'s `getModule`/`getModPath`/`publicToTable`,
//! with one supplement this session added beyond the reference
//! implementation: `getModule` never detects a `using` cycle at all, so a
//! module that (transitively) uses itself recurses until the Go process's
//! stack overflows. Here a `load_stack` of canonicalized paths turns that
//! into an ordinary [`crate::error::EvalError::ModuleCycle`].

use std::path::PathBuf;
use zygon_util::{Span, Symbol};

use crate::env::EnvId;
use crate::error::{EvalError, EvalResult};
use crate::interpreter::Evaluator;
use crate::value::{Entries, Value};

/// `["pkg", "sub"]` -> `pkg/sub.zygon`: every leading segment is a
/// directory, the last gains the `.zygon` extension.
pub fn mod_path(path: &[Symbol]) -> PathBuf {
    let mut out = PathBuf::new();
    for (i, segment) in path.iter().enumerate() {
        if i + 1 == path.len() {
            out.push(format!("{segment}.zygon"));
        } else {
            out.push(segment.to_string());
        }
    }
    out
}

impl Evaluator {
    /// Resolves `path` against `project_root` then `lib_root`, executes the
    /// file in a fresh isolated frame (a module never inherits the
    /// importer's bindings), and returns its public table together with
    /// that frame's id (so the caller can still pull individual
    /// `"pub <name>"` bindings for an explicit `.(a, b)` symbol list).
    pub(crate) fn load_module(
        &mut self,
        path: &[Symbol],
        span: Span,
    ) -> EvalResult<(Value, EnvId)> {
        let relative = mod_path(path);
        let file_path = [&self.project_root, &self.lib_root]
            .into_iter()
            .map(|root| root.join(&relative))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| EvalError::ModuleNotFound {
                name: path.iter().map(Symbol::to_string).collect::<Vec<_>>().join("."),
                project_root: self.project_root.display().to_string(),
                lib_root: self.lib_root.display().to_string(),
                span,
            })?;

        let canonical = file_path
            .canonicalize()
            .unwrap_or_else(|_| file_path.clone());
        if self.load_stack.contains(&canonical) {
            return Err(EvalError::ModuleCycle {
                path: canonical.display().to_string(),
                span,
            });
        }

        let source = std::fs::read_to_string(&file_path)
            .map_err(|e| EvalError::Io(format!("{}: {e}", file_path.display())))?;

        self.load_stack.push(canonical);
        let module_env = self.env.new_isolated_root();
        let result = self.exec_source(&source, module_env);
        self.load_stack.pop();
        result?;

        Ok((self.public_to_table(module_env), module_env))
    }

    fn public_to_table(&self, env: EnvId) -> Value {
        let mut entries = Entries::new();
        for (name, value) in self.env.local_bindings(env) {
            if let Some(bare) = name.as_str().strip_prefix("pub ") {
                entries.insert(Value::TableKey(Symbol::intern(bare)), value.clone());
            }
        }
        Value::new_table(entries)
    }
}
