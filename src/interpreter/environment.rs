//! Environment
//!
//! Mutable session state owned by a single shell: current directory,
//! exported environment, shell variables, function table, and the scope
//! stack used to give function calls their own view of the variables.
//!
//! Lookup order for `$name`: shell variables, then the exported environment.

use indexmap::IndexMap;

pub const DEFAULT_HOME: &str = "/home/user";

#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub cwd: String,
    /// Exported variables, visible to commands
    pub env: IndexMap<String, String>,
    /// Shell-local variables
    pub variables: IndexMap<String, String>,
    /// Function name → unparsed body text
    pub functions: IndexMap<String, String>,
    /// Exit code of the most recent statement, for `$?`
    pub last_exit_code: i32,
    /// Snapshots taken on function entry
    scopes: Vec<IndexMap<String, String>>,
}

impl Environment {
    /// Empty environment rooted at `/`
    pub fn new() -> Self {
        Self {
            cwd: "/".to_string(),
            ..Default::default()
        }
    }

    /// Session defaults: `USER`, `HOME`, `PATH` and a home working directory
    pub fn with_defaults() -> Self {
        let mut env = IndexMap::new();
        env.insert("USER".to_string(), "user".to_string());
        env.insert("HOME".to_string(), DEFAULT_HOME.to_string());
        env.insert("PATH".to_string(), "/bin:/usr/bin".to_string());
        Self {
            cwd: DEFAULT_HOME.to_string(),
            env,
            ..Default::default()
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables
            .get(name)
            .or_else(|| self.env.get(name))
            .map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Set an exported variable; a shadowing shell variable is dropped
    pub fn export(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.variables.shift_remove(&name);
        self.env.insert(name, value.into());
    }

    /// Remove a name from both variables and the exported environment
    pub fn unset(&mut self, name: &str) -> bool {
        let in_vars = self.variables.shift_remove(name).is_some();
        let in_env = self.env.shift_remove(name).is_some();
        in_vars || in_env
    }

    pub fn home(&self) -> &str {
        self.get("HOME").unwrap_or("/")
    }

    // =========================================================================
    // FUNCTIONS
    // =========================================================================

    pub fn define_function(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.functions.insert(name.into(), body.into());
    }

    pub fn function(&self, name: &str) -> Option<&str> {
        self.functions.get(name).map(String::as_str)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    // =========================================================================
    // SCOPES
    // =========================================================================

    /// Snapshot the variables before a function call
    pub fn push_scope(&mut self) {
        self.scopes.push(self.variables.clone());
    }

    /// Restore the snapshot taken by the matching `push_scope`
    pub fn pop_scope(&mut self) {
        if let Some(saved) = self.scopes.pop() {
            self.variables = saved;
        }
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bind `$1..$n`, `$#` and `$@`, dropping positional values from an
    /// outer call that this call does not supply
    pub fn bind_positional(&mut self, args: &[String]) {
        self.variables
            .retain(|name, _| !name.chars().all(|c| c.is_ascii_digit()));
        for (i, arg) in args.iter().enumerate() {
            self.variables.insert((i + 1).to_string(), arg.clone());
        }
        self.variables.insert("#".to_string(), args.len().to_string());
        self.variables.insert("@".to_string(), args.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let env = Environment::with_defaults();
        assert_eq!(env.cwd, "/home/user");
        assert_eq!(env.get("USER"), Some("user"));
        assert_eq!(env.home(), "/home/user");
        assert_eq!(env.get("PATH"), Some("/bin:/usr/bin"));
    }

    #[test]
    fn test_variables_shadow_env() {
        let mut env = Environment::with_defaults();
        env.set("USER", "alice");
        assert_eq!(env.get("USER"), Some("alice"));
        env.unset("USER");
        assert_eq!(env.get("USER"), None);
    }

    #[test]
    fn test_export_moves_to_env() {
        let mut env = Environment::new();
        env.set("A", "1");
        env.export("A", "2");
        assert!(env.variables.get("A").is_none());
        assert_eq!(env.env.get("A").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_scope_restores_variables() {
        let mut env = Environment::new();
        env.set("1", "outer");
        env.set("keep", "yes");
        env.push_scope();
        env.bind_positional(&["a".to_string()]);
        env.set("temp", "x");
        assert_eq!(env.get("1"), Some("a"));
        assert_eq!(env.get("#"), Some("1"));
        assert_eq!(env.scope_depth(), 1);
        env.pop_scope();
        assert_eq!(env.get("1"), Some("outer"));
        assert_eq!(env.get("temp"), None);
        assert_eq!(env.get("keep"), Some("yes"));
        assert_eq!(env.scope_depth(), 0);
    }

    #[test]
    fn test_bind_positional_clears_stale_arguments() {
        let mut env = Environment::new();
        env.bind_positional(&["a".to_string(), "b".to_string(), "c".to_string()]);
        env.bind_positional(&["z".to_string()]);
        assert_eq!(env.get("1"), Some("z"));
        assert_eq!(env.get("3"), None);
        assert_eq!(env.get("@"), Some("z"));
    }

    #[test]
    fn test_functions() {
        let mut env = Environment::new();
        env.define_function("greet", "echo hi");
        assert!(env.has_function("greet"));
        assert_eq!(env.function("greet"), Some("echo hi"));
    }
}
