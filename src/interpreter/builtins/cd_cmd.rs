//! cd - Change directory builtin
//!
//! Supports:
//! - cd - change to `$HOME`
//! - cd ~ / cd ~/sub - paths under `$HOME`
//! - cd dir - relative or absolute, checked through the filesystem

use crate::fs::FileSystem;
use crate::interpreter::environment::Environment;
use crate::interpreter::types::ExecResult;

/// Handle the cd builtin command
pub async fn handle_cd(env: &mut Environment, fs: &dyn FileSystem, args: &[String]) -> ExecResult {
    let operands: Vec<&String> = args.iter().filter(|a| a.as_str() != "--").collect();
    if operands.len() > 1 {
        return ExecResult::failure("", "sh: cd: too many arguments");
    }

    let home = env.home().to_string();
    let target = match operands.first().map(|s| s.as_str()) {
        None | Some("~") => home,
        Some(path) => match path.strip_prefix("~/") {
            Some(rest) => format!("{}/{}", home, rest),
            None => path.to_string(),
        },
    };

    let resolved = fs.resolve_path(&env.cwd, &target);
    match fs.stat(&resolved).await {
        Ok(stat) if stat.is_directory => {
            tracing::debug!(from = %env.cwd, to = %resolved, "cd");
            let previous = std::mem::replace(&mut env.cwd, resolved.clone());
            if env.env.contains_key("PWD") {
                env.export("OLDPWD", previous);
                env.export("PWD", resolved);
            }
            ExecResult::empty()
        }
        Ok(_) => ExecResult::failure("", format!("sh: cd: {}: Not a directory", target)),
        Err(_) => ExecResult::failure("", format!("sh: cd: {}: No such file or directory", target)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFs;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_cd_relative_and_home() {
        let fs = InMemoryFs::with_home("/home/user");
        let mut env = Environment::with_defaults();
        env.cwd = "/".to_string();

        assert!(handle_cd(&mut env, &fs, &args(&["tmp"])).await.is_success());
        assert_eq!(env.cwd, "/tmp");
        assert!(handle_cd(&mut env, &fs, &args(&["../usr/bin"])).await.is_success());
        assert_eq!(env.cwd, "/usr/bin");
        assert!(handle_cd(&mut env, &fs, &[]).await.is_success());
        assert_eq!(env.cwd, "/home/user");
    }

    #[tokio::test]
    async fn test_cd_missing_directory() {
        let fs = InMemoryFs::with_home("/home/user");
        let mut env = Environment::with_defaults();
        let result = handle_cd(&mut env, &fs, &args(&["nowhere"])).await;
        assert_eq!(result.status.as_deref(), Some("sh: cd: nowhere: No such file or directory"));
        assert_eq!(env.cwd, "/home/user");
    }

    #[tokio::test]
    async fn test_cd_into_file() {
        let fs = InMemoryFs::with_files(&[("/notes.txt", "x")]);
        let mut env = Environment::new();
        let result = handle_cd(&mut env, &fs, &args(&["/notes.txt"])).await;
        assert_eq!(result.status.as_deref(), Some("sh: cd: /notes.txt: Not a directory"));
    }

    #[tokio::test]
    async fn test_cd_updates_pwd_when_exported() {
        let fs = InMemoryFs::with_home("/home/user");
        let mut env = Environment::with_defaults();
        env.export("PWD", "/home/user");
        handle_cd(&mut env, &fs, &args(&["/tmp"])).await;
        assert_eq!(env.get("PWD"), Some("/tmp"));
        assert_eq!(env.get("OLDPWD"), Some("/home/user"));
    }
}
