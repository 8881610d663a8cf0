//! SSH command rendering shared by the rsync transport

use std::process::{Command, Output, Stdio};

use crate::domain::value_objects::{Endpoint, Platform};
use crate::error::TransportError;

/// Options passed to every ssh invocation
fn ssh_options(endpoint: &Endpoint) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(key) = endpoint.private_key_path() {
        args.push("-i".to_string());
        args.push(key.display().to_string());
    }
    args.push("-o".to_string());
    args.push("StrictHostKeyChecking=no".to_string());
    args.push("-p".to_string());
    args.push(endpoint.ssh_port().to_string());
    args
}

/// Remote shell spec for `rsync -e`, e.g. `ssh -i key -o ... -p 22`
pub fn remote_shell(endpoint: &Endpoint) -> String {
    let mut parts = vec!["ssh".to_string()];
    parts.extend(ssh_options(endpoint).into_iter().map(|arg| {
        if arg.contains(' ') {
            shell_quote(&arg)
        } else {
            arg
        }
    }));
    parts.join(" ")
}

/// Arguments for `ssh` running `command` on `endpoint`
pub fn exec_args(endpoint: &Endpoint, command: &str) -> Vec<String> {
    let mut args = ssh_options(endpoint);
    args.push(endpoint.login());
    args.push(command.to_string());
    args
}

/// Quote a string for a POSIX shell
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Command removing the directory `path` on a `platform` host, succeeding
/// when it is already gone.
///
/// Windows OpenSSH hands commands to `cmd.exe`, which has no `rm` and no
/// single-quote quoting.
pub fn remove_dir_command(platform: Platform, path: &str) -> String {
    match platform {
        Platform::Windows => {
            let quoted = format!("\"{}\"", path.replace('/', "\\"));
            format!("if exist {quoted} rmdir /s /q {quoted}")
        }
        Platform::MacOs | Platform::Linux => format!("rm -rf {}", shell_quote(path)),
    }
}

/// Run `program` to completion, mapping failures to `TransportError`
pub fn run(program: &str, args: &[String], target: &str) -> Result<Output, TransportError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| TransportError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(TransportError::CommandFailed {
            program: program.to_string(),
            target: target.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}
