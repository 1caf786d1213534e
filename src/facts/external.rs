// Jetpack
// Copyright (C) 2023 - Michael DeHaan <michael@michaeldehaan.net> + contributors
// Copyright (C) 2025 - Riff.CC <https://riff.cc>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// long with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Runs a facts module as a child process.
//!
//! The request goes to the module's stdin as one JSON document and the
//! module answers with a JSON document on stdout, either a facts result or
//! `{"failed": true, "msg": "..."}`.

use crate::error::{NetfactsError, Result};
use crate::facts::gatherer::FactsGatherer;
use crate::facts::result::{FactsRequest, FactsResult};
use crate::util::io::is_executable;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

pub struct ExternalModule {
    command_line: String,
    program: String,
    args: Vec<String>,
}

impl ExternalModule {

    pub fn new(command_line: &str) -> Result<Self> {
        let mut parts = shlex::split(command_line).ok_or_else(|| {
            NetfactsError::Config(format!("cannot parse module command line: {}", command_line))
        })?;
        if parts.is_empty() {
            return Err(NetfactsError::Config(String::from("module command line is empty")));
        }
        let program = parts.remove(0);
        if program.contains('/') && !is_executable(Path::new(&program)) {
            return Err(NetfactsError::Config(format!("module is not an executable file: {}", program)));
        }
        Ok(Self {
            command_line: command_line.to_string(),
            program,
            args: parts,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl FactsGatherer for ExternalModule {

    fn name(&self) -> String {
        self.command_line.clone()
    }

    fn gather(&self, request: &FactsRequest) -> Result<FactsResult> {
        let payload = serde_json::to_string(request)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| NetfactsError::Module(format!("failed to start {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(payload.as_bytes()) {
                // the module is free to ignore its input and exit early
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {},
                Err(e) => return Err(e.into()),
                Ok(_) => {},
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = match output.status.code() {
                Some(rc) => rc.to_string(),
                None => String::from("signal"),
            };
            return Err(NetfactsError::Module(format!(
                "{} exited with {}: {}", self.command_line, code, stderr.trim()
            )));
        }

        parse_module_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Finds the first JSON document in `stdout`, skipping anything printed before it.
pub fn parse_module_output(stdout: &str) -> Result<FactsResult> {
    let start = stdout.find('{').ok_or_else(|| {
        NetfactsError::Module(String::from("module produced no JSON output"))
    })?;

    let body: serde_json::Value = match serde_json::Deserializer::from_str(&stdout[start..])
        .into_iter::<serde_json::Value>()
        .next()
    {
        Some(Ok(x)) => x,
        Some(Err(e)) => return Err(NetfactsError::Module(format!("unparsable module output: {}", e))),
        None => return Err(NetfactsError::Module(String::from("module produced no JSON output"))),
    };

    if body.get("failed").and_then(|x| x.as_bool()).unwrap_or(false) {
        let msg = body.get("msg").and_then(|x| x.as_str()).unwrap_or("module reported failure");
        return Err(NetfactsError::Module(msg.to_string()));
    }

    serde_json::from_value(body)
        .map_err(|e| NetfactsError::Module(format!("unexpected module result: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command_line() {
        let module = ExternalModule::new("ios_facts --platform 'cisco ios'").unwrap();
        assert_eq!(module.program(), "ios_facts");
        assert_eq!(module.args(), &[String::from("--platform"), String::from("cisco ios")]);
    }

    #[test]
    fn test_rejects_empty_and_unbalanced() {
        assert!(matches!(ExternalModule::new("   "), Err(NetfactsError::Config(_))));
        assert!(matches!(ExternalModule::new("facts 'oops"), Err(NetfactsError::Config(_))));
    }

    #[test]
    fn test_rejects_missing_path() {
        let err = ExternalModule::new("/non/existent/facts_module").err().unwrap();
        assert!(err.to_string().contains("not an executable"));
    }

    #[test]
    fn test_parse_skips_noise() {
        let out = "Warning: platform detection is deprecated\n{\"changed\": false, \"ansible_facts\": {\"ansible_net_gather_subset\": [\"config\"]}}\ntrailing\n";
        let result = parse_module_output(out).unwrap();
        assert_eq!(result.gathered_subsets(), vec!["config"]);
    }

    #[test]
    fn test_parse_failed_body() {
        let err = parse_module_output("{\"failed\": true, \"msg\": \"unable to open shell\"}").unwrap_err();
        assert_eq!(err.to_string(), "Module error: unable to open shell");
    }

    #[test]
    fn test_parse_no_json() {
        assert!(matches!(parse_module_output("nothing here"), Err(NetfactsError::Module(_))));
        assert!(matches!(parse_module_output("{not json"), Err(NetfactsError::Module(_))));
    }
}
