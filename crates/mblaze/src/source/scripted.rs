//! Scripted in-memory line source
//!
//! Replies to invocations from registered scripts instead of spawning
//! processes, and records every call for later inspection. Used by tests
//! and by dry runs against canned tool output.

use std::sync::{Mutex, RwLock};

use super::LineSource;
use crate::error::{Error, Result};

/// A recorded call to the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub input: Vec<String>,
}

impl Invocation {
    /// The program followed by its arguments, for compact assertions
    pub fn command_line(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Lines(Vec<String>),
    Fail { code: Option<i32>, stderr: String },
}

#[derive(Debug, Clone)]
struct Script {
    program: String,
    args: Vec<String>,
    reply: Reply,
}

/// In-memory implementation of LineSource
///
/// Scripts match on the exact program name and argument list. Registering
/// the same command twice replaces the earlier reply.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    scripts: RwLock<Vec<Script>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl ScriptedSource {
    /// Create a source with no scripts
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `program args...` with the given lines
    pub fn reply<L, S>(&self, program: &str, args: &[&str], lines: L)
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines.into_iter().map(Into::into).collect();
        self.register(program, args, Reply::Lines(lines));
    }

    /// Fail `program args...` as if it exited with `code`
    pub fn fail(&self, program: &str, args: &[&str], code: i32, stderr: &str) {
        self.register(
            program,
            args,
            Reply::Fail {
                code: Some(code),
                stderr: stderr.to_string(),
            },
        );
    }

    fn register(&self, program: &str, args: &[&str], reply: Reply) {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let mut scripts = self.scripts.write().unwrap();
        scripts.retain(|s| !(s.program == program && s.args == args));
        scripts.push(Script {
            program: program.to_string(),
            args,
            reply,
        });
    }

    /// All invocations so far, in call order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Number of invocations so far
    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }
}

impl LineSource for ScriptedSource {
    fn run(&self, program: &str, args: &[String], input: &[String]) -> Result<Vec<String>> {
        self.invocations.lock().unwrap().push(Invocation {
            program: program.to_string(),
            args: args.to_vec(),
            input: input.to_vec(),
        });

        let scripts = self.scripts.read().unwrap();
        let script = scripts
            .iter()
            .find(|s| s.program == program && s.args == args);

        match script.map(|s| &s.reply) {
            Some(Reply::Lines(lines)) => Ok(lines.clone()),
            Some(Reply::Fail { code, stderr }) => Err(Error::Process {
                program: program.to_string(),
                code: *code,
                stderr: stderr.clone(),
            }),
            None => Err(Error::Process {
                program: program.to_string(),
                code: None,
                stderr: format!("no script for {} {:?}", program, args),
            }),
        }
    }
}
