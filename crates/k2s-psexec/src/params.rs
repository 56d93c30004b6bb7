//! PowerShell invocation strings

use std::fmt;
use std::path::Path;

/// Quote a value for a single-quoted PowerShell string
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Call-operator invocation of a script file: `& '<path>'`
pub fn format_script_path(path: &Path) -> String {
    format!("& {}", quote(&path.to_string_lossy()))
}

/// A rendered script parameter
#[derive(Debug, Clone, PartialEq)]
enum Param {
    Switch(String),
    Bool(String, bool),
    Raw(String, String),
    Quoted(String, String),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Switch(name) => write!(f, "-{}", name),
            Param::Bool(name, true) => write!(f, "-{}:$true", name),
            Param::Bool(name, false) => write!(f, "-{}:$false", name),
            Param::Raw(name, value) => write!(f, "-{} {}", name, value),
            Param::Quoted(name, value) => write!(f, "-{} {}", name, quote(value)),
        }
    }
}

/// Script parameters in call order
///
/// ```
/// use k2s_psexec::ScriptParams;
///
/// let params = ScriptParams::new()
///     .string("Proxy", "http://proxy:8080")
///     .number("Replicas", 3)
///     .boolean("Dashboard", true)
///     .switch("ShowLogs");
/// assert_eq!(
///     params.to_string(),
///     "-Proxy 'http://proxy:8080' -Replicas 3 -Dashboard:$true -ShowLogs"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptParams {
    params: Vec<Param>,
}

impl ScriptParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameter without value
    pub fn switch(mut self, name: &str) -> Self {
        self.params.push(Param::Switch(name.to_string()));
        self
    }

    /// Switch added only when `enabled`
    pub fn switch_if(self, name: &str, enabled: bool) -> Self {
        if enabled {
            self.switch(name)
        } else {
            self
        }
    }

    /// Boolean parameter, rendered as `-Name:$true` / `-Name:$false`
    pub fn boolean(mut self, name: &str, value: bool) -> Self {
        self.params.push(Param::Bool(name.to_string(), value));
        self
    }

    /// Numeric parameter, rendered verbatim
    pub fn number(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.params
            .push(Param::Raw(name.to_string(), value.to_string()));
        self
    }

    /// Quoted string parameter; empty values are skipped
    pub fn string(mut self, name: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.params
                .push(Param::Quoted(name.to_string(), value.to_string()));
        }
        self
    }

    /// Quoted string parameter when a value is present
    pub fn optional(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.string(name, value),
            None => self,
        }
    }

    /// String array parameter, rendered as `-Name 'a','b'`; empty lists are skipped
    pub fn list<S: AsRef<str>>(mut self, name: &str, values: &[S]) -> Self {
        if !values.is_empty() {
            let rendered: Vec<String> = values.iter().map(|v| quote(v.as_ref())).collect();
            self.params
                .push(Param::Raw(name.to_string(), rendered.join(",")));
        }
        self
    }

    /// Append all parameters of `other`
    pub fn extend(mut self, other: ScriptParams) -> Self {
        self.params.extend(other.params);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Display for ScriptParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", param)?;
        }
        Ok(())
    }
}
