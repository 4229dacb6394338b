//! Declarative DOM mutations.
//!
//! The core never touches the page directly: components emit
//! [`DomCommand`] values and a [`DomSink`] executes them. The `gui` host
//! compiles commands to JavaScript for the webview; tests use a recording
//! sink instead.

use std::fmt::Write as _;

/// One DOM mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomCommand {
    /// Inserts a `<style>` node with the given id into the document head,
    /// unless one with that id already exists.
    EnsureStyle { id: String, css: String },
    /// Appends markup to the document body.
    Append { html: String },
    /// Replaces an element's inline style.
    SetStyle { id: String, css: String },
    /// Replaces an element's inner markup.
    SetHtml { id: String, html: String },
    Show { id: String },
    Hide { id: String },
    /// Removes an element. A no-op when the element does not exist.
    Remove { id: String },
    /// Removes an element after a delay (toast auto-dismiss).
    RemoveAfter { id: String, delay_ms: u64 },
}

/// Executes DOM commands against the host surface.
pub trait DomSink: Send + Sync {
    fn apply(&self, commands: &[DomCommand]);
}

/// Escapes text for safe interpolation into markup.
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// JavaScript string literal for arbitrary text (quotes included).
fn js_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

/// Compiles one command to a JavaScript statement.
pub fn command_to_script(command: &DomCommand) -> String {
    match command {
        DomCommand::EnsureStyle { id, css } => format!(
            "if(!document.getElementById({id})){{var s=document.createElement('style');s.id={id};s.textContent={css};document.head.appendChild(s);}}",
            id = js_string(id),
            css = js_string(css),
        ),
        DomCommand::Append { html } => format!(
            "document.body.insertAdjacentHTML('beforeend',{});",
            js_string(html)
        ),
        DomCommand::SetStyle { id, css } => format!(
            "(function(){{var e=document.getElementById({});if(e)e.style.cssText={};}})();",
            js_string(id),
            js_string(css)
        ),
        DomCommand::SetHtml { id, html } => format!(
            "(function(){{var e=document.getElementById({});if(e)e.innerHTML={};}})();",
            js_string(id),
            js_string(html)
        ),
        DomCommand::Show { id } => format!(
            "(function(){{var e=document.getElementById({});if(e)e.style.display='block';}})();",
            js_string(id)
        ),
        DomCommand::Hide { id } => format!(
            "(function(){{var e=document.getElementById({});if(e)e.style.display='none';}})();",
            js_string(id)
        ),
        DomCommand::Remove { id } => format!(
            "(function(){{var e=document.getElementById({});if(e&&e.parentNode)e.parentNode.removeChild(e);}})();",
            js_string(id)
        ),
        DomCommand::RemoveAfter { id, delay_ms } => format!(
            "setTimeout(function(){{var e=document.getElementById({});if(e&&e.parentNode)e.parentNode.removeChild(e);}},{});",
            js_string(id),
            delay_ms
        ),
    }
}

/// Compiles a command batch into one script.
pub fn commands_to_script(commands: &[DomCommand]) -> String {
    let mut script = String::new();
    for command in commands {
        let _ = writeln!(script, "{}", command_to_script(command));
    }
    script
}
