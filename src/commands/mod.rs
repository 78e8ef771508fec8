pub mod ask;
pub mod chat;
pub mod render;
pub mod status;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

#[cfg(test)]
mod tests {
    use super::CommandReport;

    #[test]
    fn issues_flip_the_report_to_not_ok() {
        let mut report = CommandReport::new("status");
        report.detail("model=llama");
        assert!(report.ok);
        report.issue("GROQ_API_KEY missing");
        assert!(!report.ok);
        assert_eq!(report.issues, vec!["GROQ_API_KEY missing".to_string()]);
    }
}
