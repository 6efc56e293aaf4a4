use std::fmt;

/// Audit notification emitted after an admin operation completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditEvent {
    pub executor_email: String,
    pub target_email: String,
    pub action: AuditAction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuditAction {
    Banned,
    Unbanned,
    HistoryRequested,
    Promoted,
    Fired,
}

impl AuditEvent {
    pub fn new(
        action: AuditAction,
        executor_email: impl Into<String>,
        target_email: impl Into<String>,
    ) -> Self {
        Self {
            executor_email: executor_email.into(),
            target_email: target_email.into(),
            action,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let executor = &self.executor_email;
        let target = &self.target_email;
        match self.action {
            AuditAction::Banned => write!(f, "admin {executor} banned user {target}"),
            AuditAction::Unbanned => write!(f, "admin {executor} unbanned user {target}"),
            AuditAction::HistoryRequested => {
                write!(f, "admin {executor} requested for ban history of user {target}")
            }
            AuditAction::Promoted => write!(f, "admin {executor} promoted user {target}"),
            AuditAction::Fired => write!(f, "admin {executor} fired admin {target}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AuditAction::Banned, "admin root@x.com banned user a@x.com")]
    #[case(AuditAction::Unbanned, "admin root@x.com unbanned user a@x.com")]
    #[case(
        AuditAction::HistoryRequested,
        "admin root@x.com requested for ban history of user a@x.com"
    )]
    #[case(AuditAction::Promoted, "admin root@x.com promoted user a@x.com")]
    #[case(AuditAction::Fired, "admin root@x.com fired admin a@x.com")]
    fn audit_lines(#[case] action: AuditAction, #[case] expected: &str) {
        let event = AuditEvent::new(action, "root@x.com", "a@x.com");
        assert_eq!(event.to_string(), expected);
        assert_eq!(event.into_bytes(), expected.as_bytes());
    }
}
