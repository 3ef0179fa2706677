use stackkit::domain::entities::StateBackup;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, SemanticColor};

/// Backups newest first; the first `retention` are marked as kept
pub fn render_backups(
    stack: &str,
    backups: &[StateBackup],
    retention: usize,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    if backups.is_empty() {
        return format!("No state backups for stack '{}'\n", stack);
    }

    let mut out = format!(
        "{} {} backup(s) for {}\n",
        Icon::Backup.colored(supports_color, supports_unicode),
        backups.len(),
        stack
    );
    for (i, backup) in backups.iter().enumerate() {
        let marker = if i == 0 {
            paint("latest", SemanticColor::Success, supports_color)
        } else if i >= retention {
            paint("prunable", SemanticColor::Dim, supports_color)
        } else {
            String::new()
        };
        let line = format!(
            "  {}  {}  {}",
            backup.taken_at().format("%Y-%m-%d %H:%M:%S"),
            backup.key(),
            marker
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stackkit::domain::value_objects::StackName;

    #[test]
    fn marks_latest_and_prunable() {
        let stack = StackName::new("orders").unwrap();
        let backups: Vec<StateBackup> = [3, 2, 1]
            .iter()
            .map(|h| StateBackup::for_stack(&stack, Utc.with_ymd_and_hms(2026, 3, 1, *h, 0, 0).unwrap()))
            .collect();

        insta::assert_snapshot!(render_backups("orders", &backups, 2, false, false), @r"
        [BACKUP] 3 backup(s) for orders
          2026-03-01 03:00:00  backups/orders/terraform.tfstate.20260301-030000  latest
          2026-03-01 02:00:00  backups/orders/terraform.tfstate.20260301-020000
          2026-03-01 01:00:00  backups/orders/terraform.tfstate.20260301-010000  prunable
        ");
    }

    #[test]
    fn no_backups_message() {
        assert_eq!(
            render_backups("orders", &[], 5, false, false),
            "No state backups for stack 'orders'\n"
        );
    }
}
