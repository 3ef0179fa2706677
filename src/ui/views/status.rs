use unicode_width::UnicodeWidthStr;

use stackkit::domain::entities::DeploymentStateEvent;

use crate::ui::primitives::text::{bold, paint, SemanticColor};

const HEADERS: [&str; 6] = ["TIMESTAMP", "STATE", "DEPLOYMENT", "USER", "HOST", "COMMIT"];

/// Table of state events, in the order given (newest first)
pub fn render_status(stack: &str, events: &[DeploymentStateEvent], supports_color: bool) -> String {
    if events.is_empty() {
        return format!("No deployment events recorded for stack '{}'\n", stack);
    }

    let rows: Vec<[String; 6]> = events
        .iter()
        .map(|e| {
            [
                e.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                e.state.to_string(),
                e.deployment_id.clone(),
                e.user.clone(),
                e.host.clone(),
                short_commit(&e.git_commit).to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.width());
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let mut out = String::new();
    out.push_str(&bold(&format!("Deployments of {}", stack), supports_color));
    out.push('\n');
    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    out.push_str(&join_row(&header, &widths));
    out.push('\n');

    for (row, event) in rows.iter().zip(events) {
        let mut cells = row.to_vec();
        // Pad before painting so escape codes do not skew the columns
        cells[1] = paint(
            &pad(&cells[1], widths[1]),
            SemanticColor::for_state(event.state),
            supports_color,
        );
        out.push_str(&join_row(&cells, &widths));
        out.push('\n');
    }
    out
}

fn join_row(cells: &[String], widths: &[usize; 6]) -> String {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            if i == cells.len() - 1 {
                cell.clone()
            } else {
                pad(cell, widths[i])
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.width());
    format!("{}{}", cell, " ".repeat(fill))
}

fn short_commit(commit: &str) -> &str {
    commit.get(..8).unwrap_or(commit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use stackkit::domain::entities::DeploymentState;
    use stackkit::domain::value_objects::{ActorIdentity, DeploymentContext, StackName};

    fn event(state: DeploymentState, minute: u32) -> DeploymentStateEvent {
        DeploymentStateEvent::new(
            "orders-20260301-120000",
            &StackName::new("orders").unwrap(),
            state,
            &DeploymentContext::new(
                ActorIdentity::new("alice", "host1"),
                "9f2c4e1ab3d45566778899aabbccddeeff001122",
            ),
            Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap(),
            Duration::days(30),
        )
    }

    #[test]
    fn renders_table_without_color() {
        let events = vec![
            event(DeploymentState::Completed, 2),
            event(DeploymentState::Applying, 1),
        ];

        insta::assert_snapshot!(render_status("orders", &events, false), @r"
        Deployments of orders
        TIMESTAMP            STATE      DEPLOYMENT              USER   HOST   COMMIT
        2026-03-01 12:02:00  completed  orders-20260301-120000  alice  host1  9f2c4e1a
        2026-03-01 12:01:00  applying   orders-20260301-120000  alice  host1  9f2c4e1a
        ");
    }

    #[test]
    fn empty_history_is_reported() {
        assert_eq!(
            render_status("orders", &[], false),
            "No deployment events recorded for stack 'orders'\n"
        );
    }

    #[test]
    fn short_commit_tolerates_unknown() {
        assert_eq!(short_commit("unknown"), "unknown");
    }
}
