use std::collections::HashSet;

use crate::cli::CliArgs;
use crate::model::SocketEntry;
use crate::report::{port_labels, PortLabel};

const HEADER: [&str; 7] = [
    "PORT",
    "PROTO",
    "LOCAL ADDRESS",
    "FOREIGN ADDRESS",
    "STATE",
    "USER",
    "PID/PROGRAM",
];

/// Placeholder for anything that could not be resolved.
const UNRESOLVED: &str = "-";

/// Formats socket entries as an aligned table or a bare PID list.
pub struct OutputFormatter {
    /// `-l` flag: list UID numbers instead of login names.
    pub list_uid: bool,
    /// `-t` flag: terse output (PIDs only).
    pub terse: bool,
}

impl OutputFormatter {
    pub fn from_cli(args: &CliArgs) -> Self {
        OutputFormatter {
            list_uid: args.list_uid,
            terse: args.terse,
        }
    }

    pub fn render(&self, entries: &[SocketEntry]) -> Vec<String> {
        if self.terse {
            self.render_terse(entries)
        } else {
            self.render_table(entries)
        }
    }

    /// Unique resolved PIDs in output order.
    fn render_terse(&self, entries: &[SocketEntry]) -> Vec<String> {
        let mut seen = HashSet::new();
        entries
            .iter()
            .filter_map(|e| e.pid())
            .filter(|pid| seen.insert(*pid))
            .map(|pid| pid.to_string())
            .collect()
    }

    fn render_table(&self, entries: &[SocketEntry]) -> Vec<String> {
        let mut rows: Vec<[String; 7]> = Vec::with_capacity(entries.len() + 1);
        rows.push(HEADER.map(String::from));

        for (entry, label) in entries.iter().zip(port_labels(entries)) {
            rows.push([
                format_label(label),
                entry.record.protocol.to_string(),
                entry.record.local(),
                entry.record.remote(),
                entry.record.state.to_string(),
                self.user_column(entry),
                entry
                    .owner
                    .as_ref()
                    .map(|o| o.to_string())
                    .unwrap_or_else(|| UNRESOLVED.to_string()),
            ]);
        }

        let mut widths = [0usize; 7];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        rows.iter().map(|row| format_row(row, &widths)).collect()
    }

    fn user_column(&self, entry: &SocketEntry) -> String {
        if self.list_uid {
            return entry.record.uid.to_string();
        }
        entry
            .user
            .clone()
            .unwrap_or_else(|| UNRESOLVED.to_string())
    }

    pub fn print(&self, entries: &[SocketEntry]) {
        for line in self.render(entries) {
            println!("{}", line);
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn format_label(label: PortLabel) -> String {
    match label {
        PortLabel::Number(port) => port.to_string(),
        PortLabel::More => "├─".to_string(),
        PortLabel::Last => "└─".to_string(),
    }
}

/// Pad each cell to its column width; the last column is left ragged.
fn format_row(row: &[String; 7], widths: &[usize; 7]) -> String {
    let mut line = String::new();
    for (i, (cell, width)) in row.iter().zip(widths.iter()).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        if i + 1 < row.len() {
            let pad = width.saturating_sub(cell.chars().count());
            line.extend(std::iter::repeat(' ').take(pad));
        }
    }
    line
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Protocol, ProcessIdentity};
    use crate::report::tests::entry;

    fn table() -> OutputFormatter {
        OutputFormatter {
            list_uid: false,
            terse: false,
        }
    }

    fn port_column(line: &str) -> &str {
        line.split_whitespace().next().unwrap_or("")
    }

    #[test]
    fn test_header_columns() {
        let lines = table().render(&[]);
        assert_eq!(lines.len(), 1);
        for column in HEADER {
            assert!(lines[0].contains(column), "missing {column}");
        }
    }

    #[test]
    fn test_row_contents() {
        let mut ssh = entry(22, Protocol::Tcp, Some(1), 12345);
        ssh.owner = Some(ProcessIdentity::new(1, "sshd"));
        let lines = table().render(&[ssh]);
        let cells: Vec<&str> = lines[1].split_whitespace().collect();
        assert_eq!(
            cells,
            vec!["22", "tcp", "0.0.0.0:22", "0.0.0.0:0", "LISTEN", "root", "1/sshd"]
        );
    }

    #[test]
    fn test_unresolved_placeholders() {
        let mut orphan = entry(53, Protocol::Udp, None, 9);
        orphan.user = None;
        let lines = table().render(&[orphan]);
        let cells: Vec<&str> = lines[1].split_whitespace().collect();
        assert_eq!(cells[5], "-");
        assert_eq!(cells[6], "-");
    }

    #[test]
    fn test_list_uid() {
        let fmt = OutputFormatter {
            list_uid: true,
            terse: false,
        };
        let lines = fmt.render(&[entry(22, Protocol::Tcp, Some(1), 1)]);
        let cells: Vec<&str> = lines[1].split_whitespace().collect();
        assert_eq!(cells[5], "0");
    }

    #[test]
    fn test_repeated_ports_use_tree_markers() {
        let entries = vec![
            entry(80, Protocol::Tcp, Some(2), 1),
            entry(80, Protocol::Tcp6, Some(2), 2),
            entry(80, Protocol::Tcp, Some(3), 3),
            entry(443, Protocol::Tcp, Some(4), 4),
        ];
        let lines = table().render(&entries);
        let ports: Vec<&str> = lines[1..].iter().map(|l| port_column(l)).collect();
        assert_eq!(ports, vec!["80", "├─", "└─", "443"]);
        assert_eq!(ports.iter().filter(|p| **p == "80").count(), 1);
    }

    #[test]
    fn test_columns_are_aligned() {
        let entries = vec![
            entry(22, Protocol::Tcp, Some(1), 1),
            entry(65000, Protocol::Udp6, Some(100000), 2),
        ];
        let lines = table().render(&entries);
        let state_col = lines[0].find("STATE").unwrap();
        assert_eq!(&lines[1][state_col..state_col + 6], "LISTEN");
        assert_eq!(&lines[2][state_col..state_col + 6], "LISTEN");
    }

    #[test]
    fn test_terse_unique_pids() {
        let fmt = OutputFormatter {
            list_uid: false,
            terse: true,
        };
        let entries = vec![
            entry(22, Protocol::Tcp, Some(1), 1),
            entry(22, Protocol::Tcp6, Some(1), 2),
            entry(53, Protocol::Udp, None, 3),
            entry(80, Protocol::Tcp, Some(7), 4),
        ];
        assert_eq!(fmt.render(&entries), vec!["1", "7"]);
    }
}
