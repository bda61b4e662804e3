use colored::Colorize;
use std::io::{self, Write};

use crate::domain::dispatcher::Outcome;

fn ruler() -> String {
    "-".repeat(50)
}

/// Writes the operator-facing summary of a finished operation.
pub fn write_outcome<W: Write>(out: &mut W, outcome: &Outcome) -> io::Result<()> {
    match outcome {
        Outcome::Created { stack } => {
            writeln!(out, "\n{} Stack {} has successfully been created.", "✓".green().bold(), stack.name.to_string().bold())?;
            writeln!(out, "{}", ruler())?;
            for address in stack.addresses() {
                writeln!(out, "{}", address)?;
            }
            writeln!(out, "{}", ruler())?;
        }
        Outcome::Deployed { cluster, version_report, nodes_report } => {
            writeln!(out, "{} Cluster {} has successfully deployed.", "✓".green().bold(), cluster.name().to_string().bold())?;
            writeln!(out, "{}", ruler())?;
            writeln!(out, "{}", version_report.trim_end())?;
            writeln!(out, "Nodes:")?;
            writeln!(out, "{}", nodes_report.trim_end())?;
            writeln!(out, "{}", ruler())?;
        }
        Outcome::Deleted { name } => {
            writeln!(out, "\n{} Cluster {} has been successfully deleted.", "✓".green().bold(), name.bold())?;
        }
        Outcome::Cancelled { name } => {
            writeln!(out, "{} Canceling operation, cluster {} was not deleted.", "✗".yellow().bold(), name)?;
        }
    }
    Ok(())
}

pub fn print_outcome(outcome: &Outcome) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_outcome(&mut lock, outcome)?;
    lock.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backend::{Cluster, Instance, Stack};
    use crate::domain::id::{NodeName, StackName};
    use crate::domain::node_role::NodeRole;

    fn render(outcome: &Outcome) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_outcome(&mut out, outcome).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn stack() -> Stack {
        Stack {
            name: StackName::new("bob-bob-030524-140709"),
            instances: vec![
                Instance { name: NodeName::new("master-1"), role: NodeRole::Master, address: "master-1.pool.local".to_string() },
                Instance { name: NodeName::new("compute-1"), role: NodeRole::Compute, address: "compute-1.pool.local".to_string() },
            ],
        }
    }

    #[test]
    fn test_created_lists_addresses_between_rulers() {
        let text = render(&Outcome::Created { stack: stack() });
        let lines: Vec<&str> = text.lines().collect();

        assert!(text.contains("Stack bob-bob-030524-140709 has successfully been created."));
        let first_ruler = lines.iter().position(|line| *line == ruler()).unwrap();
        assert_eq!(lines[first_ruler + 1], "master-1.pool.local");
        assert_eq!(lines[first_ruler + 2], "compute-1.pool.local");
        assert_eq!(lines[first_ruler + 3], ruler());
    }

    #[test]
    fn test_deployed_shows_both_reports() {
        let outcome = Outcome::Deployed {
            cluster: Cluster { stack: stack(), version: Some("4.12".to_string()) },
            version_report: "platform 4.12\n".to_string(),
            nodes_report: "master-1 master\n".to_string(),
        };
        let text = render(&outcome);

        assert!(text.contains("has successfully deployed."));
        assert!(text.contains("platform 4.12\nNodes:\nmaster-1 master\n"));
    }

    #[test]
    fn test_delete_messages() {
        assert!(render(&Outcome::Deleted { name: "c1".to_string() }).contains("Cluster c1 has been successfully deleted."));
        assert!(render(&Outcome::Cancelled { name: "c1".to_string() }).contains("Canceling operation"));
    }
}
