//! Command builder.
//!
//! Every invocation of the display tool is described by a [`RandrCommand`].
//! [`RandrCommand::args`] renders the argument vector *without* the program
//! name, so the same value can be executed by the real backend, printed by the
//! dry-run backend, or compared in tests.
//!
//! # Argument shapes
//!
//! | Command        | Arguments                                                         |
//! |----------------|-------------------------------------------------------------------|
//! | Query          | `--query`                                                         |
//! | Mirror         | `--output T --same-as S --mode M --rate R`                        |
//! | Extend         | `--auto --output T --mode M --rate R --right-of S` (or `--left-of`) |
//! | Reposition     | `--output N --<direction> REF`                                    |
//! | PlaceAtOrigin  | `--output N --pos 0x0`                                            |

use serde::{Deserialize, Serialize};

use crate::domain::monitor::Monitor;
use crate::domain::snap::{Direction, PendingLayout};

/// Which side of the source the extended target goes on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtendSide {
    #[default]
    Right,
    Left,
}

impl ExtendSide {
    /// The placement direction this side maps to.
    pub fn direction(&self) -> Direction {
        match self {
            ExtendSide::Right => Direction::RightOf,
            ExtendSide::Left => Direction::LeftOf,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtendSide::Right => "right",
            ExtendSide::Left => "left",
        }
    }
}

impl std::fmt::Display for ExtendSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExtendSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "right" => Ok(ExtendSide::Right),
            "left" => Ok(ExtendSide::Left),
            other => Err(format!("unknown side: {other} (expected right or left)")),
        }
    }
}

/// One invocation of the display tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RandrCommand {
    /// Read the current state.  The only command whose stdout is consumed.
    Query,
    /// Make `target` show the same picture as `source`.
    Mirror {
        target: String,
        source: String,
        mode: String,
        rate: String,
    },
    /// Turn `target` on next to `source`.
    Extend {
        target: String,
        source: String,
        mode: String,
        rate: String,
        side: ExtendSide,
    },
    /// Place `output` relative to `reference`.
    Reposition {
        output: String,
        direction: Direction,
        reference: String,
    },
    /// Move `output` to the top-left of the X screen.
    PlaceAtOrigin { output: String },
}

impl RandrCommand {
    pub fn mirror(source: &str, target: &str, mode: &str, rate: &str) -> Self {
        RandrCommand::Mirror {
            target: target.to_string(),
            source: source.to_string(),
            mode: mode.to_string(),
            rate: rate.to_string(),
        }
    }

    pub fn extend(source: &str, target: &str, mode: &str, rate: &str, side: ExtendSide) -> Self {
        RandrCommand::Extend {
            target: target.to_string(),
            source: source.to_string(),
            mode: mode.to_string(),
            rate: rate.to_string(),
            side,
        }
    }

    /// Renders the argument vector, excluding the program name.
    pub fn args(&self) -> Vec<String> {
        let owned = |parts: &[&str]| parts.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        match self {
            RandrCommand::Query => owned(&["--query"]),
            RandrCommand::Mirror {
                target,
                source,
                mode,
                rate,
            } => owned(&[
                "--output",
                target.as_str(),
                "--same-as",
                source.as_str(),
                "--mode",
                mode.as_str(),
                "--rate",
                rate.as_str(),
            ]),
            RandrCommand::Extend {
                target,
                source,
                mode,
                rate,
                side,
            } => {
                let mut args = owned(&[
                    "--auto",
                    "--output",
                    target.as_str(),
                    "--mode",
                    mode.as_str(),
                    "--rate",
                    rate.as_str(),
                ]);
                args.push(side.direction().flag());
                args.push(source.clone());
                args
            }
            RandrCommand::Reposition {
                output,
                direction,
                reference,
            } => vec![
                "--output".to_string(),
                output.clone(),
                direction.flag(),
                reference.clone(),
            ],
            RandrCommand::PlaceAtOrigin { output } => {
                owned(&["--output", output.as_str(), "--pos", "0x0"])
            }
        }
    }

    /// Human-readable description used in status messages.
    pub fn describe(&self) -> String {
        match self {
            RandrCommand::Query => "Querying displays".to_string(),
            RandrCommand::Mirror { target, source, .. } => format!("Mirroring {source} to {target}"),
            RandrCommand::Extend {
                target,
                source,
                side,
                ..
            } => format!("Extending {target} to the {side} of {source}"),
            RandrCommand::Reposition {
                output,
                direction,
                reference,
            } => format!("Positioning {output} {direction} {reference}"),
            RandrCommand::PlaceAtOrigin { output } => format!("Placing {output} at 0x0"),
        }
    }

    /// Returns `true` for every command except [`RandrCommand::Query`].
    pub fn is_mutating(&self) -> bool {
        !matches!(self, RandrCommand::Query)
    }

    /// The output this command reconfigures, if it reconfigures one.
    pub fn output(&self) -> Option<&str> {
        match self {
            RandrCommand::Query => None,
            RandrCommand::Mirror { target, .. } | RandrCommand::Extend { target, .. } => Some(target),
            RandrCommand::Reposition { output, .. } | RandrCommand::PlaceAtOrigin { output } => {
                Some(output)
            }
        }
    }
}

/// One reposition command per pending change, in pending order.
pub fn apply_pending_commands(pending: &PendingLayout) -> Vec<RandrCommand> {
    pending
        .iter()
        .map(|change| RandrCommand::Reposition {
            output: change.monitor.clone(),
            direction: change.direction,
            reference: change.reference.clone(),
        })
        .collect()
}

/// Lays every monitor out left-to-right in list order.
///
/// The first monitor goes to the origin and each following one to the right
/// of its predecessor, which breaks every mirror group at once.
pub fn unlink_commands(monitors: &[Monitor]) -> Vec<RandrCommand> {
    monitors
        .iter()
        .enumerate()
        .map(|(i, monitor)| match i {
            0 => RandrCommand::PlaceAtOrigin {
                output: monitor.name.clone(),
            },
            _ => RandrCommand::Reposition {
                output: monitor.name.clone(),
                direction: Direction::RightOf,
                reference: monitors[i - 1].name.clone(),
            },
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snap::PendingChange;

    #[test]
    fn test_query_args() {
        assert_eq!(RandrCommand::Query.args(), vec!["--query"]);
        assert!(!RandrCommand::Query.is_mutating());
    }

    #[test]
    fn test_mirror_args_put_target_first() {
        // Act
        let cmd = RandrCommand::mirror("eDP-1", "HDMI-1", "1920x1080", "60.00");

        // Assert
        assert_eq!(
            cmd.args(),
            vec![
                "--output", "HDMI-1", "--same-as", "eDP-1", "--mode", "1920x1080", "--rate",
                "60.00"
            ]
        );
        assert_eq!(cmd.describe(), "Mirroring eDP-1 to HDMI-1");
        assert_eq!(cmd.output(), Some("HDMI-1"));
    }

    #[test]
    fn test_extend_right_args() {
        let cmd = RandrCommand::extend("eDP-1", "HDMI-1", "1280x720", "59.94", ExtendSide::Right);
        assert_eq!(
            cmd.args(),
            vec![
                "--auto", "--output", "HDMI-1", "--mode", "1280x720", "--rate", "59.94",
                "--right-of", "eDP-1"
            ]
        );
        assert_eq!(cmd.describe(), "Extending HDMI-1 to the right of eDP-1");
    }

    #[test]
    fn test_extend_left_args_end_with_left_of_source() {
        let cmd = RandrCommand::extend("eDP-1", "HDMI-1", "1920x1080", "60.00", ExtendSide::Left);
        let args = cmd.args();
        assert_eq!(&args[args.len() - 2..], &["--left-of", "eDP-1"]);
        assert_eq!(cmd.describe(), "Extending HDMI-1 to the left of eDP-1");
    }

    #[test]
    fn test_reposition_and_origin_args() {
        let reposition = RandrCommand::Reposition {
            output: "DP-1".to_string(),
            direction: Direction::Above,
            reference: "eDP-1".to_string(),
        };
        assert_eq!(reposition.args(), vec!["--output", "DP-1", "--above", "eDP-1"]);

        let origin = RandrCommand::PlaceAtOrigin {
            output: "DP-1".to_string(),
        };
        assert_eq!(origin.args(), vec!["--output", "DP-1", "--pos", "0x0"]);
        assert!(origin.is_mutating());
    }

    #[test]
    fn test_apply_pending_commands_follow_pending_order() {
        // Arrange: B snapped first, then C, then B again (keeps its slot)
        let mut pending = PendingLayout::new();
        for (monitor, direction, reference) in [
            ("B", Direction::RightOf, "A"),
            ("C", Direction::Below, "A"),
            ("B", Direction::LeftOf, "A"),
        ] {
            pending.record(PendingChange {
                monitor: monitor.to_string(),
                reference: reference.to_string(),
                direction,
            });
        }

        // Act
        let commands = apply_pending_commands(&pending);

        // Assert
        let rendered: Vec<Vec<String>> = commands.iter().map(RandrCommand::args).collect();
        assert_eq!(
            rendered,
            vec![
                vec!["--output", "B", "--left-of", "A"],
                vec!["--output", "C", "--below", "A"],
            ]
        );
    }

    #[test]
    fn test_apply_pending_commands_empty() {
        assert!(apply_pending_commands(&PendingLayout::new()).is_empty());
    }

    #[test]
    fn test_unlink_chains_monitors_left_to_right() {
        let monitors = vec![
            Monitor::new("eDP-1", 1920, 1080, 0, 0),
            Monitor::new("HDMI-1", 1920, 1080, 0, 0),
            Monitor::new("DP-1", 2560, 1440, 1920, 0),
        ];

        let commands = unlink_commands(&monitors);

        let rendered: Vec<Vec<String>> = commands.iter().map(RandrCommand::args).collect();
        assert_eq!(
            rendered,
            vec![
                vec!["--output", "eDP-1", "--pos", "0x0"],
                vec!["--output", "HDMI-1", "--right-of", "eDP-1"],
                vec!["--output", "DP-1", "--right-of", "HDMI-1"],
            ]
        );
    }

    #[test]
    fn test_unlink_commands_empty_list() {
        assert!(unlink_commands(&[]).is_empty());
    }

    #[test]
    fn test_extend_side_parses_case_insensitively() {
        assert_eq!("Left".parse::<ExtendSide>(), Ok(ExtendSide::Left));
        assert_eq!("right".parse::<ExtendSide>(), Ok(ExtendSide::Right));
        assert!("up".parse::<ExtendSide>().is_err());
    }
}
