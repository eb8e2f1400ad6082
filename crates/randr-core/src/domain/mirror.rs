//! Mirror group detection.
//!
//! xrandr has no notion of a "mirror" once the command has run: two outputs
//! showing the same picture are simply two outputs at the same position.  The
//! detector therefore groups monitors by exact `(x, y)` equality.  It cannot
//! tell an intentional mirror from two outputs that happen to share an origin.

use super::monitor::Monitor;

/// Monitors sharing one top-left position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorGroup {
    /// The shared `(x, y)` position.
    pub position: (i32, i32),
    /// Member names in monitor-list order.
    pub members: Vec<String>,
}

impl MirrorGroup {
    /// A group of two or more monitors is a mirror.  Singletons are plain monitors.
    pub fn is_mirrored(&self) -> bool {
        self.members.len() >= 2
    }

    /// Returns `true` if `name` belongs to this group.
    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }
}

/// Every monitor's group, in order of first appearance of each position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorGroups {
    groups: Vec<MirrorGroup>,
}

impl MirrorGroups {
    /// All groups, including singletons.
    pub fn all(&self) -> &[MirrorGroup] {
        &self.groups
    }

    /// Only the groups with two or more members.
    pub fn mirrored(&self) -> impl Iterator<Item = &MirrorGroup> {
        self.groups.iter().filter(|g| g.is_mirrored())
    }

    /// `true` when at least one group is a mirror (enables unlink).
    pub fn any_mirrored(&self) -> bool {
        self.mirrored().next().is_some()
    }

    /// Names of every monitor that is part of a mirror.
    pub fn mirrored_names(&self) -> Vec<String> {
        self.mirrored().flat_map(|g| g.members.iter().cloned()).collect()
    }

    /// Returns the group containing `name`, if the monitor is known.
    pub fn group_of(&self, name: &str) -> Option<&MirrorGroup> {
        self.groups.iter().find(|g| g.contains(name))
    }

    /// The other members of `name`'s group.  Empty for unmirrored or unknown monitors.
    pub fn partners_of(&self, name: &str) -> Vec<String> {
        self.group_of(name)
            .map(|g| g.members.iter().filter(|m| *m != name).cloned().collect())
            .unwrap_or_default()
    }
}

/// Groups `monitors` by exact `(x, y)` equality.
///
/// Every monitor lands in exactly one group.  No tolerance window is applied:
/// monitors at `(0, 0)` and `(0, 1)` are not mirrored.
pub fn find_mirror_groups(monitors: &[Monitor]) -> MirrorGroups {
    let mut groups: Vec<MirrorGroup> = Vec::new();
    for monitor in monitors {
        let position = monitor.position();
        match groups.iter_mut().find(|g| g.position == position) {
            Some(group) => group.members.push(monitor.name.clone()),
            None => groups.push(MirrorGroup {
                position,
                members: vec![monitor.name.clone()],
            }),
        }
    }
    MirrorGroups { groups }
}
