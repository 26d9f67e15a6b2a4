use super::shell::ShellId;

slotmap::new_key_type! {
    /// Unique identifier for a solid in the topology store.
    pub struct SolidId;
}

/// Data associated with a topological solid.
///
/// A solid is a bounded volume enclosed by one or more shells.
/// The first shell is the outer shell; additional shells represent voids.
#[derive(Debug, Clone)]
pub struct SolidData {
    /// The outer shell of the solid.
    pub outer_shell: ShellId,
    /// Inner shells representing voids within the solid.
    pub inner_shells: Vec<ShellId>,
}

impl SolidData {
    /// A solid bounded by `outer_shell` alone.
    #[must_use]
    pub fn new(outer_shell: ShellId) -> Self {
        Self {
            outer_shell,
            inner_shells: Vec::new(),
        }
    }

    /// Replaces `old` by `new` wherever the solid uses it.
    /// Returns whether the solid used `old`.
    pub fn replace_shell(&mut self, old: ShellId, new: ShellId) -> bool {
        if self.outer_shell == old {
            self.outer_shell = new;
            return true;
        }
        for s in &mut self.inner_shells {
            if *s == old {
                *s = new;
                return true;
            }
        }
        false
    }
}
